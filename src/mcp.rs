use anyhow::Result;
use clap::ValueEnum;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::commands::preview::preview;
use crate::commands::process::{process, ProcessOptions};
use crate::pdf::render::RendererChoice;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChecklistPreviewRequest {
    #[schemars(description = "Path to the inspection checklist PDF")]
    pub path: String,
    #[schemars(description = "Site address, used as the prefix of every file name")]
    pub address: String,
    #[schemars(description = "Pack type: AC_GOLD or BMD_PACK")]
    pub pack_type: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChecklistProcessRequest {
    #[schemars(description = "Path to the inspection checklist PDF")]
    pub path: String,
    #[schemars(description = "Site address, used as the prefix of every file name")]
    pub address: String,
    #[schemars(description = "Pack type: AC_GOLD or BMD_PACK")]
    pub pack_type: String,
    #[schemars(description = "Directory to write the ZIP archive into")]
    pub output_dir: String,
    #[schemars(description = "Write individual PDFs into a directory instead of a ZIP (default: false)")]
    #[serde(default)]
    pub unpacked: bool,
    #[schemars(description = "Page splitting strategy: auto, prune or rebuild (default: auto)")]
    #[serde(default)]
    pub renderer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChecklistServer {
    tool_router: ToolRouter<Self>,
}

impl ChecklistServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for ChecklistServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ChecklistServer {
    #[tool(description = "Classify every page of an inspection checklist PDF and list the file names a split would produce, without writing anything")]
    fn checklist_preview(&self, Parameters(req): Parameters<ChecklistPreviewRequest>) -> String {
        match preview(&req.path, &req.address, &req.pack_type) {
            Ok(plan) => {
                let result = PreviewResult {
                    address: plan.address,
                    pack_type: plan.pack_type.to_string(),
                    page_count: plan.page_count,
                    pages: plan
                        .pages
                        .into_iter()
                        .map(|p| PlannedPageResult {
                            page: p.page,
                            name: p.name,
                        })
                        .collect(),
                    skipped_pages: plan.skipped,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Split an inspection checklist PDF into single-page PDFs named by category and package them into '<ADDRESS> - PROCESSED_CHECKLIST.zip'")]
    fn checklist_process(&self, Parameters(req): Parameters<ChecklistProcessRequest>) -> String {
        let renderer = match req.renderer.as_deref() {
            None => RendererChoice::Auto,
            Some(name) => match <RendererChoice as ValueEnum>::from_str(name, true) {
                Ok(choice) => choice,
                Err(e) => return format!("Error: Invalid renderer '{}': {}", name, e),
            },
        };
        let options = ProcessOptions {
            address: req.address,
            pack_type: req.pack_type,
            output_dir: PathBuf::from(req.output_dir),
            unpacked: req.unpacked,
            renderer,
        };

        match process(&req.path, &options) {
            Ok(report) => {
                let result = ProcessResult {
                    output_path: report.output_path.display().to_string(),
                    files: report.files,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PlannedPageResult {
    pub page: u32,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PreviewResult {
    pub address: String,
    pub pack_type: String,
    pub page_count: u32,
    pub pages: Vec<PlannedPageResult>,
    pub skipped_pages: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ProcessResult {
    pub output_path: String,
    pub files: Vec<String>,
}

#[tool_handler]
impl ServerHandler for ChecklistServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Inspection checklist splitting tools. Use checklist_preview to see how each page \
                 of a checklist would be classified and named, and checklist_process to write the \
                 named single-page PDFs into a ZIP archive. Pack type is AC_GOLD or BMD_PACK."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = ChecklistServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
