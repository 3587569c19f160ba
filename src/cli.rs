use crate::pdf::render::RendererChoice;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "checksplit")]
#[command(about = "Split an inspection checklist PDF into classified, named pages")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split, classify and package a checklist
    #[command(alias = "split")]
    Process {
        /// Inspection checklist PDF
        path: PathBuf,

        /// Site address used as the prefix of every file name
        #[arg(short, long)]
        address: String,

        /// Pack type: AC_GOLD or BMD_PACK
        #[arg(short, long)]
        pack_type: String,

        /// Directory to write the archive into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Write the PDFs into a directory instead of a ZIP archive
        #[arg(long)]
        unpacked: bool,

        /// How single-page PDFs are produced
        #[arg(long, value_enum, default_value_t = RendererChoice::Auto)]
        renderer: RendererChoice,
    },

    /// Show how each page would be named, without writing anything
    Preview {
        /// Inspection checklist PDF
        path: PathBuf,

        /// Site address used as the prefix of every file name
        #[arg(short, long)]
        address: String,

        /// Pack type: AC_GOLD or BMD_PACK
        #[arg(short, long)]
        pack_type: String,
    },

    /// Run as MCP server
    Mcp,
}
