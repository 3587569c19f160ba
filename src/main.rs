mod checklist;
mod cli;
mod commands;
mod error;
mod mcp;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries MCP traffic, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Process {
            path,
            address,
            pack_type,
            output_dir,
            unpacked,
            renderer,
        } => {
            let options = commands::process::ProcessOptions {
                address,
                pack_type,
                output_dir,
                unpacked,
                renderer,
            };
            commands::process::run(&path, &options)?;
        }
        Commands::Preview {
            path,
            address,
            pack_type,
        } => {
            commands::preview::run(&path, &address, &pack_type)?;
        }
    }

    Ok(())
}
