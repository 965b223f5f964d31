//! Focus MCP Server - Main Entry Point
//!
//! This is the main entry point for the task management MCP server.
//! The actual implementation is in the `focus_mcp` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use focus_mcp::FocusServerHandler;
use focus_mcp::focus::TICK_SECONDS;
use focus_mcp::{logging, scheduler};
use mcp_attr::server::serve_stdio;
use std::time::Duration;
use tracing::info;

/// Focus MCP Server - personal tasks, checklists and reminders via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the task data file
    file: String,

    /// Seconds between reminder checks
    #[arg(long, default_value_t = TICK_SECONDS, value_parser = clap::value_parser!(u64).range(1..))]
    reminder_interval: u64,

    /// Do not run the reminder loop
    #[arg(long)]
    no_reminders: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        // No arguments provided, show help and exit with error code
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!(); // Add a newline after help
        std::process::exit(2);
    }

    let args = Args::parse();
    logging::init_logging()?;

    let handler = FocusServerHandler::new(&args.file)?;

    if args.no_reminders {
        info!("Reminders disabled");
    } else {
        tokio::spawn(scheduler::run_reminders(
            handler.data_handle(),
            handler.clock(),
            Duration::from_secs(args.reminder_interval),
        ));
    }

    serve_stdio(handler).await?;
    Ok(())
}
