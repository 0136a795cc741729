//! mockforge CLI - mock generation for Go interfaces

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging; stdout is reserved for program-only and model output
    let filter = if cli.verbose {
        EnvFilter::new("mockforge=debug")
    } else {
        EnvFilter::new("mockforge=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Model(args) => commands::model::execute(args),
    }
}
