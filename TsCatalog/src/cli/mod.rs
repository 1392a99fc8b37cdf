//! TsCatalog CLI - Command-line interface for Qt Linguist catalogs

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use tracing::Level;

#[derive(Parser)]
#[command(name = "tscatalog")]
#[command(version, about = "TsCatalog: Qt Linguist .ts catalog tools", long_about = None)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Run the TsCatalog CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    cli.command.execute()?;

    Ok(())
}
