//! leadenrich CLI: company enrichment from the command line.
//!
//! Looks up a company's website, estimated revenue and firmographic data,
//! one company at a time or from a CSV file.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
