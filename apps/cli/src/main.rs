//! Biblia CLI — offline data tools for the Reina-Valera reader.
//!
//! Builds the character card list, normalizes the raw verse dump, and
//! collects model-suggested concordances.

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
