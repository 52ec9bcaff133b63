//! Paperform CLI — academic document formatting assistant.
//!
//! Takes a draft document plus metadata, restructures it through an
//! external model, and emits a formatted paper in the requested citation
//! style with missing information flagged.

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
