//! docfuse CLI — merge a multi-file documentation set into one document.
//!
//! Reads an extracted navigation tree, loads every page it references,
//! rewrites relative links to absolute public URLs, and writes the merged
//! markdown document.

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
