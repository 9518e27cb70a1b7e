//! cims CLI — downloads the FEEC "100 cims" summit catalog.
//!
//! Fetches every catalog page, enriches each summit with the coordinates
//! from its detail page, and writes the collection to one JSON file.

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
