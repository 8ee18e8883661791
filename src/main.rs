//! # asthma-features entry point
//!
//! ```bash
//! asthma-features prepare --input data/clean_asthma_disease_data.csv \
//!     --output-all data/features/all.csv --output-x data/features/X.csv --output-y data/features/y.csv
//! asthma-features names --input data/clean_asthma_disease_data.csv
//! ```
//!
//! Set `RUST_LOG=debug` to see per-stage table shapes.

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    asthma_features::logging::init(cli.log_dir.as_deref())?;
    cli::run_command(cli.command)
}
