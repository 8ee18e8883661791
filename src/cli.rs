use anyhow::{Context as _, Result};
use asthma_features::config::PrepareSettings;
use asthma_features::features::{
    NameNormalizer, prepare_feature_table, split_features_target, standardize_column_names,
};
use asthma_features::io::{load_csv, save_csv};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "asthma-features",
    about = "Prepare features for the asthma risk-factor dataset"
)]
pub struct Cli {
    /// Also write rotating log files into this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the numeric feature table from a raw survey export
    Prepare {
        /// Input CSV (the cleaned asthma disease export)
        #[arg(short, long)]
        input: PathBuf,

        /// Output: features + target CSV
        #[arg(long)]
        output_all: PathBuf,

        /// Optional: features-only CSV
        #[arg(long)]
        output_x: Option<PathBuf>,

        /// Optional: target-only CSV
        #[arg(long)]
        output_y: Option<PathBuf>,

        /// Disable one-hot encoding of categoricals
        #[arg(long)]
        no_one_hot: bool,

        /// Disable scaling of continuous features
        #[arg(long)]
        no_scale: bool,

        /// JSON settings file (`features` and `naming` sections)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show how the header of a CSV file would be renamed
    Names {
        /// Input CSV
        #[arg(short, long)]
        input: PathBuf,

        /// JSON settings file providing the acronym repair table
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Prepare {
            input,
            output_all,
            output_x,
            output_y,
            no_one_hot,
            no_scale,
            config,
        } => {
            let mut settings = load_settings(config.as_deref())?;
            if no_one_hot {
                settings.features.one_hot_encode = false;
            }
            if no_scale {
                settings.features.scale_continuous = false;
            }
            let outputs = Outputs {
                all: output_all,
                x: output_x,
                y: output_y,
            };
            handle_prepare(&input, &outputs, &settings)
        }
        Commands::Names { input, config } => {
            let settings = load_settings(config.as_deref())?;
            handle_names(&input, &settings.naming)
        }
    }
}

struct Outputs {
    all: PathBuf,
    x: Option<PathBuf>,
    y: Option<PathBuf>,
}

fn load_settings(path: Option<&Path>) -> Result<PrepareSettings> {
    match path {
        Some(path) => {
            tracing::info!("Loading settings from {}", path.display());
            PrepareSettings::from_file(path)
                .with_context(|| format!("Failed to load settings: {}", path.display()))
        }
        None => Ok(PrepareSettings::default()),
    }
}

#[expect(clippy::print_stdout)]
fn handle_prepare(input: &Path, outputs: &Outputs, settings: &PrepareSettings) -> Result<()> {
    let df = load_csv(input).context("Failed to load input table")?;
    let df = standardize_column_names(df, &settings.naming)?;
    let mut feats = prepare_feature_table(df, &settings.features)?;

    save_csv(&mut feats, &outputs.all)?;
    println!("Saved: {}", outputs.all.display());

    if outputs.x.is_some() || outputs.y.is_some() {
        let (mut x, mut y) = split_features_target(&feats, &settings.features.target)?;
        if let Some(path) = &outputs.x {
            save_csv(&mut x, path)?;
            println!("Saved: {}", path.display());
        }
        if let Some(path) = &outputs.y {
            save_csv(&mut y, path)?;
            println!("Saved: {}", path.display());
        }
    }
    Ok(())
}

#[expect(clippy::print_stdout)]
fn handle_names(input: &Path, normalizer: &NameNormalizer) -> Result<()> {
    let df = load_csv(input).context("Failed to load input table")?;
    for raw in df.get_column_names() {
        println!("{raw} -> {}", normalizer.normalize(raw.as_str()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_prepare_flags_parse() -> Result<()> {
        let cli = Cli::try_parse_from([
            "asthma-features",
            "prepare",
            "--input",
            "raw.csv",
            "--output-all",
            "out/all.csv",
            "--no-scale",
        ])?;
        let Commands::Prepare {
            no_scale,
            no_one_hot,
            output_x,
            ..
        } = cli.command
        else {
            panic!("expected prepare");
        };
        assert!(no_scale);
        assert!(!no_one_hot);
        assert!(output_x.is_none());
        Ok(())
    }
}
