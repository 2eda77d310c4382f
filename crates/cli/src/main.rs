//! Student Grade Pipeline - Main Entry Point

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use cli::{init_logging, PipelineConfig};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "grade-pipeline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Predict final student grades with a tuned ridge model", long_about = None)]
struct Cli {
    /// TOML file layered over the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and split raw data, fit the feature transformer
    Preprocess {
        /// Semicolon-separated raw student dataset
        #[arg(long)]
        raw_data: PathBuf,

        /// Directory for split and transformed tables
        #[arg(long)]
        data_to: PathBuf,

        /// Output path of the fitted transformer
        #[arg(long)]
        preprocessor_to: PathBuf,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check feature quality, tune alpha and fit the model
    Fit {
        /// Training split written by `preprocess`
        #[arg(long)]
        training_data: PathBuf,

        /// Fitted transformer written by `preprocess`
        #[arg(long)]
        preprocessor: PathBuf,

        /// Output path of the fitted pipeline
        #[arg(long)]
        pipeline_to: PathBuf,

        /// Directory for cv_results.csv
        #[arg(long)]
        tables_to: PathBuf,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Score the fitted pipeline on the test split
    Evaluate {
        #[arg(long)]
        test_data: PathBuf,

        #[arg(long)]
        pipeline_from: PathBuf,

        /// Directory for the score, coefficient and prediction tables
        #[arg(long)]
        tables_to: PathBuf,
    },

    /// Run every stage under one output directory
    Run {
        #[arg(long)]
        raw_data: PathBuf,

        #[arg(long)]
        out_dir: PathBuf,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn load_config(file: Option<&PathBuf>, seed: Option<u64>) -> Result<PipelineConfig> {
    let config = PipelineConfig::load(file.map(PathBuf::as_path))?;
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

fn execute(cli: Cli) -> Result<()> {
    let file = cli.config.as_ref();
    match cli.command {
        Commands::Preprocess { raw_data, data_to, preprocessor_to, seed } => {
            let config = load_config(file, seed)?;
            cli::preprocess(&raw_data, &data_to, &preprocessor_to, &config)?;
        }
        Commands::Fit { training_data, preprocessor, pipeline_to, tables_to, seed } => {
            let config = load_config(file, seed)?;
            let result = cli::fit(&training_data, &preprocessor, &pipeline_to, &tables_to, &config)?;
            info!("Best alpha {:.6}, CV MAE {:.4}", result.best_alpha, result.best_mae());
        }
        Commands::Evaluate { test_data, pipeline_from, tables_to } => {
            let evaluation = cli::evaluate(&test_data, &pipeline_from, &tables_to)?;
            info!(
                "Test MAE {:.4}, RMSE {:.4}, R2 {:.4}",
                evaluation.metrics.mae, evaluation.metrics.rmse, evaluation.metrics.r2
            );
        }
        Commands::Run { raw_data, out_dir, seed } => {
            let config = load_config(file, seed)?;
            cli::run(&raw_data, &out_dir, &config)?;
        }
        Commands::Config => {
            let config = load_config(file, None)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging().map_err(|e| anyhow!(e))?;

    info!("=== Student Grade Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    if let Err(e) = execute(cli) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
