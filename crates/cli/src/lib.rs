//! Student Grade Pipeline
//!
//! Stage functions behind the `grade-pipeline` binary: preprocessing, model
//! fitting, evaluation and a full run.

pub mod settings;
pub mod stages;

pub use settings::PipelineConfig;
pub use stages::{evaluate, fit, preprocess, run, RunLayout, RunOutput};

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber on stderr, filtered by `RUST_LOG`
/// (default `info`)
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
}
