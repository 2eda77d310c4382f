//! Pipeline Stages
//!
//! Each stage reads its inputs from disk, runs one step of the pipeline and
//! writes its outputs, so stages can run in separate processes.

use crate::settings::PipelineConfig;
use anyhow::{Context, Result};
use data_validator::{train_test_split, DatasetSplit, RawTable, Table, Validator};
use evaluator::Evaluation;
use feature_engine::{FittedTransformer, TransformPlan};
use model_search::{RandomizedSearch, Ridge, SearchResult};
use quality_gate::CorrelationGuard;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Delimiter of the raw student dataset
pub const RAW_DELIMITER: u8 = b';';
/// Delimiter of the split files written by `preprocess`
pub const SPLIT_DELIMITER: u8 = b',';

pub const TRAIN_FILE: &str = "student_train.csv";
pub const TEST_FILE: &str = "student_test.csv";
pub const TRANSFORMED_TRAIN_FILE: &str = "transformed_student_train.csv";
pub const TRANSFORMED_TEST_FILE: &str = "transformed_student_test.csv";
pub const PREPROCESSOR_FILE: &str = "preprocessor.bin";
pub const PIPELINE_FILE: &str = "pipeline.bin";
pub const CV_RESULTS_FILE: &str = "cv_results.csv";
pub const TEST_SCORES_FILE: &str = "test_scores.csv";
pub const TOP_COEFFICIENTS_FILE: &str = "top_coefficients.csv";
pub const PREDICTIONS_FILE: &str = "predictions.csv";

/// Read a delimited file and validate it against the student schema
pub fn load_table(path: &Path, delimiter: u8) -> Result<Table> {
    let raw = RawTable::from_path(path, delimiter).with_context(|| format!("Failed to read {}", path.display()))?;
    let table = Validator::default()
        .validate(&raw)
        .with_context(|| format!("{} failed schema validation", path.display()))?;
    debug!("Loaded {} rows from {}", table.n_rows(), path.display());
    Ok(table)
}

/// Outputs of the preprocessing stage
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub split: DatasetSplit,
    pub transformer: FittedTransformer,
}

/// Validate the raw data, split it, fit the transformer on the training rows
/// and write the split and transformed tables.
pub fn preprocess(
    raw_data: &Path,
    data_to: &Path,
    preprocessor_to: &Path,
    config: &PipelineConfig,
) -> Result<Preprocessed> {
    let table = load_table(raw_data, RAW_DELIMITER)?;
    let split = train_test_split(&table, &config.split).context("Failed to split dataset")?;

    fs::create_dir_all(data_to).with_context(|| format!("Failed to create {}", data_to.display()))?;
    storage::write_table(data_to.join(TRAIN_FILE), &split.train, SPLIT_DELIMITER)?;
    storage::write_table(data_to.join(TEST_FILE), &split.test, SPLIT_DELIMITER)?;

    let transformer = TransformPlan::student()
        .fit(&split.train)
        .context("Failed to fit feature transformer")?;

    for (file, part) in [(TRANSFORMED_TRAIN_FILE, &split.train), (TRANSFORMED_TEST_FILE, &split.test)] {
        let features = transformer.apply(part)?;
        let target = transformer.target(part)?;
        storage::write_features(data_to.join(file), &features, &transformer.plan().target, &target)?;
    }

    storage::save_artifact(preprocessor_to, &transformer)
        .with_context(|| format!("Failed to save preprocessor to {}", preprocessor_to.display()))?;

    info!(
        "Preprocessed {} rows into {} features",
        table.n_rows(),
        transformer.n_features()
    );
    Ok(Preprocessed { split, transformer })
}

/// Gate the transformed training features, tune and fit the model, and
/// persist the search result.
pub fn fit(
    training_data: &Path,
    preprocessor: &Path,
    pipeline_to: &Path,
    tables_to: &Path,
    config: &PipelineConfig,
) -> Result<SearchResult> {
    let train = load_table(training_data, SPLIT_DELIMITER)?;
    let transformer: FittedTransformer = storage::load_artifact(preprocessor)
        .with_context(|| format!("Failed to load preprocessor from {}", preprocessor.display()))?;

    let features = transformer.apply(&train)?;
    let target = transformer.target(&train)?;
    let report = CorrelationGuard::new(config.pps.clone(), config.quality.clone())
        .check(&features, &target)
        .context("Training features rejected by the correlation guard")?;
    if let Some(top) = report.label_scores.iter().max_by(|a, b| a.score.total_cmp(&b.score)) {
        debug!("Strongest feature/label association: {} ({:.3})", top.feature, top.score);
    }

    let result = RandomizedSearch::new(config.search.clone())
        .fit(transformer.plan(), &Ridge::default(), &train)
        .context("Hyperparameter search failed")?;

    storage::write_cv_results(tables_to.join(CV_RESULTS_FILE), &result.candidates)?;
    storage::save_artifact(pipeline_to, &result)
        .with_context(|| format!("Failed to save pipeline to {}", pipeline_to.display()))?;

    Ok(result)
}

/// Score the persisted pipeline on the test split and write the result tables
pub fn evaluate(test_data: &Path, pipeline_from: &Path, tables_to: &Path) -> Result<Evaluation> {
    let test = load_table(test_data, SPLIT_DELIMITER)?;
    let result: SearchResult = storage::load_artifact(pipeline_from)
        .with_context(|| format!("Failed to load pipeline from {}", pipeline_from.display()))?;

    let evaluation = evaluator::evaluate(&result.pipeline, &test).context("Evaluation failed")?;

    storage::write_metrics(tables_to.join(TEST_SCORES_FILE), &evaluation.metrics)?;
    storage::write_coefficients(tables_to.join(TOP_COEFFICIENTS_FILE), &evaluation.top_coefficients)?;
    storage::write_predictions(
        tables_to.join(PREDICTIONS_FILE),
        &evaluation.actual,
        &evaluation.predictions,
    )?;

    Ok(evaluation)
}

/// Directory layout used by [`run`]
#[derive(Debug, Clone)]
pub struct RunLayout {
    pub data: PathBuf,
    pub models: PathBuf,
    pub tables: PathBuf,
}

impl RunLayout {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            data: out_dir.join("data"),
            models: out_dir.join("models"),
            tables: out_dir.join("tables"),
        }
    }
}

/// Outputs of a full run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub search: SearchResult,
    pub evaluation: Evaluation,
}

/// All stages in sequence under one output directory
pub fn run(raw_data: &Path, out_dir: &Path, config: &PipelineConfig) -> Result<RunOutput> {
    let layout = RunLayout::new(out_dir);
    let preprocessor = layout.models.join(PREPROCESSOR_FILE);
    let pipeline = layout.models.join(PIPELINE_FILE);

    preprocess(raw_data, &layout.data, &preprocessor, config)?;
    let search = fit(&layout.data.join(TRAIN_FILE), &preprocessor, &pipeline, &layout.tables, config)?;
    let evaluation = evaluate(&layout.data.join(TEST_FILE), &pipeline, &layout.tables)?;

    info!(
        "Run complete: alpha {:.6}, CV MAE {:.4}, test MAE {:.4}",
        search.best_alpha,
        search.best_mae(),
        evaluation.metrics.mae
    );
    Ok(RunOutput { search, evaluation })
}
