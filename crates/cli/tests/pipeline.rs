use cli::stages::{
    CV_RESULTS_FILE, PIPELINE_FILE, PREDICTIONS_FILE, PREPROCESSOR_FILE, TEST_FILE, TEST_SCORES_FILE,
    TOP_COEFFICIENTS_FILE, TRAIN_FILE, TRANSFORMED_TEST_FILE, TRANSFORMED_TRAIN_FILE,
};
use cli::{PipelineConfig, RunLayout};
use data_validator::SchemaViolation;
use quality_gate::{DataQualityError, GuardConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/student-mini.csv")
}

/// Five rows are too few for meaningful association scores, so the
/// guard is opened up for end-to-end runs on the fixture
fn permissive_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.quality = GuardConfig {
        label_threshold: 1.1,
        pair_threshold: 0.92,
        max_pairs_above: usize::MAX,
    };
    config.search.n_iter = 20;
    config
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

#[test]
fn test_run_end_to_end_on_five_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli::run(&fixture(), dir.path(), &permissive_config()).unwrap();

    assert_eq!(output.search.n_folds, 3);
    assert!(output.search.best_score.is_finite());
    assert!((1e-3..=1e3).contains(&output.search.best_alpha));

    let evaluation = &output.evaluation;
    assert_eq!(evaluation.predictions.len(), 2);
    assert!(evaluation.predictions.iter().all(|p| p.is_finite()));
    assert!(evaluation.metrics.mae.is_finite());
    assert!(evaluation.metrics.rmse.is_finite());
    assert!(evaluation.metrics.r2.is_finite());
    assert_eq!(evaluation.top_coefficients.len(), 5);

    let layout = RunLayout::new(dir.path());
    assert_eq!(line_count(&layout.data.join(TRAIN_FILE)), 4);
    assert_eq!(line_count(&layout.data.join(TEST_FILE)), 3);
    assert_eq!(line_count(&layout.data.join(TRANSFORMED_TEST_FILE)), 3);
    let transformed = fs::read_to_string(layout.data.join(TRANSFORMED_TRAIN_FILE)).unwrap();
    assert!(transformed.lines().next().unwrap().ends_with(",G3"));

    assert!(layout.models.join(PREPROCESSOR_FILE).exists());
    assert!(layout.models.join(PIPELINE_FILE).exists());
    assert_eq!(line_count(&layout.tables.join(CV_RESULTS_FILE)), 21);
    assert_eq!(line_count(&layout.tables.join(TEST_SCORES_FILE)), 2);
    assert_eq!(line_count(&layout.tables.join(TOP_COEFFICIENTS_FILE)), 6);
    assert_eq!(line_count(&layout.tables.join(PREDICTIONS_FILE)), 3);
}

#[test]
fn test_same_seed_reproduces_run() {
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let first = cli::run(&fixture(), first_dir.path(), &permissive_config()).unwrap();
    let second = cli::run(&fixture(), second_dir.path(), &permissive_config()).unwrap();

    assert_eq!(first.search.best_alpha, second.search.best_alpha);
    assert_eq!(first.search.best_score, second.search.best_score);
    assert_eq!(first.evaluation.predictions, second.evaluation.predictions);
    assert_eq!(
        fs::read_to_string(first_dir.path().join("data").join(TRAIN_FILE)).unwrap(),
        fs::read_to_string(second_dir.path().join("data").join(TRAIN_FILE)).unwrap()
    );
}

#[test]
fn test_guard_stops_run_before_fitting() {
    // Medu and Fedu are identical in the fixture
    let dir = tempfile::tempdir().unwrap();
    let err = cli::run(&fixture(), dir.path(), &PipelineConfig::default()).unwrap_err();

    let Some(DataQualityError::Gate(failure)) = err.downcast_ref::<DataQualityError>() else {
        panic!("expected a gate failure, got {:#}", err);
    };
    assert!(failure
        .redundant
        .iter()
        .any(|p| p.first == "Medu" && p.second == "Fedu"));
    assert!(!RunLayout::new(dir.path()).models.join(PIPELINE_FILE).exists());
}

#[test]
fn test_invalid_raw_data_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let raw = fs::read_to_string(fixture()).unwrap();
    // Second record's age becomes 25
    let corrupted = raw.replacen("\"M\";17;", "\"M\";25;", 1);
    let path = dir.path().join("raw.csv");
    fs::write(&path, corrupted).unwrap();

    let err = cli::preprocess(&path, &dir.path().join("data"), &dir.path().join("p.bin"), &permissive_config())
        .unwrap_err();
    let violation = err.downcast_ref::<SchemaViolation>().unwrap();
    assert_eq!(violation.failures.len(), 1);
    assert_eq!(violation.failures[0].column.as_deref(), Some("age"));
    assert_eq!(violation.failures[0].rows, vec![1]);
}

fn binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_grade-pipeline"));
    command
        .env("GRADE__QUALITY__LABEL_THRESHOLD", "1.1")
        .env("GRADE__QUALITY__MAX_PAIRS_ABOVE", "1000")
        .env("GRADE__SEARCH__N_ITER", "5");
    command
}

#[test]
fn test_binary_runs_stages_separately() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let preprocessor = dir.path().join("models").join(PREPROCESSOR_FILE);
    let pipeline = dir.path().join("models").join(PIPELINE_FILE);
    let tables = dir.path().join("tables");

    let status = binary()
        .arg("preprocess")
        .arg("--raw-data")
        .arg(fixture())
        .arg("--data-to")
        .arg(&data)
        .arg("--preprocessor-to")
        .arg(&preprocessor)
        .args(["--seed", "123"])
        .status()
        .unwrap();
    assert!(status.success());

    let status = binary()
        .arg("fit")
        .arg("--training-data")
        .arg(data.join(TRAIN_FILE))
        .arg("--preprocessor")
        .arg(&preprocessor)
        .arg("--pipeline-to")
        .arg(&pipeline)
        .arg("--tables-to")
        .arg(&tables)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(line_count(&tables.join(CV_RESULTS_FILE)), 6);

    let status = binary()
        .arg("evaluate")
        .arg("--test-data")
        .arg(data.join(TEST_FILE))
        .arg("--pipeline-from")
        .arg(&pipeline)
        .arg("--tables-to")
        .arg(&tables)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(line_count(&tables.join(PREDICTIONS_FILE)), 3);
}

#[test]
fn test_binary_exits_non_zero_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let status = binary()
        .arg("run")
        .arg("--raw-data")
        .arg(dir.path().join("missing.csv"))
        .arg("--out-dir")
        .arg(dir.path())
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn test_binary_prints_layered_config() {
    let output = binary().arg("config").output().unwrap();
    assert!(output.status.success());

    let config: PipelineConfig = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config.search.n_iter, 5);
    assert_eq!(config.quality.max_pairs_above, 1000);
    assert_eq!(config.search.cv_folds, 10);
}
