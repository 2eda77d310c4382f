//! Column Transformer

use crate::encoding::{BinaryColumn, CategoryVocabulary};
use crate::error::TransformError;
use crate::features::FeatureMatrix;
use crate::statistics::ColumnSummary;
use data_validator::{ColumnData, Schema, Table, TARGET};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Declarative per-column-group transformation plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformPlan {
    /// Standardized with mean and standard deviation
    pub standard: Vec<String>,
    /// Scaled with median and interquartile range
    pub robust: Vec<String>,
    /// Encoded as a single indicator column
    pub binary: Vec<BinaryColumn>,
    /// One-hot encoded over the fit-time vocabulary
    pub nominal: Vec<String>,
    /// Label column, never used as a feature
    pub target: String,
}

impl TransformPlan {
    /// Plan for the student schema
    pub fn student() -> Self {
        let schema = Schema::student();
        let binary = [
            "school", "sex", "address", "famsize", "Pstatus", "schoolsup", "famsup", "paid",
            "activities", "nursery", "higher", "internet", "romantic",
        ]
        .iter()
        .filter_map(|name| schema.binary_domain(name).map(|d| BinaryColumn::from_domain(name, d)))
        .collect();

        Self {
            standard: vec!["G1".into(), "G2".into(), "age".into()],
            robust: vec!["absences".into()],
            binary,
            nominal: vec!["Mjob".into(), "Fjob".into(), "reason".into(), "guardian".into()],
            target: TARGET.to_string(),
        }
    }

    fn claims(&self, column: &str) -> bool {
        column == self.target
            || self.standard.iter().any(|c| c == column)
            || self.robust.iter().any(|c| c == column)
            || self.binary.iter().any(|b| b.name == column)
            || self.nominal.iter().any(|c| c == column)
    }

    /// Learn all parameters from training data
    pub fn fit(&self, table: &Table) -> Result<FittedTransformer, TransformError> {
        if table.n_rows() == 0 {
            return Err(TransformError::EmptyTable);
        }

        let standard = self
            .standard
            .iter()
            .map(|c| {
                let summary = ColumnSummary::compute(&numeric(table, c)?);
                Ok(ScaleParams::new(c, summary.mean, summary.std_dev))
            })
            .collect::<Result<Vec<_>, TransformError>>()?;

        let robust = self
            .robust
            .iter()
            .map(|c| {
                let summary = ColumnSummary::compute(&numeric(table, c)?);
                Ok(ScaleParams::new(c, summary.median, summary.iqr()))
            })
            .collect::<Result<Vec<_>, TransformError>>()?;

        for column in &self.binary {
            for value in text(table, &column.name)? {
                column.encode(value)?;
            }
        }

        let nominal = self
            .nominal
            .iter()
            .map(|c| Ok(CategoryVocabulary::fit(c, text(table, c)?)))
            .collect::<Result<Vec<_>, TransformError>>()?;

        let mut passthrough = Vec::new();
        for column in table.columns() {
            if self.claims(&column.name) {
                continue;
            }
            match column.data {
                ColumnData::Integer(_) => passthrough.push(column.name.clone()),
                ColumnData::Text(_) => debug!("Ignoring unplanned text column {}", column.name),
            }
        }

        let feature_names: Vec<String> = standard
            .iter()
            .chain(robust.iter())
            .map(|p| p.column.clone())
            .chain(self.binary.iter().map(BinaryColumn::feature_name))
            .chain(nominal.iter().flat_map(|v| v.feature_names()))
            .chain(passthrough.iter().cloned())
            .collect();

        info!(
            "Fitted transformer on {} rows: {} output features ({} passthrough)",
            table.n_rows(),
            feature_names.len(),
            passthrough.len()
        );

        Ok(FittedTransformer {
            plan: self.clone(),
            standard,
            robust,
            nominal,
            passthrough,
            feature_names,
        })
    }
}

impl Default for TransformPlan {
    fn default() -> Self {
        Self::student()
    }
}

/// Relative size below which a scale counts as zero
const SCALE_TOLERANCE: f64 = 10.0 * f64::EPSILON;

/// Centering and scaling learned for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleParams {
    pub column: String,
    pub center: f64,
    /// Never (near) zero: a constant column scales by 1
    pub scale: f64,
}

impl ScaleParams {
    fn new(column: &str, center: f64, scale: f64) -> Self {
        Self {
            column: column.to_string(),
            center,
            scale: if !scale.is_finite() || scale.abs() < SCALE_TOLERANCE * center.abs().max(1.0) {
                1.0
            } else {
                scale
            },
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        (value - self.center) / self.scale
    }
}

/// Immutable result of fitting a [`TransformPlan`] to training data.
///
/// The output columns and their order depend only on this value, never on
/// the table passed to [`FittedTransformer::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransformer {
    plan: TransformPlan,
    standard: Vec<ScaleParams>,
    robust: Vec<ScaleParams>,
    nominal: Vec<CategoryVocabulary>,
    passthrough: Vec<String>,
    feature_names: Vec<String>,
}

impl FittedTransformer {
    pub fn plan(&self) -> &TransformPlan {
        &self.plan
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Transform a table into the fitted feature layout.
    ///
    /// Nominal categories unseen at fit time encode as all zeros.
    pub fn apply(&self, table: &Table) -> Result<FeatureMatrix, TransformError> {
        let n = table.n_rows();
        let mut values = Array2::<f64>::zeros((n, self.n_features()));
        let mut col = 0;

        for params in self.standard.iter().chain(self.robust.iter()) {
            let column = numeric(table, &params.column)?;
            for (row, value) in column.into_iter().enumerate() {
                values[[row, col]] = params.apply(value);
            }
            col += 1;
        }

        for binary in &self.plan.binary {
            for (row, value) in text(table, &binary.name)?.iter().enumerate() {
                values[[row, col]] = binary.encode(value)?;
            }
            col += 1;
        }

        for vocab in &self.nominal {
            let mut unseen = 0usize;
            for (row, value) in text(table, &vocab.column)?.iter().enumerate() {
                match vocab.position(value) {
                    Some(slot) => values[[row, col + slot]] = 1.0,
                    None => unseen += 1,
                }
            }
            if unseen > 0 {
                debug!("{}: {} row(s) with categories unseen at fit time", vocab.column, unseen);
            }
            col += vocab.len();
        }

        for name in &self.passthrough {
            for (row, value) in numeric(table, name)?.into_iter().enumerate() {
                values[[row, col]] = value;
            }
            col += 1;
        }

        FeatureMatrix::new(self.feature_names.clone(), values)
    }

    /// Label values of a table as floats
    pub fn target(&self, table: &Table) -> Result<Array1<f64>, TransformError> {
        numeric(table, &self.plan.target).map(Array1::from)
    }
}

/// Stateful wrapper pairing a plan with its optional fitted state
#[derive(Debug, Clone)]
pub struct FeatureTransformer {
    plan: TransformPlan,
    fitted: Option<FittedTransformer>,
}

impl FeatureTransformer {
    pub fn new(plan: TransformPlan) -> Self {
        Self { plan, fitted: None }
    }

    /// Fit on training data, replacing any earlier fit
    pub fn fit(&mut self, table: &Table) -> Result<&FittedTransformer, TransformError> {
        let fitted = self.fitted.insert(self.plan.fit(table)?);
        Ok(&*fitted)
    }

    /// Apply the fitted state; fails with `NotFitted` before `fit`
    pub fn transform(&self, table: &Table) -> Result<FeatureMatrix, TransformError> {
        self.fitted
            .as_ref()
            .ok_or(TransformError::NotFitted)?
            .apply(table)
    }

    pub fn fit_transform(&mut self, table: &Table) -> Result<FeatureMatrix, TransformError> {
        self.fit(table)?.apply(table)
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn into_fitted(self) -> Result<FittedTransformer, TransformError> {
        self.fitted.ok_or(TransformError::NotFitted)
    }
}

fn numeric(table: &Table, column: &str) -> Result<Vec<f64>, TransformError> {
    match table.column(column).map(|c| &c.data) {
        Some(ColumnData::Integer(values)) => Ok(values.iter().map(|&v| v as f64).collect()),
        Some(ColumnData::Text(_)) => Err(TransformError::WrongColumnType {
            column: column.to_string(),
            expected: "integer",
        }),
        None => Err(TransformError::MissingColumn(column.to_string())),
    }
}

fn text<'a>(table: &'a Table, column: &str) -> Result<&'a [String], TransformError> {
    match table.column(column).map(|c| &c.data) {
        Some(ColumnData::Text(values)) => Ok(values),
        Some(ColumnData::Integer(_)) => Err(TransformError::WrongColumnType {
            column: column.to_string(),
            expected: "text",
        }),
        None => Err(TransformError::MissingColumn(column.to_string())),
    }
}
