//! Batch Schema Validator

use crate::error::{Rule, SchemaViolation};
use crate::reader::RawTable;
use crate::schema::{ColumnKind, ColumnSpec, Schema};
use crate::table::{Column, ColumnData, Table};
use std::collections::HashSet;
use tracing::{info, warn};

/// Validator for raw student records.
///
/// Every rule is checked against every row before reporting, so a single
/// run lists all defects in the input.
pub struct Validator {
    schema: Schema,
}

impl Validator {
    /// Create a new validator with given schema
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Check a single integer against a closed interval
    pub fn validate_range(value: i64, min: i64, max: i64) -> Result<(), Rule> {
        if value < min || value > max {
            Err(Rule::OutOfRange { min, max })
        } else {
            Ok(())
        }
    }

    /// Validate a raw table, returning its typed form with values unchanged
    pub fn validate(&self, raw: &RawTable) -> Result<Table, SchemaViolation> {
        let mut violation = SchemaViolation::default();

        for spec in self.schema.columns() {
            match raw.column_index(spec.name) {
                Some(idx) => self.check_column(raw, idx, spec, &mut violation),
                None => violation.record(Some(spec.name), Rule::MissingColumn, None, None),
            }
        }

        self.check_rows(raw, &mut violation);

        if !violation.is_empty() {
            warn!(
                "Validation failed: {} rule(s), {} offending row(s)",
                violation.failures.len(),
                violation.offending_rows()
            );
            return Err(violation);
        }

        let table = self.to_table(raw);
        info!(
            "Validated {} rows against {} schema columns",
            table.n_rows(),
            self.schema.columns().len()
        );
        Ok(table)
    }

    fn check_column(&self, raw: &RawTable, idx: usize, spec: &ColumnSpec, violation: &mut SchemaViolation) {
        for (row, cells) in raw.rows.iter().enumerate() {
            let Some(value) = cells[idx].as_deref() else {
                violation.record(Some(spec.name), Rule::NotNullable, Some(row), None);
                continue;
            };

            let broken = match &spec.kind {
                ColumnKind::Integer { min, max } => match value.parse::<i64>() {
                    Ok(parsed) => Self::validate_range(parsed, *min, *max).err(),
                    Err(_) => Some(Rule::NotInteger),
                },
                ColumnKind::Binary(_) | ColumnKind::Nominal(_) => {
                    let allowed = spec.kind.allowed();
                    if allowed.iter().any(|a| a == value) {
                        None
                    } else {
                        Some(Rule::NotInSet { allowed })
                    }
                }
            };

            if let Some(rule) = broken {
                violation.record(Some(spec.name), rule, Some(row), Some(value));
            }
        }
    }

    fn check_rows(&self, raw: &RawTable, violation: &mut SchemaViolation) {
        let integer_columns: Vec<bool> = raw
            .headers
            .iter()
            .map(|name| matches!(self.schema.get(name).map(|s| &s.kind), Some(ColumnKind::Integer { .. })))
            .collect();
        let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(raw.n_rows());

        for (row, cells) in raw.rows.iter().enumerate() {
            if cells.iter().all(Option::is_none) {
                violation.record(None, Rule::EmptyRow, Some(row), None);
            }
            if !seen.insert(Self::row_key(cells, &integer_columns)) {
                violation.record(None, Rule::DuplicateRow, Some(row), None);
            }
        }
    }

    /// Cells as they will appear in the typed table, so `017` and `17` collide
    fn row_key(cells: &[Option<String>], integer_columns: &[bool]) -> Vec<Option<String>> {
        cells
            .iter()
            .zip(integer_columns)
            .map(|(cell, &integer)| match (cell, integer) {
                (Some(value), true) => match value.parse::<i64>() {
                    Ok(parsed) => Some(parsed.to_string()),
                    Err(_) => Some(value.clone()),
                },
                _ => cell.clone(),
            })
            .collect()
    }

    fn to_table(&self, raw: &RawTable) -> Table {
        let columns = raw
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells = raw.rows.iter().map(|r| r[idx].clone().unwrap_or_default());
                let data = match self.schema.get(name).map(|s| &s.kind) {
                    // Parsing cannot fail here: every integer cell passed validation.
                    Some(ColumnKind::Integer { .. }) => {
                        ColumnData::Integer(cells.map(|c| c.parse().unwrap_or_default()).collect())
                    }
                    _ => ColumnData::Text(cells.collect()),
                };
                Column {
                    name: name.clone(),
                    data,
                }
            })
            .collect();

        Table::from_parts(columns, raw.n_rows())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Schema::student())
    }
}
