//! Categorical Encoders

use crate::error::TransformError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Binary column encoded as a single 0/1 indicator.
///
/// The category that sorts first is dropped; the indicator is 1 for the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryColumn {
    pub name: String,
    pub dropped: String,
    pub kept: String,
}

impl BinaryColumn {
    /// Build from a two-value domain in any order
    pub fn from_domain(name: &str, domain: [&str; 2]) -> Self {
        let (dropped, kept) = if domain[0] <= domain[1] {
            (domain[0], domain[1])
        } else {
            (domain[1], domain[0])
        };
        Self {
            name: name.to_string(),
            dropped: dropped.to_string(),
            kept: kept.to_string(),
        }
    }

    /// Output feature name
    pub fn feature_name(&self) -> String {
        format!("{}_{}", self.name, self.kept)
    }

    /// Encode one value
    pub fn encode(&self, value: &str) -> Result<f64, TransformError> {
        if value == self.kept {
            Ok(1.0)
        } else if value == self.dropped {
            Ok(0.0)
        } else {
            Err(TransformError::UnknownCategory {
                column: self.name.clone(),
                value: value.to_string(),
            })
        }
    }
}

/// Categories of a nominal column observed at fit time, sorted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    pub column: String,
    pub categories: Vec<String>,
}

impl CategoryVocabulary {
    /// Learn the sorted set of distinct categories
    pub fn fit(column: &str, values: &[String]) -> Self {
        let categories: BTreeSet<&String> = values.iter().collect();
        Self {
            column: column.to_string(),
            categories: categories.into_iter().cloned().collect(),
        }
    }

    /// One output feature name per category
    pub fn feature_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories.iter().map(move |c| format!("{}_{}", self.column, c))
    }

    /// Slot of a category; `None` for categories unseen at fit time
    pub fn position(&self, value: &str) -> Option<usize> {
        self.categories.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_drops_first_sorted_category() {
        let yes_no = BinaryColumn::from_domain("paid", ["yes", "no"]);
        assert_eq!(yes_no.feature_name(), "paid_yes");
        assert_eq!(yes_no.encode("yes"), Ok(1.0));
        assert_eq!(yes_no.encode("no"), Ok(0.0));

        let school = BinaryColumn::from_domain("school", ["GP", "MS"]);
        assert_eq!(school.feature_name(), "school_MS");
    }

    #[test]
    fn test_binary_rejects_foreign_value() {
        let sex = BinaryColumn::from_domain("sex", ["M", "F"]);
        assert!(matches!(
            sex.encode("X"),
            Err(TransformError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_vocabulary_sorted_and_deduplicated() {
        let values: Vec<String> = ["other", "home", "course", "home"].iter().map(|s| s.to_string()).collect();
        let vocab = CategoryVocabulary::fit("reason", &values);
        assert_eq!(vocab.categories, vec!["course", "home", "other"]);
        assert_eq!(vocab.position("home"), Some(1));
        assert_eq!(vocab.position("reputation"), None);
        assert_eq!(
            vocab.feature_names().collect::<Vec<_>>(),
            vec!["reason_course", "reason_home", "reason_other"]
        );
    }
}
