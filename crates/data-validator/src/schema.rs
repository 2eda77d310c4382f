//! Student Record Schema

/// Target column holding the final grade
pub const TARGET: &str = "G3";

const YES_NO: [&str; 2] = ["yes", "no"];
const JOBS: &[&str] = &["teacher", "health", "services", "at_home", "other"];
const REASONS: &[&str] = &["home", "reputation", "course", "other"];
const GUARDIANS: &[&str] = &["mother", "father", "other"];

/// Domain of a single column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    /// Integer in a closed interval
    Integer { min: i64, max: i64 },
    /// Exactly two allowed values
    Binary([&'static str; 2]),
    /// Small fixed enumeration
    Nominal(&'static [&'static str]),
}

impl ColumnKind {
    /// Allowed text values, empty for integer columns
    pub fn allowed(&self) -> Vec<String> {
        match self {
            ColumnKind::Integer { .. } => Vec::new(),
            ColumnKind::Binary(values) => values.iter().map(|v| v.to_string()).collect(),
            ColumnKind::Nominal(values) => values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// A named, non-nullable column with its domain
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn integer(name: &'static str, min: i64, max: i64) -> Self {
        Self {
            name,
            kind: ColumnKind::Integer { min, max },
        }
    }

    pub const fn binary(name: &'static str, values: [&'static str; 2]) -> Self {
        Self {
            name,
            kind: ColumnKind::Binary(values),
        }
    }

    pub const fn nominal(name: &'static str, values: &'static [&'static str]) -> Self {
        Self {
            name,
            kind: ColumnKind::Nominal(values),
        }
    }
}

static STUDENT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::integer("G3", 0, 20),
    ColumnSpec::integer("G1", 0, 20),
    ColumnSpec::integer("G2", 0, 20),
    ColumnSpec::integer("age", 15, 22),
    ColumnSpec::integer("Medu", 0, 4),
    ColumnSpec::integer("Fedu", 0, 4),
    ColumnSpec::integer("traveltime", 1, 4),
    ColumnSpec::integer("studytime", 1, 4),
    ColumnSpec::integer("failures", 0, 4),
    ColumnSpec::integer("famrel", 1, 5),
    ColumnSpec::integer("freetime", 1, 5),
    ColumnSpec::integer("goout", 1, 5),
    ColumnSpec::integer("Dalc", 1, 5),
    ColumnSpec::integer("Walc", 1, 5),
    ColumnSpec::integer("health", 1, 5),
    ColumnSpec::integer("absences", 0, 100),
    ColumnSpec::binary("school", ["GP", "MS"]),
    ColumnSpec::binary("sex", ["M", "F"]),
    ColumnSpec::binary("address", ["U", "R"]),
    ColumnSpec::binary("famsize", ["LE3", "GT3"]),
    ColumnSpec::binary("Pstatus", ["T", "A"]),
    ColumnSpec::binary("schoolsup", YES_NO),
    ColumnSpec::binary("famsup", YES_NO),
    ColumnSpec::binary("paid", YES_NO),
    ColumnSpec::binary("activities", YES_NO),
    ColumnSpec::binary("nursery", YES_NO),
    ColumnSpec::binary("higher", YES_NO),
    ColumnSpec::binary("internet", YES_NO),
    ColumnSpec::binary("romantic", YES_NO),
    ColumnSpec::nominal("Mjob", JOBS),
    ColumnSpec::nominal("Fjob", JOBS),
    ColumnSpec::nominal("reason", REASONS),
    ColumnSpec::nominal("guardian", GUARDIANS),
];

/// Set of column specs a table must satisfy
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    /// Create a schema from explicit column specs
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// The Student Performance schema
    pub fn student() -> Self {
        Self::new(STUDENT_COLUMNS.to_vec())
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Look up a column spec by name
    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Both values of a binary column, if `name` is one
    pub fn binary_domain(&self, name: &str) -> Option<[&'static str; 2]> {
        match self.get(name)?.kind {
            ColumnKind::Binary(values) => Some(values),
            _ => None,
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::student()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_schema_covers_all_columns() {
        let schema = Schema::student();
        assert_eq!(schema.columns().len(), 33);
        assert!(schema.get(TARGET).is_some());
    }

    #[test]
    fn test_binary_domain_lookup() {
        let schema = Schema::student();
        assert_eq!(schema.binary_domain("school"), Some(["GP", "MS"]));
        assert_eq!(schema.binary_domain("age"), None);
        assert_eq!(schema.binary_domain("Mjob"), None);
    }

    #[test]
    fn test_age_bounds() {
        let schema = Schema::student();
        assert_eq!(
            schema.get("age").map(|c| c.kind.clone()),
            Some(ColumnKind::Integer { min: 15, max: 22 })
        );
    }
}
