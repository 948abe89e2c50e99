//! Tabular dataset types.
//!
//! The dataset is column-oriented and immutable once constructed. Every
//! column carries a declared kind, and the binary label column (`Outcome`)
//! is validated on construction so chart recipes can rely on it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Name of the binary label column (0 = negative, 1 = positive).
pub const LABEL_COLUMN: &str = "Outcome";

/// Errors raised while constructing a dataset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset has no columns")]
    NoColumns,

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Column {column} has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Missing value in column {column} at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Label column {LABEL_COLUMN} must be numeric")]
    CategoricalLabel,

    #[error("Label column {LABEL_COLUMN} contains non-binary value {0}")]
    InvalidLabel(f64),
}

/// Declared kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Finite, unordered text domain
    Categorical,
    /// Ordered, continuous or discrete numeric domain
    Numeric,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Categorical => write!(f, "categorical"),
            Self::Numeric => write!(f, "numeric"),
        }
    }
}

/// Values of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Categorical(Vec<String>),
    Numeric(Vec<f64>),
}

impl ColumnValues {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Categorical(v) => v.len(),
            Self::Numeric(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Categorical(_) => ColumnKind::Categorical,
            Self::Numeric(_) => ColumnKind::Numeric,
        }
    }

    /// Render the cell at `row` for table display.
    #[must_use]
    pub fn display_cell(&self, row: usize) -> String {
        match self {
            Self::Categorical(v) => v.get(row).cloned().unwrap_or_default(),
            Self::Numeric(v) => v.get(row).map(|x| format_number(*x)).unwrap_or_default(),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    /// Create a categorical column.
    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: ColumnValues::Categorical(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Create a numeric column.
    pub fn numeric(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values.into_iter().collect()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }

    /// Numeric values, if this is a numeric column.
    #[must_use]
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v),
            ColumnValues::Categorical(_) => None,
        }
    }

    /// Text values, if this is a categorical column.
    #[must_use]
    pub fn as_categorical(&self) -> Option<&[String]> {
        match &self.values {
            ColumnValues::Categorical(v) => Some(v),
            ColumnValues::Numeric(_) => None,
        }
    }
}

/// Immutable in-memory dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from columns, validating shape and label invariants.
    ///
    /// # Errors
    /// Returns `DatasetError` if columns are empty, duplicated, ragged, hold
    /// a non-finite number, or the label column is not binary numeric.
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let first = columns.first().ok_or(DatasetError::NoColumns)?;
        let n_rows = first.values.len();

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DatasetError::DuplicateColumn(column.name.clone()));
            }
            if column.values.len() != n_rows {
                return Err(DatasetError::RaggedColumn {
                    column: column.name.clone(),
                    expected: n_rows,
                    actual: column.values.len(),
                });
            }
            if let Some(row) = column
                .as_numeric()
                .and_then(|values| values.iter().position(|v| !v.is_finite()))
            {
                return Err(DatasetError::MissingValue {
                    column: column.name.clone(),
                    row,
                });
            }
            if column.name == LABEL_COLUMN {
                let labels = column.as_numeric().ok_or(DatasetError::CategoricalLabel)?;
                if let Some(bad) = labels.iter().find(|v| **v != 0.0 && **v != 1.0) {
                    return Err(DatasetError::InvalidLabel(*bad));
                }
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Number of rows (observations).
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// All columns in file order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in file order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns of the given kind, in file order.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.kind() == kind)
    }

    /// Label values, if the label column is present.
    #[must_use]
    pub fn labels(&self) -> Option<&[f64]> {
        self.column(LABEL_COLUMN).and_then(Column::as_numeric)
    }

    /// Numeric columns usable as features (label excluded).
    pub fn numeric_features(&self) -> impl Iterator<Item = &Column> {
        self.columns_of_kind(ColumnKind::Numeric)
            .filter(|c| c.name != LABEL_COLUMN)
    }

    /// First `n` rows rendered as display strings.
    #[must_use]
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        (0..n.min(self.n_rows))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| c.values.display_cell(row))
                    .collect()
            })
            .collect()
    }
}

/// Format a number the way a table cell shows it: integers without a
/// fractional part, everything else with up to four decimals.
#[must_use]
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{x:.0}")
    } else {
        let s = format!("{x:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::categorical("BloodPressure", ["Normal", "Stage1", "Stage2"]),
            Column::numeric("Age", [21.0, 25.0, 30.0]),
            Column::numeric(LABEL_COLUMN, [0.0, 1.0, 0.0]),
        ])
        .expect("valid dataset")
    }

    #[test]
    fn test_dataset_shape() {
        let ds = sample();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.n_columns(), 3);
        assert_eq!(
            ds.column_names().collect::<Vec<_>>(),
            vec!["BloodPressure", "Age", "Outcome"]
        );
    }

    #[test]
    fn test_numeric_features_exclude_label() {
        let ds = sample();
        let names: Vec<_> = ds.numeric_features().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Age"]);
    }

    #[test]
    fn test_rejects_non_binary_label() {
        let err = Dataset::new(vec![Column::numeric(LABEL_COLUMN, [0.0, 2.0])]).unwrap_err();
        assert_eq!(err, DatasetError::InvalidLabel(2.0));
    }

    #[test]
    fn test_rejects_categorical_label() {
        let err = Dataset::new(vec![Column::categorical(LABEL_COLUMN, ["yes"])]).unwrap_err();
        assert_eq!(err, DatasetError::CategoricalLabel);
    }

    #[test]
    fn test_rejects_ragged_and_duplicate_columns() {
        let ragged = Dataset::new(vec![
            Column::numeric("a", [1.0, 2.0]),
            Column::numeric("b", [1.0]),
        ]);
        assert!(matches!(ragged, Err(DatasetError::RaggedColumn { .. })));

        let dup = Dataset::new(vec![
            Column::numeric("a", [1.0]),
            Column::numeric("a", [2.0]),
        ]);
        assert_eq!(dup.unwrap_err(), DatasetError::DuplicateColumn("a".into()));

        assert_eq!(Dataset::new(vec![]).unwrap_err(), DatasetError::NoColumns);
    }

    #[test]
    fn test_rejects_non_finite_numbers() {
        let err = Dataset::new(vec![Column::numeric("Glucose", [120.0, f64::NAN])]).unwrap_err();
        assert_eq!(
            err,
            DatasetError::MissingValue {
                column: "Glucose".into(),
                row: 1
            }
        );

        let err = Dataset::new(vec![Column::numeric("Insulin", [f64::INFINITY])]).unwrap_err();
        assert!(matches!(err, DatasetError::MissingValue { row: 0, .. }));
    }

    #[test]
    fn test_head_formats_cells() {
        let ds = Dataset::new(vec![
            Column::numeric("x", [1.0, 0.627, 3.5]),
            Column::categorical("c", ["a", "b", "c"]),
        ])
        .expect("valid");
        let head = ds.head(2);
        assert_eq!(head, vec![vec!["1", "a"], vec!["0.627", "b"]]);
        assert_eq!(ds.head(10).len(), 3);
    }
}
