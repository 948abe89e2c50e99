//! Feature input directives and the user feature vector.
//!
//! A directive describes one model input: its column name, kind, and the
//! domain of values the user may pick from. Directives are derived once per
//! session from the dataset schema; the feature vector is built fresh for
//! every prediction request.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::dataset::{format_number, ColumnKind, ColumnValues, Dataset, LABEL_COLUMN};

/// Presentation text for the diastolic blood pressure categories.
const BLOOD_PRESSURE_NOTE: &str = "Diastolic Blood Pressure Categories: \
Normal < 80 mm Hg; High BP (Stage 1) 80-89 mm Hg; High BP (Stage 2) 90-119 mm Hg";

/// Presentation text for the BMI categories.
const BMI_NOTE: &str =
    "BMI Categories: Underweight < 18.5; Healthy Weight 18.5-24.9; Obesity >= 25";

/// A single selectable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Number(_) => ColumnKind::Numeric,
            Self::Category(_) => ColumnKind::Categorical,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(x) => Some(*x),
            Self::Category(_) => None,
        }
    }

    #[must_use]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Category(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl std::fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(x) => write!(f, "{}", format_number(*x)),
            Self::Category(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(x: f64) -> Self {
        Self::Number(x)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        Self::Category(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        Self::Category(s)
    }
}

/// Errors raised when a user selection does not satisfy its directive.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("No value selected for {feature}")]
    MissingSelection { feature: String },

    #[error("Value {value} is not an allowed choice for {feature}")]
    OutOfDomain { feature: String, value: String },
}

/// Derived description of one feature's allowed input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDirective {
    /// Column name
    pub name: String,
    /// Declared column kind
    pub kind: ColumnKind,
    /// Allowed values (categorical: first-seen order; numeric: ascending)
    pub domain: Vec<FeatureValue>,
    /// Optional presentation text shown next to the selector
    pub note: Option<&'static str>,
}

impl FeatureDirective {
    /// Whether `value` is one of the allowed values.
    #[must_use]
    pub fn allows(&self, value: &FeatureValue) -> bool {
        self.domain.iter().any(|v| v == value)
    }
}

/// User selections keyed by feature name, as gathered by the UI.
pub type Selections = HashMap<String, FeatureValue>;

/// Single-row record of feature values, in directive order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureVector {
    /// Feature names and values in directive order.
    #[must_use]
    pub fn entries(&self) -> &[(String, FeatureValue)] {
        &self.entries
    }

    /// Value for a feature, by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn note_for(column: &str) -> Option<&'static str> {
    match column {
        "BloodPressure" => Some(BLOOD_PRESSURE_NOTE),
        "BMI" => Some(BMI_NOTE),
        _ => None,
    }
}

/// Derive one input directive per feature column.
///
/// Categorical columns come first, then numeric columns, each partition in
/// dataset column order. The label column is dropped from the numeric
/// partition when present.
#[must_use]
pub fn derive_feature_directives(dataset: &Dataset) -> Vec<FeatureDirective> {
    let categorical = dataset
        .columns_of_kind(ColumnKind::Categorical)
        .filter_map(|column| {
            let values = column.as_categorical()?;
            let mut seen = HashSet::new();
            let domain = values
                .iter()
                .filter(|v| seen.insert(v.as_str()))
                .map(|v| FeatureValue::Category(v.clone()))
                .collect();
            Some(FeatureDirective {
                name: column.name.clone(),
                kind: ColumnKind::Categorical,
                domain,
                note: note_for(&column.name),
            })
        });

    let numeric = dataset
        .columns_of_kind(ColumnKind::Numeric)
        .filter(|column| column.name != LABEL_COLUMN)
        .filter_map(|column| match &column.values {
            ColumnValues::Numeric(values) => Some(FeatureDirective {
                name: column.name.clone(),
                kind: ColumnKind::Numeric,
                domain: sorted_distinct(values)
                    .into_iter()
                    .map(FeatureValue::Number)
                    .collect(),
                note: note_for(&column.name),
            }),
            ColumnValues::Categorical(_) => None,
        });

    categorical.chain(numeric).collect()
}

/// Distinct values sorted ascending. `-0.0` and `0.0` are one value.
#[must_use]
pub fn sorted_distinct(values: &[f64]) -> Vec<f64> {
    // Adding 0.0 turns -0.0 into 0.0 and leaves everything else alone
    let mut out: Vec<f64> = values.iter().map(|x| x + 0.0).collect();
    out.sort_by(f64::total_cmp);
    out.dedup_by(|a, b| a == b);
    out
}

/// Collect one validated selection per directive into a feature vector.
///
/// Selections naming features without a directive are ignored.
///
/// # Errors
/// Returns `ValidationError` if a directive has no selection or the
/// selection lies outside its domain.
pub fn build_feature_vector(
    directives: &[FeatureDirective],
    selections: &Selections,
) -> Result<FeatureVector, ValidationError> {
    let mut entries = Vec::with_capacity(directives.len());

    for directive in directives {
        let value = selections
            .get(&directive.name)
            .ok_or_else(|| ValidationError::MissingSelection {
                feature: directive.name.clone(),
            })?;

        if !directive.allows(value) {
            return Err(ValidationError::OutOfDomain {
                feature: directive.name.clone(),
                value: value.to_string(),
            });
        }

        entries.push((directive.name.clone(), value.clone()));
    }

    for name in selections.keys() {
        if !directives.iter().any(|d| &d.name == name) {
            tracing::debug!("Ignoring selection for unknown feature {}", name);
        }
    }

    Ok(FeatureVector { entries })
}
