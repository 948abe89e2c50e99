//! Logistic adapter: Implementation of Classifier and ModelStore.
//!
//! The model is a standardized logistic regression exported to JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "intercept": -0.8,
//!   "threshold": 0.5,
//!   "features": [
//!     { "name": "Glucose", "kind": "numeric", "mean": 120.9, "scale": 31.9, "coefficient": 1.1 },
//!     { "name": "BMI", "kind": "categorical", "weights": { "Obesity": 0.7, "Healthy Weight": 0.0 } }
//!   ]
//! }
//! ```
//!
//! The decision is `sigmoid(z) >= threshold` with
//! `z = intercept + sum(coefficient * (x - mean) / scale) + sum(weights[category])`.
//!
//! # Integrity
//!
//! When `manifest.json` sits next to the model file, the model bytes must
//! match the SHA-256 digest it records. Set
//! `GLUCODASH_REQUIRE_MODEL_MANIFEST=true` to refuse models without one.

pub mod manifest;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureValue, FeatureVector};
use crate::ports::{Classifier, ModelStore};

use manifest::{manifest_path_for, ModelManifest};

const MODEL_VERSION: u32 = 1;

fn default_threshold() -> f64 {
    0.5
}

/// Errors raised while scoring a row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Input row has no value for feature {0}")]
    MissingFeature(String),

    #[error("Feature {feature} expects a {expected} value")]
    WrongKind {
        feature: String,
        expected: &'static str,
    },

    #[error("Unknown category {category:?} for feature {feature}")]
    UnknownCategory { feature: String, category: String },

    #[error("Model produced a non-finite score")]
    NonFiniteScore,
}

/// Errors raised while loading a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported model version: {0}")]
    UnsupportedVersion(u32),

    #[error("Model declares no features")]
    NoFeatures,

    #[error("Model declares feature {0} more than once")]
    DuplicateFeature(String),

    #[error("Feature {0} has a non-positive or non-finite scale")]
    InvalidScale(String),

    #[error("Threshold {0} must lie strictly between 0 and 1")]
    InvalidThreshold(f64),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("File hash mismatch for {0}")]
    DigestMismatch(String),

    #[error("Model manifest required but not found at {0:?}")]
    ManifestRequired(PathBuf),
}

/// One model input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelFeature {
    Numeric {
        name: String,
        mean: f64,
        scale: f64,
        coefficient: f64,
    },
    Categorical {
        name: String,
        weights: BTreeMap<String, f64>,
    },
}

impl ModelFeature {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Numeric { name, .. } | Self::Categorical { name, .. } => name,
        }
    }

    fn contribution(&self, value: &FeatureValue) -> Result<f64, ModelError> {
        match self {
            Self::Numeric {
                name,
                mean,
                scale,
                coefficient,
            } => {
                let x = value.as_number().ok_or_else(|| ModelError::WrongKind {
                    feature: name.clone(),
                    expected: "numeric",
                })?;
                Ok(coefficient * (x - mean) / scale)
            }
            Self::Categorical { name, weights } => {
                let category = value.as_category().ok_or_else(|| ModelError::WrongKind {
                    feature: name.clone(),
                    expected: "categorical",
                })?;
                weights
                    .get(category)
                    .copied()
                    .ok_or_else(|| ModelError::UnknownCategory {
                        feature: name.clone(),
                        category: category.to_string(),
                    })
            }
        }
    }
}

/// Standardized logistic regression classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub version: u32,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub features: Vec<ModelFeature>,
}

impl LogisticModel {
    /// Parse and validate a model from JSON text.
    ///
    /// # Errors
    /// Returns error if the JSON is malformed or the parameters are invalid.
    pub fn from_json(json: &str) -> Result<Self, ModelLoadError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Check the structural invariants of the parameters.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.version != MODEL_VERSION {
            return Err(ModelLoadError::UnsupportedVersion(self.version));
        }
        if self.features.is_empty() {
            return Err(ModelLoadError::NoFeatures);
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(ModelLoadError::InvalidThreshold(self.threshold));
        }

        let mut seen = HashSet::new();
        for feature in &self.features {
            if !seen.insert(feature.name()) {
                return Err(ModelLoadError::DuplicateFeature(feature.name().to_string()));
            }
            if let ModelFeature::Numeric { name, scale, .. } = feature {
                if !(scale.is_finite() && *scale > 0.0) {
                    return Err(ModelLoadError::InvalidScale(name.clone()));
                }
            }
        }
        Ok(())
    }

    /// Positive-class probability for one row.
    ///
    /// # Errors
    /// Returns error if a model feature is missing from the row, has the
    /// wrong kind, or names an unknown category.
    pub fn probability(&self, row: &FeatureVector) -> Result<f64, ModelError> {
        let mut z = self.intercept;
        for feature in &self.features {
            let value = row
                .get(feature.name())
                .ok_or_else(|| ModelError::MissingFeature(feature.name().to_string()))?;
            z += feature.contribution(value)?;
        }
        if !z.is_finite() {
            return Err(ModelError::NonFiniteScore);
        }
        Ok(sigmoid(z))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticModel {
    type Error = ModelError;

    fn predict(&self, row: &FeatureVector) -> Result<Vec<f64>, Self::Error> {
        let p = self.probability(row)?;
        let label = if p >= self.threshold { 1.0 } else { 0.0 };
        tracing::debug!("Model probability {:.4} -> label {}", p, label);
        Ok(vec![label])
    }

    fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(ModelFeature::name).collect()
    }
}

/// Loads a `LogisticModel` from a JSON file, verifying its manifest digest.
#[derive(Debug, Clone)]
pub struct JsonModelStore {
    path: PathBuf,
    require_manifest: bool,
}

impl JsonModelStore {
    #[must_use]
    pub fn new(path: impl AsRef<Path>, require_manifest: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            require_manifest,
        }
    }

    fn verify_manifest(&self, bytes: &[u8]) -> Result<(), ModelLoadError> {
        let manifest_path = manifest_path_for(&self.path);
        if !manifest_path.exists() {
            if self.require_manifest {
                tracing::error!("Model manifest not found at {:?}", manifest_path);
                return Err(ModelLoadError::ManifestRequired(manifest_path));
            }
            tracing::warn!(
                "Loading model without manifest ({:?} not found)",
                manifest_path
            );
            return Ok(());
        }

        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ModelLoadError::Manifest(format!("Invalid model path {:?}", self.path))
            })?;

        ModelManifest::read(&manifest_path)?.verify(file_name, bytes)?;
        tracing::info!("Model digest verified against {:?}", manifest_path);
        Ok(())
    }
}

impl ModelStore for JsonModelStore {
    type Model = LogisticModel;
    type Error = ModelLoadError;

    fn load_model(&self) -> Result<Self::Model, Self::Error> {
        let bytes = std::fs::read(&self.path).map_err(|source| ModelLoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.verify_manifest(&bytes)?;

        let model: LogisticModel = serde_json::from_slice(&bytes)?;
        model.validate()?;

        tracing::info!(
            "Loaded model from {:?} (n_features={}, threshold={})",
            self.path,
            model.features.len(),
            model.threshold
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_feature_vector, derive_feature_directives, Column, Dataset};
    use tempfile::tempdir;

    const MODEL_JSON: &str = r#"{
        "version": 1,
        "intercept": 0.0,
        "features": [
            { "name": "BMI", "kind": "categorical",
              "weights": { "Obesity": 2.0, "Healthy Weight": -2.0 } },
            { "name": "Glucose", "kind": "numeric",
              "mean": 100.0, "scale": 20.0, "coefficient": 1.0 }
        ]
    }"#;

    fn row(bmi: &str, glucose: f64) -> FeatureVector {
        let dataset = Dataset::new(vec![
            Column::categorical("BMI", ["Obesity", "Healthy Weight", "Underweight", "Obesity"]),
            Column::numeric("Glucose", [60.0, 100.0, 200.0, 140.0]),
        ])
        .expect("valid dataset");
        let directives = derive_feature_directives(&dataset);
        let selections = [
            ("BMI".to_string(), FeatureValue::from(bmi)),
            ("Glucose".to_string(), FeatureValue::Number(glucose)),
        ]
        .into_iter()
        .collect();
        build_feature_vector(&directives, &selections).expect("valid selections")
    }

    #[test]
    fn test_parse_defaults_threshold() {
        let model = LogisticModel::from_json(MODEL_JSON).expect("Should parse");
        assert_eq!(model.threshold, 0.5);
        assert_eq!(model.feature_names(), vec!["BMI", "Glucose"]);
    }

    #[test]
    fn test_predict_labels() {
        let model = LogisticModel::from_json(MODEL_JSON).expect("Should parse");

        // z = 2 + (200 - 100) / 20 = 7
        assert_eq!(model.predict(&row("Obesity", 200.0)), Ok(vec![1.0]));
        // z = -2 + (60 - 100) / 20 = -4
        assert_eq!(model.predict(&row("Healthy Weight", 60.0)), Ok(vec![0.0]));
        // z = 0 exactly: p = 0.5 >= threshold
        assert_eq!(model.predict(&row("Healthy Weight", 140.0)), Ok(vec![1.0]));
    }

    #[test]
    fn test_unknown_category_fails() {
        let model = LogisticModel::from_json(MODEL_JSON).expect("Should parse");
        assert_eq!(
            model.predict(&row("Underweight", 100.0)),
            Err(ModelError::UnknownCategory {
                feature: "BMI".into(),
                category: "Underweight".into(),
            })
        );
    }

    #[test]
    fn test_missing_feature_fails() {
        let model = LogisticModel::from_json(MODEL_JSON).expect("Should parse");
        let dataset = Dataset::new(vec![Column::numeric("Glucose", [100.0])]).expect("valid");
        let directives = derive_feature_directives(&dataset);
        let selections = [("Glucose".to_string(), FeatureValue::Number(100.0))]
            .into_iter()
            .collect();
        let vector = build_feature_vector(&directives, &selections).expect("valid");
        assert_eq!(
            model.predict(&vector),
            Err(ModelError::MissingFeature("BMI".into()))
        );
    }

    #[test]
    fn test_validation_rejects_bad_parameters() {
        let bad_scale = MODEL_JSON.replace("\"scale\": 20.0", "\"scale\": 0.0");
        assert!(matches!(
            LogisticModel::from_json(&bad_scale),
            Err(ModelLoadError::InvalidScale(ref n)) if n == "Glucose"
        ));

        let bad_version = MODEL_JSON.replace("\"version\": 1", "\"version\": 7");
        assert!(matches!(
            LogisticModel::from_json(&bad_version),
            Err(ModelLoadError::UnsupportedVersion(7))
        ));

        let bad_threshold = MODEL_JSON.replace(
            "\"intercept\": 0.0",
            "\"intercept\": 0.0, \"threshold\": 1.0",
        );
        assert!(matches!(
            LogisticModel::from_json(&bad_threshold),
            Err(ModelLoadError::InvalidThreshold(_))
        ));

        let duplicate = MODEL_JSON.replace("\"name\": \"Glucose\"", "\"name\": \"BMI\"");
        assert!(matches!(
            LogisticModel::from_json(&duplicate),
            Err(ModelLoadError::DuplicateFeature(_))
        ));

        let empty = r#"{"version": 1, "intercept": 0.0, "features": []}"#;
        assert!(matches!(
            LogisticModel::from_json(empty),
            Err(ModelLoadError::NoFeatures)
        ));
    }

    #[test]
    fn test_store_without_manifest() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        std::fs::write(&path, MODEL_JSON).expect("write model");

        JsonModelStore::new(&path, false)
            .load_model()
            .expect("Unsigned model allowed when manifest is optional");

        assert!(matches!(
            JsonModelStore::new(&path, true).load_model(),
            Err(ModelLoadError::ManifestRequired(_))
        ));
    }

    #[test]
    fn test_store_verifies_manifest_digest() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        std::fs::write(&path, MODEL_JSON).expect("write model");

        let manifest = ModelManifest::for_files(temp.path(), &["model.json".to_string()])
            .expect("digest");
        manifest
            .write(&temp.path().join(manifest::MANIFEST_FILE))
            .expect("write manifest");

        JsonModelStore::new(&path, true)
            .load_model()
            .expect("Digest should match");

        std::fs::write(&path, MODEL_JSON.replace("0.0", "0.1")).expect("tamper");
        assert!(matches!(
            JsonModelStore::new(&path, false).load_model(),
            Err(ModelLoadError::DigestMismatch(_))
        ));
    }
}
