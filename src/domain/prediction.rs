//! Prediction outcome types.
//!
//! Represents the interpreted output of the binary diabetes classifier.

use serde::{Deserialize, Serialize};

/// Errors raised when the classifier fails or returns a malformed answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelInvocationError {
    #[error("Prediction failed: {0}")]
    Failed(String),

    #[error("Model returned {labels} labels for a single input row")]
    UnexpectedShape { labels: usize },

    #[error("Model returned non-binary label {0}")]
    NonBinaryLabel(f64),
}

/// Binary diabetes-risk outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prediction {
    /// Label 0
    Negative,
    /// Label 1
    Positive,
}

impl Prediction {
    /// Interpret a raw model label. Only exactly 0 and 1 are accepted.
    ///
    /// # Errors
    /// Returns `ModelInvocationError::NonBinaryLabel` for any other value.
    pub fn from_label(label: f64) -> Result<Self, ModelInvocationError> {
        if label == 1.0 {
            Ok(Self::Positive)
        } else if label == 0.0 {
            Ok(Self::Negative)
        } else {
            Err(ModelInvocationError::NonBinaryLabel(label))
        }
    }

    /// Interpret the labels returned for a single input row.
    ///
    /// # Errors
    /// Returns `ModelInvocationError` unless there is exactly one binary label.
    pub fn from_single_row(labels: &[f64]) -> Result<Self, ModelInvocationError> {
        match labels {
            [label] => Self::from_label(*label),
            _ => Err(ModelInvocationError::UnexpectedShape {
                labels: labels.len(),
            }),
        }
    }

    /// The label this outcome corresponds to.
    #[must_use]
    pub fn label(&self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }

    /// Message shown to the user.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Negative => "Your diabetes report is negative",
            Self::Positive => "Your diabetes report is positive",
        }
    }

    /// Display color (RGB): green for negative, red for positive.
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Negative => (16, 185, 129), // Emerald (#10B981)
            Self::Positive => (244, 63, 94),  // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => write!(f, "Negative"),
            Self::Positive => write!(f, "Positive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping() {
        assert_eq!(Prediction::from_label(1.0), Ok(Prediction::Positive));
        assert_eq!(Prediction::from_label(0.0), Ok(Prediction::Negative));
        assert_eq!(Prediction::Positive.label(), 1);
        assert_eq!(Prediction::Negative.label(), 0);
    }

    #[test]
    fn test_non_binary_labels_rejected() {
        for bad in [2.0, -1.0, 0.5, f64::NAN] {
            assert!(matches!(
                Prediction::from_label(bad),
                Err(ModelInvocationError::NonBinaryLabel(_))
            ));
        }
    }

    #[test]
    fn test_single_row_shape() {
        assert_eq!(Prediction::from_single_row(&[1.0]), Ok(Prediction::Positive));
        assert_eq!(
            Prediction::from_single_row(&[]),
            Err(ModelInvocationError::UnexpectedShape { labels: 0 })
        );
        assert_eq!(
            Prediction::from_single_row(&[0.0, 1.0]),
            Err(ModelInvocationError::UnexpectedShape { labels: 2 })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Prediction::Negative.to_string(), "Negative");
        assert_eq!(Prediction::Positive.to_string(), "Positive");
    }
}
