//! Classifier port: Trait for the pre-trained prediction model.
//!
//! The model is opaque to the application. All it must do is map a single
//! feature row to its predicted labels.

use crate::domain::FeatureVector;

/// Trait for a trained binary classifier.
///
/// Implementations are immutable after loading and may be shared across
/// threads.
pub trait Classifier: Send + Sync {
    /// Error type for prediction failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Predict labels for a single-row input.
    ///
    /// A well-behaved model returns exactly one label in {0, 1}. Callers
    /// must not assume this and should validate the returned shape.
    ///
    /// # Errors
    /// Returns error if the input does not match the model's schema or the
    /// computation fails.
    fn predict(&self, row: &FeatureVector) -> Result<Vec<f64>, Self::Error>;

    /// Names of the features the model was trained on, in model order.
    fn feature_names(&self) -> Vec<&str>;
}
