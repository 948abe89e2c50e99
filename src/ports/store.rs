//! Store ports: Traits for loading the read-only dataset and model.
//!
//! Both collaborators are loaded once at startup. A failure here is fatal
//! to initialization.

use crate::domain::Dataset;

use super::Classifier;

/// Source of the tabular dataset.
pub trait DatasetStore {
    /// Error type for load failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the dataset.
    ///
    /// # Errors
    /// Returns error if the source cannot be read or does not describe a
    /// valid dataset.
    fn load_dataset(&self) -> Result<Dataset, Self::Error>;
}

/// Source of the trained model.
pub trait ModelStore {
    /// Model type produced by this store.
    type Model: Classifier;

    /// Error type for load failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and verify the model.
    ///
    /// # Errors
    /// Returns error if the model cannot be read, fails integrity checks,
    /// or is malformed.
    fn load_model(&self) -> Result<Self::Model, Self::Error>;
}
