//! Adapters layer: Concrete implementations of ports.
//!
//! - `csv`: CSV files as the dataset store
//! - `logistic`: JSON logistic regression model with a digest manifest

pub mod csv;
pub mod logistic;

pub use self::csv::{CsvDatasetStore, CsvStoreError};
pub use logistic::{JsonModelStore, LogisticModel, ModelLoadError};
