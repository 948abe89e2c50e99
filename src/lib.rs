//! # Glucodash
//!
//! Terminal dashboard for a diabetes-risk classifier and its training data.
//!
//! This crate provides:
//! - An input builder that turns a dataset schema into feature selectors
//! - Binary prediction through an opaque classifier
//! - Six fixed chart recipes producing serialisable chart specifications
//! - Terminal UI for interactive use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (Dataset, directives, predictions, chart specs)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (CSV dataset, JSON logistic model)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{ChartKind, ChartSpec, Dataset, FeatureVector, Prediction};

/// Result type for Glucodash operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Main error type for Glucodash
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Invalid selection: {0}")]
    Validation(#[from] domain::ValidationError),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(#[from] domain::ModelInvocationError),

    #[error("Chart error: {0}")]
    Chart(#[from] domain::ChartError),

    #[error("Dataset load failed: {0}")]
    CsvStore(#[from] adapters::csv::CsvStoreError),

    #[error("Model load failed: {0}")]
    ModelLoad(#[from] adapters::logistic::ModelLoadError),
}

impl DashboardError {
    /// Whether the error belongs to a single interaction and leaves the
    /// session usable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::ModelInvocation(_) | Self::Chart(_)
        )
    }
}
