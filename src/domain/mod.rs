//! Domain layer: Core types and pure logic.
//!
//! Nothing in this module performs I/O. The dataset, directives, chart
//! specifications and statistics are plain data with validating
//! constructors, so every rule here can be tested without a terminal.

pub mod chart;
mod dataset;
mod directive;
mod prediction;
pub mod stats;
mod view;

pub use chart::{ChartError, ChartKind, ChartParams, ChartSpec};
pub use dataset::{
    format_number, Column, ColumnKind, ColumnValues, Dataset, DatasetError, LABEL_COLUMN,
};
pub use directive::{
    build_feature_vector, derive_feature_directives, sorted_distinct, FeatureDirective,
    FeatureValue, FeatureVector, Selections, ValidationError,
};
pub use prediction::{ModelInvocationError, Prediction};
pub use view::{Mode, View};
