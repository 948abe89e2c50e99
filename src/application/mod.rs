//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the two dashboard modes.

mod dispatcher;
mod predictor;
mod visualizer;

pub use dispatcher::{ViewDispatcher, ViewOutput, ViewRequest};
pub use predictor::{predict, PredictorService};
pub use visualizer::{feature_candidates, render_chart, ChartSettings, VisualizerService};
