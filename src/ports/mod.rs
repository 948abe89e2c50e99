//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and the outside world (model file, dataset
//! file).

mod classifier;
mod store;

pub use classifier::Classifier;
pub use store::{DatasetStore, ModelStore};
