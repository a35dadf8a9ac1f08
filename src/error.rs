//! Error types shared by induction, prediction and cross-validation.

use thiserror::Error;

use crate::common_types::Feature;

/// Errors raised by the recommendation engine.
///
/// `EmptyDataset`, `UntrainedModel`, `MalformedInstance` and `NonFiniteFeature` are returned
/// as `Err` and mean the caller handed the engine something it cannot work with.
/// `InsufficientData` is never returned as `Err`: it travels alongside a fold assignment or a
/// cross-validation report as a warning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    #[error("cannot induce a decision tree from an empty dataset")]
    EmptyDataset,

    #[error("model has not been trained; call fit() first")]
    UntrainedModel,

    #[error("class '{label}' has {count} instance(s), fewer than the {folds} requested folds")]
    InsufficientData {
        label: String,
        count: usize,
        folds: usize,
    },

    #[error("expected {expected} feature values, got {actual}")]
    MalformedInstance { expected: usize, actual: usize },

    #[error("feature '{}' has non-finite value {value}", .feature.name())]
    NonFiniteFeature { feature: Feature, value: f64 },

    #[error("cannot split {instances} instance(s) into {folds} folds")]
    InvalidFoldCount { folds: usize, instances: usize },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, CropError>;
