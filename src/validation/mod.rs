//! Fold assignment and evaluation of trained trees.

pub mod cross_validation;
pub mod metrics;
pub mod stratify;

pub use cross_validation::{CrossValidationConfig, CrossValidationReport, CrossValidator, FoldMetrics};
pub use metrics::ConfusionAccumulator;
pub use stratify::{FoldAssignment, FoldDealing, Stratifier};
