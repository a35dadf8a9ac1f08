//! Crop recommendation from soil and climate measurements.
//!
//! A gain-ratio decision tree is grown over seven numeric features (N, P, K, temperature,
//! humidity, pH, rainfall) and evaluated with seeded, stratified k-fold cross-validation.

pub mod common_types;
pub mod error;
pub mod recommender;
pub mod trees;
pub mod validation;

#[cfg(feature = "python")]
mod python;

pub use common_types::{Dataset, Feature, FeatureVector, LabeledInstance, NUM_FEATURES};
pub use error::{CropError, Result};
pub use recommender::{CropRecommender, RecommenderConfig};
pub use trees::{DecisionTree, DecisionTreeClassifier, TreeConfig, TreeInducer, TreeNode};
pub use validation::{
    CrossValidationConfig, CrossValidationReport, CrossValidator, FoldDealing, FoldMetrics, Stratifier,
};
