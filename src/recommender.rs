//! Caller-owned context tying a dataset to the tree trained on it.

use crate::common_types::{Dataset, FeatureVector};
use crate::error::Result;
use crate::trees::{DecisionTree, DecisionTreeClassifier, TreeConfig};
use crate::validation::{CrossValidationConfig, CrossValidationReport, CrossValidator};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecommenderConfig {
    pub tree: TreeConfig,
    pub validation: CrossValidationConfig,
}

/// A dataset and the final tree grown on all of it.
///
/// Nothing here is global; callers own the recommender and pass it where it is needed.
#[derive(Debug, Clone)]
pub struct CropRecommender {
    dataset: Dataset,
    classifier: DecisionTreeClassifier,
    config: RecommenderConfig,
}

impl CropRecommender {
    /// Trains the final tree on the whole dataset.
    pub fn train(dataset: Dataset, config: RecommenderConfig) -> Result<Self> {
        let mut classifier = DecisionTreeClassifier::new(config.tree.clone());
        classifier.fit(&dataset)?;
        Ok(CropRecommender { dataset, classifier, config })
    }

    /// Recommends a crop for seven raw measurements, in `Feature` order.
    pub fn recommend(&self, measurements: &[f64]) -> Result<&str> {
        let features = FeatureVector::new(measurements)?;
        self.classifier.predict(&features)
    }

    pub fn recommend_features(&self, features: &FeatureVector) -> Result<&str> {
        self.classifier.predict(features)
    }

    /// Evaluates the configured tree settings with stratified k-fold cross-validation.
    ///
    /// Each fold grows its own tree; the final tree is not touched.
    pub fn cross_validate(&self) -> Result<CrossValidationReport> {
        CrossValidator::new(self.config.validation.clone(), self.config.tree.clone()).run(&self.dataset)
    }

    /// The final tree, for rendering.
    pub fn tree(&self) -> Option<&DecisionTree> {
        self.classifier.tree()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn labels(&self) -> &[String] {
        self.dataset.labels()
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CropError;

    fn dataset() -> Dataset {
        let mut rows = Vec::new();
        for i in 0..6 {
            let j = i as f64;
            rows.push((vec![85.0 + j, 50.0, 40.0, 22.0, 81.0, 6.2, 230.0 + j], "rice"));
            rows.push((vec![40.0 + j, 70.0, 80.0, 18.0, 17.0, 7.2, 75.0 + j], "chickpea"));
        }
        Dataset::from_rows(rows).unwrap()
    }

    #[test]
    fn test_recommend() {
        let rec = CropRecommender::train(dataset(), RecommenderConfig::default()).unwrap();
        assert_eq!(rec.recommend(&[88.0, 50.0, 40.0, 22.0, 81.0, 6.2, 232.0]).unwrap(), "rice");
        assert_eq!(rec.recommend(&[42.0, 70.0, 80.0, 18.0, 17.0, 7.2, 77.0]).unwrap(), "chickpea");
        assert_eq!(rec.labels(), &["rice", "chickpea"]);
        assert!(rec.tree().is_some());
    }

    #[test]
    fn test_recommend_rejects_wrong_arity() {
        let rec = CropRecommender::train(dataset(), RecommenderConfig::default()).unwrap();
        assert_eq!(
            rec.recommend(&[88.0, 50.0, 40.0]),
            Err(CropError::MalformedInstance { expected: 7, actual: 3 })
        );
    }

    #[test]
    fn test_train_on_empty_dataset_fails() {
        let err = CropRecommender::train(Dataset::new(Vec::new()), RecommenderConfig::default()).unwrap_err();
        assert_eq!(err, CropError::EmptyDataset);
    }

    #[test]
    fn test_cross_validate_leaves_final_tree_alone() {
        let rec = CropRecommender::train(dataset(), RecommenderConfig::default()).unwrap();
        let before = rec.tree().cloned();
        let report = rec.cross_validate().unwrap();
        assert_eq!(report.folds.len(), 5);
        assert_eq!(rec.tree().cloned(), before);
    }
}
