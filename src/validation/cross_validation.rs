//! Stratified k-fold cross-validation of the decision tree.

use rayon::prelude::*;
use tracing::info;

use crate::common_types::Dataset;
use crate::error::{CropError, Result};
use crate::trees::{classify_class, TreeConfig, TreeInducer};
use crate::validation::metrics::ConfusionAccumulator;
use crate::validation::stratify::{FoldAssignment, FoldDealing, Stratifier};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CrossValidationConfig {
    pub folds: usize,
    pub seed: u64,
    pub dealing: FoldDealing,
    /// Evaluate folds on the rayon pool. Results are identical either way.
    pub parallel: bool,
}

impl CrossValidationConfig {
    pub fn new(folds: Option<usize>, seed: Option<u64>) -> Self {
        CrossValidationConfig {
            folds: folds.unwrap_or(Stratifier::DEFAULT_FOLDS),
            seed: seed.unwrap_or(Stratifier::DEFAULT_SEED),
            dealing: FoldDealing::default(),
            parallel: true,
        }
    }

    pub fn with_dealing(mut self, dealing: FoldDealing) -> Self {
        self.dealing = dealing;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        CrossValidationConfig::new(None, None)
    }
}

/// Scores of the tree trained without one fold and tested on it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FoldMetrics {
    /// Zero-based fold index.
    pub fold: usize,
    /// In `[0, 100]`.
    pub accuracy_pct: f64,
    /// Support-weighted precision in `[0, 1]`.
    pub precision: f64,
    /// Support-weighted recall in `[0, 1]`.
    pub recall: f64,
    pub train_size: usize,
    pub test_size: usize,
}

/// Per-fold scores in fold order, plus stratification warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidationReport {
    pub folds: Vec<FoldMetrics>,
    pub warnings: Vec<CropError>,
}

impl CrossValidationReport {
    pub fn mean_accuracy_pct(&self) -> f64 {
        if self.folds.is_empty() {
            return 0.0;
        }
        self.folds.iter().map(|f| f.accuracy_pct).sum::<f64>() / self.folds.len() as f64
    }
}

/// Runs stratified k-fold cross-validation, growing a fresh tree for every fold.
#[derive(Debug, Clone, Default)]
pub struct CrossValidator {
    config: CrossValidationConfig,
    inducer: TreeInducer,
}

impl CrossValidator {
    pub fn new(config: CrossValidationConfig, tree: TreeConfig) -> Self {
        CrossValidator { config, inducer: TreeInducer::new(tree) }
    }

    pub fn config(&self) -> &CrossValidationConfig {
        &self.config
    }

    pub fn run(&self, dataset: &Dataset) -> Result<CrossValidationReport> {
        let assignment = Stratifier::new(self.config.folds, self.config.seed)
            .with_dealing(self.config.dealing)
            .assign(dataset)?;
        let k = assignment.k();

        let evaluate = |fold: usize| self.evaluate_fold(dataset, &assignment, fold);
        // Ordered collect keeps fold order regardless of completion order.
        let folds = if self.config.parallel {
            (0..k).into_par_iter().map(evaluate).collect::<Result<Vec<_>>>()?
        } else {
            (0..k).map(evaluate).collect::<Result<Vec<_>>>()?
        };

        Ok(CrossValidationReport { folds, warnings: assignment.warnings().to_vec() })
    }

    /// Fails with `EmptyDataset` when every instance falls in `fold`, which per-class dealing
    /// produces when all classes are singletons.
    fn evaluate_fold(&self, dataset: &Dataset, assignment: &FoldAssignment, fold: usize) -> Result<FoldMetrics> {
        let train = dataset.subset(&assignment.train_indices(fold));
        let test = assignment.test_indices(fold);
        let tree = self.inducer.induce(&train)?;

        // `subset` keeps the full label set, so leaf class indices are dataset class indices.
        let mut confusion = ConfusionAccumulator::new(dataset.num_classes());
        for &i in &test {
            let predicted = classify_class(Some(&tree), &dataset.instance(i).features)?;
            confusion.record(dataset.class_of(i), predicted);
        }

        let metrics = FoldMetrics {
            fold,
            accuracy_pct: confusion.accuracy_pct(),
            precision: confusion.weighted_precision(),
            recall: confusion.weighted_recall(),
            train_size: train.len(),
            test_size: test.len(),
        };
        info!(
            fold = fold + 1,
            accuracy_pct = metrics.accuracy_pct,
            precision = metrics.precision,
            recall = metrics.recall,
            "evaluated fold"
        );
        Ok(metrics)
    }
}
