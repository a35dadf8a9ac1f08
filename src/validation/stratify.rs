//! Seeded, class-proportional assignment of instances to folds.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::common_types::Dataset;
use crate::error::{CropError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fold index for every instance of a dataset, plus any stratification warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldAssignment {
    folds: Vec<usize>,
    k: usize,
    warnings: Vec<CropError>,
}

impl FoldAssignment {
    pub fn k(&self) -> usize {
        self.k
    }

    /// Fold of each instance, indexed like the dataset.
    pub fn folds(&self) -> &[usize] {
        &self.folds
    }

    pub fn fold_of(&self, instance: usize) -> usize {
        self.folds[instance]
    }

    /// `InsufficientData` entries for classes smaller than `k`.
    pub fn warnings(&self) -> &[CropError] {
        &self.warnings
    }

    /// Indices outside `fold`, in dataset order.
    pub fn train_indices(&self, fold: usize) -> Vec<usize> {
        (0..self.folds.len()).filter(|&i| self.folds[i] != fold).collect()
    }

    /// Indices inside `fold`, in dataset order.
    pub fn test_indices(&self, fold: usize) -> Vec<usize> {
        (0..self.folds.len()).filter(|&i| self.folds[i] == fold).collect()
    }

    pub fn fold_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for &fold in &self.folds {
            sizes[fold] += 1;
        }
        sizes
    }
}

/// How the shuffled members of each class are dealt to folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FoldDealing {
    /// The i-th shuffled member of every class goes to fold `i mod k`. Many classes smaller
    /// than `k` all land in the low folds.
    #[default]
    PerClass,
    /// The deal position carries over from one class to the next, so fold sizes differ by at
    /// most one even when most classes are smaller than `k`.
    Interleaved,
}

/// Stratified k-fold assignment.
///
/// Each class's instances are shuffled with one ChaCha8 stream shared across classes in
/// label order, then dealt round-robin according to `FoldDealing`. Either way every class is
/// spread evenly over the folds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stratifier {
    folds: usize,
    seed: u64,
    dealing: FoldDealing,
}

impl Stratifier {
    pub const DEFAULT_FOLDS: usize = 5;
    pub const DEFAULT_SEED: u64 = 1;

    pub fn new(folds: usize, seed: u64) -> Self {
        Stratifier { folds, seed, dealing: FoldDealing::default() }
    }

    pub fn with_dealing(mut self, dealing: FoldDealing) -> Self {
        self.dealing = dealing;
        self
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn dealing(&self) -> FoldDealing {
        self.dealing
    }

    /// Assigns every instance of `dataset` to a fold in `[0, k)`.
    ///
    /// Fails if `k < 2` or `k` exceeds the number of instances. Classes with fewer than `k`
    /// members still get assigned, and are reported through `FoldAssignment::warnings`.
    pub fn assign(&self, dataset: &Dataset) -> Result<FoldAssignment> {
        let k = self.folds;
        if k < 2 || k > dataset.len() {
            return Err(CropError::InvalidFoldCount { folds: k, instances: dataset.len() });
        }

        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); dataset.num_classes()];
        for i in 0..dataset.len() {
            groups[dataset.class_of(i)].push(i);
        }

        let mut warnings = Vec::new();
        for (class, group) in groups.iter().enumerate() {
            if !group.is_empty() && group.len() < k {
                let label = dataset.labels()[class].clone();
                warn!(label = %label, count = group.len(), folds = k, "class too small to appear in every fold");
                warnings.push(CropError::InsufficientData { label, count: group.len(), folds: k });
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut folds = vec![0; dataset.len()];
        let mut offset = 0;
        for group in groups.iter_mut() {
            group.shuffle(&mut rng);
            for (position, &i) in group.iter().enumerate() {
                folds[i] = (offset + position) % k;
            }
            if self.dealing == FoldDealing::Interleaved {
                offset += group.len();
            }
        }

        Ok(FoldAssignment { folds, k, warnings })
    }
}

impl Default for Stratifier {
    fn default() -> Self {
        Stratifier::new(Self::DEFAULT_FOLDS, Self::DEFAULT_SEED)
    }
}
