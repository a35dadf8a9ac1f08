//! Threshold search for binary splits on numeric features.

use ordered_float::OrderedFloat;

use crate::common_types::{Dataset, NUM_FEATURES};
use crate::trees::impurity::gain_ratio;

/// The best threshold found on one feature, with its quality scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCandidate {
    pub feature: usize,
    /// Instances with `value <= threshold` go left, the rest go right.
    pub threshold: f64,
    pub gain: f64,
    pub gain_ratio: f64,
    /// Number of instances on the left side.
    pub left_count: usize,
}

/// Midpoint of two distinct sorted values that still separates them.
///
/// When rounding would push the midpoint onto `upper`, the lower value itself is used,
/// which keeps `lower` on the left and `upper` on the right.
fn separating_threshold(lower: f64, upper: f64) -> f64 {
    let mid = lower + (upper - lower) / 2.0;
    if mid < upper { mid } else { lower }
}

/// Finds the threshold on `feature` with the highest gain ratio over the instances in `indices`.
///
/// Candidates sit between consecutive distinct sorted values, so two instances sharing a
/// value always land on the same side. Ties keep the lowest threshold. Returns `None` when
/// fewer than two distinct values exist.
pub fn evaluate_feature(dataset: &Dataset, indices: &[usize], feature: usize) -> Option<SplitCandidate> {
    if indices.len() < 2 {
        return None;
    }

    let mut sorted = indices.to_vec();
    sorted.sort_by_key(|&i| OrderedFloat(dataset.feature_value(i, feature)));

    let parent = dataset.class_counts_of(indices);
    let mut left = vec![0usize; parent.len()];
    let mut right = parent.clone();
    let mut best: Option<SplitCandidate> = None;

    for pos in 0..sorted.len() - 1 {
        let class = dataset.class_of(sorted[pos]);
        left[class] += 1;
        right[class] -= 1;

        let lower = dataset.feature_value(sorted[pos], feature);
        let upper = dataset.feature_value(sorted[pos + 1], feature);
        if lower == upper {
            continue;
        }

        let (gain, ratio) = gain_ratio::<f64>(&parent, &left, &right);
        if best.is_none_or(|b| ratio > b.gain_ratio) {
            best = Some(SplitCandidate {
                feature,
                threshold: separating_threshold(lower, upper),
                gain,
                gain_ratio: ratio,
                left_count: pos + 1,
            });
        }
    }
    best
}

/// Evaluates every feature and keeps the candidate with the highest gain ratio.
///
/// Ties go to the lowest feature index.
pub fn best_split(dataset: &Dataset, indices: &[usize]) -> Option<SplitCandidate> {
    let mut best: Option<SplitCandidate> = None;
    for feature in 0..NUM_FEATURES {
        if let Some(candidate) = evaluate_feature(dataset, indices, feature) {
            if best.is_none_or(|b| candidate.gain_ratio > b.gain_ratio) {
                best = Some(candidate);
            }
        }
    }
    best
}

/// Splits `indices` by the candidate's test, preserving relative order on each side.
pub fn partition(dataset: &Dataset, indices: &[usize], split: &SplitCandidate) -> (Vec<usize>, Vec<usize>) {
    indices
        .iter()
        .partition(|&&i| dataset.feature_value(i, split.feature) <= split.threshold)
}
