//! Per-class confusion counts and the scores derived from them.

/// True-positive, false-positive and false-negative counts per class.
///
/// Classes are indexed like the label set of the dataset being evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionAccumulator {
    true_positives: Vec<usize>,
    false_positives: Vec<usize>,
    false_negatives: Vec<usize>,
    support: Vec<usize>,
    correct: usize,
    total: usize,
}

impl ConfusionAccumulator {
    pub fn new(num_classes: usize) -> Self {
        ConfusionAccumulator {
            true_positives: vec![0; num_classes],
            false_positives: vec![0; num_classes],
            false_negatives: vec![0; num_classes],
            support: vec![0; num_classes],
            correct: 0,
            total: 0,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.support.len()
    }

    /// Records one evaluated instance.
    pub fn record(&mut self, actual: usize, predicted: usize) {
        self.total += 1;
        self.support[actual] += 1;
        if actual == predicted {
            self.correct += 1;
            self.true_positives[actual] += 1;
        } else {
            self.false_negatives[actual] += 1;
            self.false_positives[predicted] += 1;
        }
    }

    /// Adds another accumulator's counts to this one. Both must cover the same classes.
    pub fn merge(&mut self, other: &ConfusionAccumulator) {
        debug_assert_eq!(self.num_classes(), other.num_classes());
        for c in 0..self.num_classes() {
            self.true_positives[c] += other.true_positives[c];
            self.false_positives[c] += other.false_positives[c];
            self.false_negatives[c] += other.false_negatives[c];
            self.support[c] += other.support[c];
        }
        self.correct += other.correct;
        self.total += other.total;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.true_positives[class]
    }

    pub fn false_positives(&self, class: usize) -> usize {
        self.false_positives[class]
    }

    pub fn false_negatives(&self, class: usize) -> usize {
        self.false_negatives[class]
    }

    /// Number of recorded instances whose actual class is `class`.
    pub fn support(&self, class: usize) -> usize {
        self.support[class]
    }

    /// Percentage of correct predictions, 0 when nothing was recorded.
    pub fn accuracy_pct(&self) -> f64 {
        ratio(self.correct, self.total) * 100.0
    }

    pub fn precision(&self, class: usize) -> f64 {
        let tp = self.true_positives[class];
        ratio(tp, tp + self.false_positives[class])
    }

    pub fn recall(&self, class: usize) -> f64 {
        let tp = self.true_positives[class];
        ratio(tp, tp + self.false_negatives[class])
    }

    /// Precision averaged over classes, weighted by each class's support.
    pub fn weighted_precision(&self) -> f64 {
        self.weighted(|c| self.precision(c))
    }

    /// Recall averaged over classes, weighted by each class's support.
    pub fn weighted_recall(&self) -> f64 {
        self.weighted(|c| self.recall(c))
    }

    fn weighted(&self, score: impl Fn(usize) -> f64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (0..self.num_classes())
            .filter(|&c| self.support[c] > 0)
            .map(|c| ratio(self.support[c], self.total) * score(c))
            .sum()
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 { 0.0 } else { numerator as f64 / denominator as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_empty_accumulator_scores_zero() {
        let acc = ConfusionAccumulator::new(3);
        assert_eq!(acc.accuracy_pct(), 0.0);
        assert_eq!(acc.weighted_precision(), 0.0);
        assert_eq!(acc.weighted_recall(), 0.0);
        assert_eq!(acc.precision(1), 0.0);
    }

    #[test]
    fn test_perfect_predictions() {
        let mut acc = ConfusionAccumulator::new(2);
        for c in [0, 1, 1, 0, 1] {
            acc.record(c, c);
        }
        assert_eq!(acc.accuracy_pct(), 100.0);
        assert!((acc.weighted_precision() - 1.0).abs() < EPS);
        assert!((acc.weighted_recall() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_mixed_predictions() {
        // actual -> predicted
        let mut acc = ConfusionAccumulator::new(3);
        acc.record(0, 0);
        acc.record(0, 0);
        acc.record(0, 1);
        acc.record(1, 1);
        acc.record(2, 1);

        assert_eq!(acc.total(), 5);
        assert_eq!(acc.correct(), 3);
        assert!((acc.accuracy_pct() - 60.0).abs() < EPS);

        assert_eq!(acc.true_positives(0), 2);
        assert_eq!(acc.false_negatives(0), 1);
        assert_eq!(acc.false_positives(1), 2);
        assert_eq!(acc.support(2), 1);

        assert!((acc.precision(0) - 1.0).abs() < EPS);
        assert!((acc.precision(1) - 1.0 / 3.0).abs() < EPS);
        assert_eq!(acc.precision(2), 0.0);
        assert!((acc.recall(0) - 2.0 / 3.0).abs() < EPS);
        assert!((acc.recall(1) - 1.0).abs() < EPS);
        assert_eq!(acc.recall(2), 0.0);

        // 3/5 * 1 + 1/5 * 1/3 + 1/5 * 0
        assert!((acc.weighted_precision() - (0.6 + 1.0 / 15.0)).abs() < EPS);
        // 3/5 * 2/3 + 1/5 * 1 + 1/5 * 0
        assert!((acc.weighted_recall() - 0.6).abs() < EPS);
    }

    #[test]
    fn test_weighted_recall_equals_accuracy() {
        let mut acc = ConfusionAccumulator::new(4);
        for (a, p) in [(0, 0), (1, 2), (2, 2), (3, 3), (3, 0), (1, 1), (2, 2)] {
            acc.record(a, p);
        }
        assert!((acc.weighted_recall() * 100.0 - acc.accuracy_pct()).abs() < 1e-9);
    }

    #[test]
    fn test_merge() {
        let mut a = ConfusionAccumulator::new(2);
        a.record(0, 0);
        a.record(1, 0);
        let mut b = ConfusionAccumulator::new(2);
        b.record(1, 1);

        a.merge(&b);
        assert_eq!(a.total(), 3);
        assert_eq!(a.correct(), 2);
        assert_eq!(a.support(1), 2);
        assert_eq!(a.false_positives(0), 1);
    }
}
