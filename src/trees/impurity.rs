//! Information-theoretic measures over class counts.

use num_traits::{Float, FromPrimitive};

/// Shannon entropy, in bits, of a set described by its per-class counts.
///
/// Empty classes contribute nothing; an empty set has zero entropy.
pub fn entropy<F>(counts: &[usize]) -> F
where
    F: Float + FromPrimitive,
{
    let total: usize = counts.iter().sum();
    entropy_of_parts(counts.iter().copied(), total)
}

/// Entropy of the partition of `total` items into the given part sizes.
///
/// This is `entropy` for class counts and split information for child sizes.
fn entropy_of_parts<F, I>(parts: I, total: usize) -> F
where
    F: Float + FromPrimitive,
    I: IntoIterator<Item = usize>,
{
    if total == 0 {
        return F::zero();
    }
    let total_f = match F::from_usize(total) {
        Some(val) => val,
        None => return F::nan(),
    };

    let mut h = F::zero();
    for count in parts {
        if count == 0 {
            continue;
        }
        let p = F::from_usize(count).unwrap_or_else(F::zero) / total_f;
        if p > F::zero() {
            h = h - p * p.log2();
        }
    }
    h
}

/// Entropy of the child sizes of a binary split.
pub fn split_information<F>(left: usize, right: usize) -> F
where
    F: Float + FromPrimitive,
{
    entropy_of_parts([left, right], left + right)
}

/// Information gain and gain ratio of splitting `parent` into `left` and `right`.
///
/// The returned ratio is zero whenever the split information is zero, i.e. when one side is
/// empty. Returns `(gain, gain_ratio)`.
pub fn gain_ratio<F>(parent: &[usize], left: &[usize], right: &[usize]) -> (F, F)
where
    F: Float + FromPrimitive,
{
    let n_left: usize = left.iter().sum();
    let n_right: usize = right.iter().sum();
    let n = n_left + n_right;
    if n == 0 {
        return (F::zero(), F::zero());
    }

    let n_f = F::from_usize(n).unwrap_or_else(F::one);
    let w_left = F::from_usize(n_left).unwrap_or_else(F::zero) / n_f;
    let w_right = F::from_usize(n_right).unwrap_or_else(F::zero) / n_f;

    let conditional = w_left * entropy::<F>(left) + w_right * entropy::<F>(right);
    let gain = entropy::<F>(parent) - conditional;

    let split_info = split_information::<F>(n_left, n_right);
    if split_info <= F::zero() {
        return (gain, F::zero());
    }
    (gain, gain / split_info)
}
