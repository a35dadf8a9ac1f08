//! Data structures shared by the tree inducer, the stratifier and the cross-validator.

use crate::error::{CropError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of measurements in every feature vector.
pub const NUM_FEATURES: usize = 7;

/// The soil and climate measurements, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Feature {
    N,
    P,
    K,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl Feature {
    pub const ALL: [Feature; NUM_FEATURES] = [
        Feature::N,
        Feature::P,
        Feature::K,
        Feature::Temperature,
        Feature::Humidity,
        Feature::Ph,
        Feature::Rainfall,
    ];

    /// Column position of this feature inside a `FeatureVector`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Feature> {
        Self::ALL.get(index).copied()
    }

    /// Column header used by the crop dataset.
    pub fn name(self) -> &'static str {
        match self {
            Feature::N => "N",
            Feature::P => "P",
            Feature::K => "K",
            Feature::Temperature => "temperature",
            Feature::Humidity => "humidity",
            Feature::Ph => "ph",
            Feature::Rainfall => "rainfall",
        }
    }
}

/// Seven finite measurements, one per `Feature`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; NUM_FEATURES]);

impl FeatureVector {
    /// Builds a vector from exactly `NUM_FEATURES` values.
    ///
    /// Wrong arity is reported as `MalformedInstance`, never truncated or padded.
    pub fn new(values: &[f64]) -> Result<Self> {
        let values: [f64; NUM_FEATURES] = values.try_into().map_err(|_| CropError::MalformedInstance {
            expected: NUM_FEATURES,
            actual: values.len(),
        })?;
        Self::from_array(values)
    }

    pub fn from_array(values: [f64; NUM_FEATURES]) -> Result<Self> {
        for (feature, &value) in Feature::ALL.iter().zip(values.iter()) {
            if !value.is_finite() {
                return Err(CropError::NonFiniteFeature { feature: *feature, value });
            }
        }
        Ok(FeatureVector(values))
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// Value at a raw column index. Panics if `index >= NUM_FEATURES`.
    pub fn value(&self, index: usize) -> f64 {
        self.0[index]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<&[f64]> for FeatureVector {
    type Error = CropError;

    fn try_from(values: &[f64]) -> Result<Self> {
        FeatureVector::new(values)
    }
}

/// A feature vector together with its crop label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledInstance {
    pub features: FeatureVector,
    pub label: String,
}

impl LabeledInstance {
    pub fn new(features: FeatureVector, label: impl Into<String>) -> Self {
        LabeledInstance { features, label: label.into() }
    }
}

/// An immutable table of labeled instances plus the distinct labels it contains.
///
/// Labels are kept in first-seen order; that order is the tie-break order for majority votes.
/// Every instance also carries the index of its label so the hot paths count classes with
/// plain vectors instead of hashing strings.
#[derive(Debug, Clone)]
pub struct Dataset {
    instances: Vec<LabeledInstance>,
    classes: Vec<usize>,
    labels: Vec<String>,
}

impl Dataset {
    pub fn new(instances: Vec<LabeledInstance>) -> Self {
        let mut labels: Vec<String> = Vec::new();
        let mut classes = Vec::with_capacity(instances.len());
        for instance in &instances {
            let class = match labels.iter().position(|l| *l == instance.label) {
                Some(class) => class,
                None => {
                    labels.push(instance.label.clone());
                    labels.len() - 1
                }
            };
            classes.push(class);
        }
        Dataset { instances, classes, labels }
    }

    /// Builds a dataset from `(values, label)` rows as handed over by a loader.
    ///
    /// Labels are trimmed of surrounding whitespace. The first malformed row aborts the build.
    pub fn from_rows<I, V, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (V, S)>,
        V: AsRef<[f64]>,
        S: AsRef<str>,
    {
        let instances = rows
            .into_iter()
            .map(|(values, label)| {
                let features = FeatureVector::new(values.as_ref())?;
                Ok(LabeledInstance::new(features, label.as_ref().trim()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Dataset::new(instances))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[LabeledInstance] {
        &self.instances
    }

    pub fn instance(&self, index: usize) -> &LabeledInstance {
        &self.instances[index]
    }

    /// Distinct labels in first-seen order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    pub fn class_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Class index of the instance at `index`.
    pub fn class_of(&self, index: usize) -> usize {
        self.classes[index]
    }

    /// Feature value of the instance at `index`.
    pub fn feature_value(&self, index: usize, feature: usize) -> f64 {
        self.instances[index].features.value(feature)
    }

    /// Number of instances per class, indexed like `labels()`.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.labels.len()];
        for &class in &self.classes {
            counts[class] += 1;
        }
        counts
    }

    /// Class counts restricted to the given instance indices.
    pub(crate) fn class_counts_of(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.labels.len()];
        for &i in indices {
            counts[self.classes[i]] += 1;
        }
        counts
    }

    /// Copies the selected instances into a new dataset.
    ///
    /// The parent's label set is kept whole, so class indices mean the same thing in every
    /// subset carved out of one dataset, even when a subset lacks some class entirely.
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            instances: indices.iter().map(|&i| self.instances[i].clone()).collect(),
            classes: indices.iter().map(|&i| self.classes[i]).collect(),
            labels: self.labels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: f64, label: &str) -> (Vec<f64>, String) {
        (vec![n, 40.0, 40.0, 25.0, 80.0, 6.5, 200.0], label.to_string())
    }

    #[test]
    fn test_feature_names_and_indices() {
        assert_eq!(Feature::ALL.len(), NUM_FEATURES);
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
            assert_eq!(Feature::from_index(i), Some(*feature));
        }
        assert_eq!(Feature::from_index(7), None);
        assert_eq!(Feature::Ph.name(), "ph");
        assert_eq!(Feature::Rainfall.name(), "rainfall");
    }

    #[test]
    fn test_feature_vector_rejects_wrong_arity() {
        let err = FeatureVector::new(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, CropError::MalformedInstance { expected: 7, actual: 3 });

        let err = FeatureVector::new(&[0.0; 8]).unwrap_err();
        assert_eq!(err, CropError::MalformedInstance { expected: 7, actual: 8 });
    }

    #[test]
    fn test_feature_vector_rejects_non_finite() {
        let err = FeatureVector::new(&[1.0, 2.0, 3.0, 4.0, f64::NAN, 6.0, 7.0]).unwrap_err();
        assert!(matches!(err, CropError::NonFiniteFeature { feature: Feature::Humidity, .. }));
    }

    #[test]
    fn test_feature_vector_access() {
        let fv = FeatureVector::new(&[90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]).unwrap();
        assert_eq!(fv.get(Feature::N), 90.0);
        assert_eq!(fv.get(Feature::Rainfall), 202.9);
        assert_eq!(fv.value(5), 6.5);
        assert_eq!(fv.as_slice().len(), 7);
    }

    #[test]
    fn test_dataset_labels_first_seen_order() {
        let ds = Dataset::from_rows(vec![row(1.0, "rice"), row(2.0, " maize "), row(3.0, "rice"), row(4.0, "chickpea")])
            .unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.labels(), &["rice", "maize", "chickpea"]);
        assert_eq!(ds.class_of(1), 1);
        assert_eq!(ds.class_of(2), 0);
        assert_eq!(ds.class_counts(), vec![2, 1, 1]);
        assert_eq!(ds.class_index("chickpea"), Some(2));
        assert_eq!(ds.class_index("coffee"), None);
    }

    #[test]
    fn test_dataset_from_rows_propagates_malformed_row() {
        let rows = vec![(vec![1.0; 7], "rice"), (vec![1.0; 6], "maize")];
        let err = Dataset::from_rows(rows).unwrap_err();
        assert_eq!(err, CropError::MalformedInstance { expected: 7, actual: 6 });
    }

    #[test]
    fn test_subset_keeps_parent_label_set() {
        let ds = Dataset::from_rows(vec![row(1.0, "rice"), row(2.0, "maize"), row(3.0, "rice")]).unwrap();
        let sub = ds.subset(&[2, 0]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.labels(), ds.labels());
        assert_eq!(sub.class_counts(), vec![2, 0]);
        assert_eq!(sub.instance(0).features.get(Feature::N), 3.0);
        assert_eq!(ds.class_counts_of(&[0, 1]), vec![1, 1]);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::new(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.num_classes(), 0);
    }
}
