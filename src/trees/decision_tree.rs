//! Gain-ratio decision tree induction and single-instance classification.

use tracing::debug;

use crate::common_types::{Dataset, FeatureVector};
use crate::error::{CropError, Result};
use crate::trees::node::{DecisionTree, NodeId, TreeNode};
use crate::trees::split::{best_split, partition, SplitCandidate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stopping rules for tree induction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeConfig {
    /// Nodes with fewer instances than this become leaves.
    pub min_instances: usize,
    /// Nodes at this depth become leaves. `None` grows until purity or no useful split.
    pub max_depth: Option<usize>,
}

impl TreeConfig {
    pub const DEFAULT_MIN_INSTANCES: usize = 2;

    pub fn new(min_instances: Option<usize>, max_depth: Option<usize>) -> Self {
        TreeConfig {
            min_instances: min_instances.unwrap_or(Self::DEFAULT_MIN_INSTANCES),
            max_depth,
        }
    }

    pub fn with_min_instances(mut self, min_instances: usize) -> Self {
        self.min_instances = min_instances;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig::new(None, None)
    }
}

/// Builds trees by repeatedly partitioning on the split with the highest gain ratio.
#[derive(Debug, Clone, Default)]
pub struct TreeInducer {
    config: TreeConfig,
}

impl TreeInducer {
    pub fn new(config: TreeConfig) -> Self {
        TreeInducer { config }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Induces a tree over every instance of `dataset`.
    ///
    /// Nodes are grown from an explicit work list rather than by recursion, so a chain of
    /// splits as long as the dataset needs no extra call stack.
    pub fn induce(&self, dataset: &Dataset) -> Result<DecisionTree> {
        if dataset.is_empty() {
            return Err(CropError::EmptyDataset);
        }

        let mut nodes = vec![pending()];
        let mut work: Vec<(NodeId, Vec<usize>, usize)> = vec![(DecisionTree::ROOT, (0..dataset.len()).collect(), 0)];
        // Every entry on `work` holds at least one instance: the root is checked above and
        // every split leaves at least one instance on each side.
        while let Some((id, indices, depth)) = work.pop() {
            let counts = dataset.class_counts_of(&indices);
            match self.choose_split(dataset, &indices, &counts, depth) {
                Some(split) => {
                    let (left, right) = partition(dataset, &indices, &split);
                    let left_id = nodes.len();
                    let right_id = left_id + 1;
                    nodes.push(pending());
                    nodes.push(pending());
                    nodes[id] = TreeNode::Split {
                        feature: split.feature,
                        threshold: split.threshold,
                        left: left_id,
                        right: right_id,
                    };
                    work.push((right_id, right, depth + 1));
                    work.push((left_id, left, depth + 1));
                }
                None => nodes[id] = make_leaf(dataset, &counts),
            }
        }

        let tree = DecisionTree::from_parts(nodes, dataset.labels().to_vec());
        debug!(
            instances = dataset.len(),
            nodes = tree.node_count(),
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "induced decision tree"
        );
        Ok(tree)
    }

    /// The split to apply at a node, or `None` when the node becomes a leaf.
    fn choose_split(&self, dataset: &Dataset, indices: &[usize], counts: &[usize], depth: usize) -> Option<SplitCandidate> {
        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let is_max_depth_reached = self.config.max_depth.is_some_and(|max_d| depth >= max_d);
        if is_pure || is_max_depth_reached || indices.len() < self.config.min_instances {
            return None;
        }
        best_split(dataset, indices).filter(|split| split.gain_ratio > f64::EPSILON)
    }
}

/// Slot for a node that is still on the work list.
fn pending() -> TreeNode {
    TreeNode::Leaf { class: 0, label: String::new(), distribution: Vec::new() }
}

/// Leaf holding the class distribution; the majority tie-break is label order.
fn make_leaf(dataset: &Dataset, counts: &[usize]) -> TreeNode {
    let labels = dataset.labels();
    let mut majority = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[majority] {
            majority = class;
        }
    }
    let distribution = counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(class, &count)| (labels[class].clone(), count))
        .collect();
    TreeNode::Leaf { class: majority, label: labels[majority].clone(), distribution }
}

/// Label of the leaf `features` ends in, as an index into the tree's label set.
pub fn classify_class(tree: Option<&DecisionTree>, features: &FeatureVector) -> Result<usize> {
    let tree = tree.ok_or(CropError::UntrainedModel)?;
    Ok(tree.class_for(features.as_slice()))
}

/// Walks the tree from its root and returns the label of the leaf `features` ends in.
///
/// Values equal to a threshold go left.
pub fn classify<'a>(tree: Option<&'a DecisionTree>, features: &FeatureVector) -> Result<&'a str> {
    let tree = tree.ok_or(CropError::UntrainedModel)?;
    Ok(tree.labels()[tree.class_for(features.as_slice())].as_str())
}

/// A decision tree together with the configuration used to grow it.
#[derive(Debug, Clone, Default)]
pub struct DecisionTreeClassifier {
    tree: Option<DecisionTree>,
    inducer: TreeInducer,
}

impl DecisionTreeClassifier {
    pub fn new(config: TreeConfig) -> Self {
        DecisionTreeClassifier {
            tree: None,
            inducer: TreeInducer::new(config),
        }
    }

    /// Trains on `dataset`, replacing any previous tree. On error the classifier is left untrained.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        self.tree = None;
        self.tree = Some(self.inducer.induce(dataset)?);
        Ok(())
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<&str> {
        classify(self.tree.as_ref(), features)
    }

    pub fn predict_batch(&self, samples: &[FeatureVector]) -> Result<Vec<&str>> {
        samples.iter().map(|features| self.predict(features)).collect()
    }

    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// The trained tree, for rendering.
    pub fn tree(&self) -> Option<&DecisionTree> {
        self.tree.as_ref()
    }

    /// Labels known at training time, in dataset order.
    pub fn labels(&self) -> &[String] {
        self.tree.as_ref().map_or(&[], |tree| tree.labels())
    }

    pub fn config(&self) -> &TreeConfig {
        self.inducer.config()
    }
}
