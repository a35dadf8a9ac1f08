//! Arena-backed decision trees, as handed to rendering collaborators.

use crate::common_types::Feature;

/// Position of a node inside its `DecisionTree`.
pub type NodeId = usize;

/// A node of a trained decision tree.
///
/// Children are referenced by `NodeId` into the owning tree's node list; nothing points back
/// up the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Leaf {
        /// Index of `label` in the tree's label set.
        class: usize,
        /// Majority label of the training instances that reached this leaf.
        label: String,
        /// Sparse class distribution: `(label, count)` pairs in label-set order, listing only
        /// labels with a non-zero count. Labels absent here had no training instance at this
        /// leaf.
        distribution: Vec<(String, usize)>,
    },
    Split {
        feature: usize,
        threshold: f64,
        /// Instances with `value <= threshold`.
        left: NodeId,
        right: NodeId,
    },
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// The feature tested by a split node.
    pub fn feature(&self) -> Option<Feature> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split { feature, .. } => Feature::from_index(*feature),
        }
    }
}

/// A trained tree: a flat node list whose first entry is the root.
///
/// Every walk over the tree, including drop, clone and comparison, is iterative, so chains
/// as deep as the training set is large are fine.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    labels: Vec<String>,
}

impl DecisionTree {
    pub const ROOT: NodeId = 0;

    /// Assembles a tree from its nodes, root first. Every `Split` child id must index into
    /// `nodes` and every leaf `class` into `labels`.
    pub(crate) fn from_parts(nodes: Vec<TreeNode>, labels: Vec<String>) -> Self {
        debug_assert!(!nodes.is_empty());
        DecisionTree { nodes, labels }
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    /// All nodes; ids are positions in this slice.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Label set the leaf `class` indices refer to.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Leaf reached by `values`, walking from the root. Values equal to a threshold go left.
    pub fn leaf_for(&self, values: &[f64]) -> &TreeNode {
        let mut id = Self::ROOT;
        loop {
            match &self.nodes[id] {
                TreeNode::Split { feature, threshold, left, right } => {
                    id = if values[*feature] <= *threshold { *left } else { *right };
                }
                leaf => return leaf,
            }
        }
    }

    /// Class index of the leaf reached by `values`.
    pub fn class_for(&self, values: &[f64]) -> usize {
        let mut id = Self::ROOT;
        loop {
            match &self.nodes[id] {
                TreeNode::Split { feature, threshold, left, right } => {
                    id = if values[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { class, .. } => return *class,
            }
        }
    }

    /// Number of edges on the longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(Self::ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match &self.nodes[id] {
                TreeNode::Leaf { .. } => deepest = deepest.max(depth),
                TreeNode::Split { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        deepest
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of training instances that reached node `id`.
    pub fn instance_count(&self, id: NodeId) -> usize {
        let mut total = 0;
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            match &self.nodes[id] {
                TreeNode::Leaf { distribution, .. } => total += distribution.iter().map(|(_, c)| c).sum::<usize>(),
                TreeNode::Split { left, right, .. } => {
                    stack.push(*left);
                    stack.push(*right);
                }
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(class: usize, label: &str, distribution: &[(&str, usize)]) -> TreeNode {
        TreeNode::Leaf {
            class,
            label: label.to_string(),
            distribution: distribution.iter().map(|(l, c)| (l.to_string(), *c)).collect(),
        }
    }

    fn sample_tree() -> DecisionTree {
        let labels = vec!["rice".to_string(), "chickpea".to_string(), "wheat".to_string()];
        DecisionTree::from_parts(
            vec![
                TreeNode::Split { feature: 0, threshold: 50.0, left: 1, right: 2 },
                leaf(0, "rice", &[("rice", 3)]),
                TreeNode::Split { feature: 6, threshold: 120.0, left: 3, right: 4 },
                leaf(1, "chickpea", &[("chickpea", 2)]),
                leaf(2, "wheat", &[("chickpea", 1), ("wheat", 4)]),
            ],
            labels,
        )
    }

    #[test]
    fn test_tree_measures() {
        let tree = sample_tree();
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.instance_count(DecisionTree::ROOT), 10);
        assert_eq!(tree.instance_count(2), 7);
        assert_eq!(tree.root().feature(), Some(Feature::N));
        assert!(!tree.root().is_leaf());
    }

    #[test]
    fn test_leaf_for_walks_thresholds() {
        let tree = sample_tree();
        let mut values = [40.0, 0.0, 0.0, 0.0, 0.0, 0.0, 300.0];
        assert!(matches!(tree.leaf_for(&values), TreeNode::Leaf { class: 0, .. }));
        values[0] = 60.0;
        assert!(matches!(tree.leaf_for(&values), TreeNode::Leaf { class: 2, .. }));
        values[6] = 120.0;
        assert!(matches!(tree.leaf_for(&values), TreeNode::Leaf { class: 1, .. }));
        assert_eq!(tree.class_for(&values), 1);
        assert_eq!(tree.labels()[tree.class_for(&values)], "chickpea");
    }

    #[test]
    fn test_single_leaf_measures() {
        let tree = DecisionTree::from_parts(vec![leaf(0, "maize", &[("maize", 7)])], vec!["maize".to_string()]);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root().feature(), None);
    }

    #[test]
    fn test_deep_chain_measures_without_recursion() {
        // Right-leaning chain: every split sends one instance left to a leaf.
        let n = 50_000;
        let mut nodes = Vec::with_capacity(2 * n + 1);
        for i in 0..n {
            let id = nodes.len();
            nodes.push(TreeNode::Split { feature: 0, threshold: i as f64 + 0.5, left: id + 1, right: id + 2 });
            nodes.push(leaf(0, "a", &[("a", 1)]));
        }
        nodes.push(leaf(0, "a", &[("a", 1)]));
        let tree = DecisionTree::from_parts(nodes, vec!["a".to_string()]);

        assert_eq!(tree.depth(), n);
        assert_eq!(tree.leaf_count(), n + 1);
        assert_eq!(tree.instance_count(DecisionTree::ROOT), n + 1);
        let copy = tree.clone();
        assert_eq!(copy, tree);
    }
}
