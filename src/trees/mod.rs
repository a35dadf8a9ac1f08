//! Decision tree induction over the seven numeric crop features.

pub mod decision_tree;
pub mod impurity;
pub mod node;
pub mod split;

pub use decision_tree::{classify, classify_class, DecisionTreeClassifier, TreeConfig, TreeInducer};
pub use node::{DecisionTree, NodeId, TreeNode};
pub use split::SplitCandidate;
