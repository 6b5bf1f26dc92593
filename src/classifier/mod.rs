//! Tree-ensemble classifier and training pipeline.

mod forest;
mod tree;
mod trainer;

pub use forest::{ForestParams, RandomForest};
pub use trainer::{TrainOptions, train};
pub use tree::{DecisionTree, TreeParams};
