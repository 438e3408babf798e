// src/machine_learning/mod.rs
//! Metric-learning pipeline
//!
//! Dataset handling, the trainable embedding with its overlap/cost
//! evaluator, the optimizers, the mini-batch trainer, and the
//! similarity-vote classifier.

pub mod classifier;
pub mod dataset;
pub mod embedding;
pub mod optimizer;
pub mod trainer;

pub use classifier::{ConfusionTally, OverlapClassifier};
pub use dataset::{DatasetError, MetricDataset};
pub use embedding::{cost, mean_overlap, overlap, project, ModelError, ParameterBundle};
pub use optimizer::{GradientDescent, Optimizer, RMSProp};
pub use trainer::{MetricTrainer, TrainingConfig, CLASS_A_LABEL, CLASS_B_LABEL};

/// Re-exports of commonly used components
pub mod prelude {
    pub use super::classifier::{ConfusionTally, OverlapClassifier};
    pub use super::dataset::{DatasetError, MetricDataset};
    pub use super::embedding::{cost, mean_overlap, overlap, project, ModelError, ParameterBundle};
    pub use super::optimizer::{GradientDescent, Optimizer, RMSProp};
    pub use super::trainer::{MetricTrainer, TrainingConfig};
}
