//! Configuration for the prediction engine.

use std::path::PathBuf;

/// Configuration for the prediction engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory searched when no explicit dataset path is given
    pub data_dir: PathBuf,
    /// Explicit dataset file, bypassing discovery
    pub dataset_path: Option<PathBuf>,
    /// Optional sidecar file overriding medicine/diet recommendations
    pub override_path: Option<PathBuf>,
    /// Number of trees in the forest
    pub trees: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Seed for bootstrap and feature sampling
    pub seed: u64,
    /// Batch size for CSV reading
    pub batch_size: usize,
    /// Number of rows sampled for schema inference
    pub infer_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            dataset_path: None,
            override_path: None,
            trees: 200,
            max_depth: 12,
            min_samples_split: 2,
            seed: 42,
            batch_size: 8192,
            infer_rows: 256,
        }
    }
}

impl EngineConfig {
    /// Configuration pointing at a specific dataset file
    #[must_use]
    pub fn with_dataset(path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: Some(path.into()),
            ..Self::default()
        }
    }
}
