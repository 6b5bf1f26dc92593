//! Shared helpers for integration tests.

use std::path::{Path, PathBuf};

use dx_engine::{EngineConfig, PredictionService};

/// Write a CSV fixture into a test directory
pub fn write_dataset(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write test dataset");
    path
}

/// Engine configuration pinned for test determinism.
///
/// A larger forest keeps vote fractions stable on the tiny fixtures used
/// here; the seed is the library default.
pub fn test_config(dataset: &Path) -> EngineConfig {
    EngineConfig {
        dataset_path: Some(dataset.to_path_buf()),
        trees: 500,
        ..EngineConfig::default()
    }
}

/// Service over one fixture dataset
pub fn service_for(dataset: &Path) -> PredictionService {
    PredictionService::new(test_config(dataset))
}

/// Top-ranked disease name for a query, panicking when the ranking is empty
pub fn top1(service: &PredictionService, symptoms: &[&str]) -> String {
    let prediction = service.predict(symptoms, 1).expect("prediction");
    prediction
        .ranking
        .first()
        .unwrap_or_else(|| panic!("empty ranking for {symptoms:?}"))
        .disease
        .clone()
}
