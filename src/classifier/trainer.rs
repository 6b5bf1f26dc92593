//! Training pipeline: canonical records to an immutable model artifact.

use chrono::Utc;
use itertools::Itertools;
use log::info;

use crate::classifier::{ForestParams, RandomForest};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::model::CanonicalRecord;
use crate::model::artifact::{self, DatasetSource, ModelArtifact, TrainingRow};
use crate::model::vocabulary;

/// Options governing one training run
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Number of trees
    pub trees: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Base RNG seed
    pub seed: u64,
}

impl From<&EngineConfig> for TrainOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            trees: config.trees,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            seed: config.seed,
        }
    }
}

/// Train a model artifact from canonical records.
///
/// Builds the vocabulary and label set, encodes every record against them,
/// fits the forest, and packages the result. The only failure mode is an
/// empty record set.
pub fn train(
    records: &[CanonicalRecord],
    source: DatasetSource,
    options: &TrainOptions,
) -> Result<ModelArtifact> {
    if records.is_empty() {
        return Err(EngineError::EmptyTrainingSet);
    }

    let (vocab, labels) = vocabulary::build(records);

    let mut samples = Vec::with_capacity(records.len());
    let mut sample_labels = Vec::with_capacity(records.len());
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        // Every record symptom is in the vocabulary by construction.
        let Some(label) = labels.index_of(&record.disease) else {
            continue;
        };
        let (vector, _) = vocab.encode(record.symptoms.iter().map(String::as_str));
        samples.push(vector);
        sample_labels.push(label);
        rows.push(TrainingRow {
            label,
            symptoms: record.symptoms.iter().sorted().cloned().collect(),
            medicines: record.medicines.to_vec(),
            diet: record.diet.to_vec(),
        });
    }

    let params = ForestParams {
        trees: options.trees,
        max_depth: options.max_depth,
        min_samples_split: options.min_samples_split,
        seed: options.seed,
    };
    let forest = RandomForest::fit(&samples, &sample_labels, labels.len(), &params);

    info!(
        "Trained forest of {} trees over {} rows ({} symptoms, {} diseases)",
        forest.len(),
        samples.len(),
        vocab.len(),
        labels.len()
    );

    Ok(ModelArtifact {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        fingerprint: artifact::fingerprint(records),
        vocabulary: vocab,
        labels,
        forest,
        rows,
        source,
        trained_at: Utc::now(),
    })
}
