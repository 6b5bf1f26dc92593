//! Immutable model artifact produced by one training run.
//!
//! The artifact bundles everything a prediction needs: vocabulary, label set,
//! trained forest, the training rows (for recommendation lookup and overlap
//! tie-breaks), and a fingerprint of the dataset content. It is never mutated
//! in place; a dataset change requires training a new artifact and swapping
//! it in.

use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use rustc_hash::{FxHashSet, FxHasher};
use serde::{Deserialize, Serialize};

use crate::classifier::RandomForest;
use crate::error::{EngineError, Result};
use crate::model::CanonicalRecord;
use crate::model::vocabulary::{LabelSet, Vocabulary};

/// One training row retained inside the artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRow {
    /// Class index into the label set
    pub label: usize,
    /// Canonical symptoms of this row, sorted
    pub symptoms: Vec<String>,
    /// Medicine items embedded in the source row
    pub medicines: Vec<String>,
    /// Diet items embedded in the source row
    pub diet: Vec<String>,
}

impl TrainingRow {
    /// Jaccard similarity between this row's symptoms and a query set
    #[must_use]
    pub fn jaccard(&self, query: &FxHashSet<String>) -> f64 {
        if self.symptoms.is_empty() || query.is_empty() {
            return 0.0;
        }
        let intersection = query
            .iter()
            .filter(|symptom| self.symptoms.binary_search(symptom).is_ok())
            .count();
        let union = self.symptoms.len() + query.len() - intersection;
        intersection as f64 / union as f64
    }

    /// Number of query symptoms present in this row
    #[must_use]
    pub fn overlap(&self, query: &FxHashSet<String>) -> usize {
        query
            .iter()
            .filter(|symptom| self.symptoms.binary_search(symptom).is_ok())
            .count()
    }
}

/// Where the training data came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetSource {
    /// A caller-supplied or discovered file
    File(std::path::PathBuf),
    /// The built-in synthetic fallback
    Synthetic,
}

/// Immutable bundle of one training run
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Engine version that produced the artifact
    pub engine_version: String,
    /// Symptom vocabulary fixing feature-vector positions
    pub vocabulary: Vocabulary,
    /// Disease label set fixing class indices
    pub labels: LabelSet,
    /// Trained forest
    pub forest: RandomForest,
    /// Training rows, for recommendations and overlap tie-breaks
    pub rows: Vec<TrainingRow>,
    /// Fingerprint of the parsed dataset content
    pub fingerprint: u64,
    /// Source the artifact was trained from
    pub source: DatasetSource,
    /// When training completed
    pub trained_at: DateTime<Utc>,
}

impl ModelArtifact {
    /// Persist the artifact as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)
            .map_err(|e| EngineError::Artifact(format!("serialize failed: {e}")))?;
        fs::write(path, json)?;
        log::info!("Saved model artifact to {}", path.display());
        Ok(())
    }

    /// Restore an artifact previously written by [`ModelArtifact::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let artifact: Self = serde_json::from_str(&json)
            .map_err(|e| EngineError::Artifact(format!("deserialize failed: {e}")))?;
        log::info!(
            "Loaded model artifact from {} ({} symptoms, {} diseases)",
            path.display(),
            artifact.vocabulary.len(),
            artifact.labels.len()
        );
        Ok(artifact)
    }

    /// Best-overlap training row for a class, if any row exists for it.
    ///
    /// Rows of the class are compared by intersection size with the query;
    /// the first row wins ties, matching the source-row order of the dataset.
    #[must_use]
    pub fn best_row_for(&self, label: usize, query: &FxHashSet<String>) -> Option<&TrainingRow> {
        self.rows
            .iter()
            .filter(|row| row.label == label)
            .map(|row| (row.overlap(query), row))
            .reduce(|best, candidate| if candidate.0 > best.0 { candidate } else { best })
            .map(|(_, row)| row)
    }

    /// Largest Jaccard similarity between the query and any row of a class
    #[must_use]
    pub fn class_overlap(&self, label: usize, query: &FxHashSet<String>) -> f64 {
        self.rows
            .iter()
            .filter(|row| row.label == label)
            .map(|row| row.jaccard(query))
            .fold(0.0, f64::max)
    }
}

/// Fingerprint of parsed dataset content.
///
/// Stable across format variants: it hashes the canonical records, not the
/// bytes of the source file.
#[must_use]
pub fn fingerprint(records: &[CanonicalRecord]) -> u64 {
    let mut hasher = FxHasher::default();
    for record in records {
        record.disease.hash(&mut hasher);
        for symptom in record.symptoms.iter().sorted() {
            symptom.hash(&mut hasher);
        }
        record.medicines.hash(&mut hasher);
        record.diet.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CanonicalRecord;

    #[test]
    fn fingerprint_ignores_symptom_order_within_a_record() {
        let a = vec![CanonicalRecord::new("Flu", ["fever", "cough"]).unwrap()];
        let b = vec![CanonicalRecord::new("Flu", ["cough", "fever"]).unwrap()];
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn fingerprint_distinguishes_content() {
        let a = vec![CanonicalRecord::new("Flu", ["fever"]).unwrap()];
        let b = vec![CanonicalRecord::new("Flu", ["chills"]).unwrap()];
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn jaccard_and_overlap() {
        let row = TrainingRow {
            label: 0,
            symptoms: vec!["cough".into(), "fever".into()],
            medicines: vec![],
            diet: vec![],
        };
        let query: FxHashSet<String> = ["fever".to_string(), "chills".to_string()].into_iter().collect();
        assert_eq!(row.overlap(&query), 1);
        let jaccard = row.jaccard(&query);
        assert!((jaccard - 1.0 / 3.0).abs() < 1e-9);
    }
}
