//! Prediction service facade.
//!
//! Owns the lazily-trained model artifact and answers ranked predictions.
//! The artifact is built at most once per process behind a training gate:
//! the first caller runs load-parse-build-train, concurrent callers wait on
//! the gate, and every later call reads the same immutable artifact without
//! contention. A dataset change only takes effect through [`PredictionService::rebuild`].

use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};

use log::warn;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::classifier::{self, TrainOptions};
use crate::config::EngineConfig;
use crate::error::{EngineError, ParseWarning, Result, log_warnings};
use crate::model::artifact::{DatasetSource, ModelArtifact};
use crate::model::{canonicalize, synthetic};
use crate::reader;
use crate::recommend::RecommendationTable;

/// One ranked disease in a prediction response
#[derive(Debug, Clone, Serialize)]
pub struct RankedDisease {
    /// Disease name in display form
    pub disease: String,
    /// Fraction of trees voting for this disease, in [0, 1]
    pub confidence: f64,
    /// Resolved medicine guidance
    pub medicines: Vec<String>,
    /// Resolved diet guidance
    pub diet: Vec<String>,
}

/// How a prediction concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionOutcome {
    /// At least one known symptom produced a ranking
    Ranked,
    /// No input symptom is in the vocabulary; no disease is claimed
    NoEvidence,
}

/// Response of one prediction call
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// How the call concluded
    pub outcome: PredictionOutcome,
    /// Ranked diseases, non-increasing in confidence
    pub ranking: Vec<RankedDisease>,
    /// Input symptoms not present in the vocabulary, canonicalized
    pub dropped_symptoms: Vec<String>,
}

/// Facade over the trained artifact and the recommendation table
#[derive(Debug)]
pub struct PredictionService {
    config: EngineConfig,
    recommendations: RecommendationTable,
    artifact: RwLock<Option<Arc<ModelArtifact>>>,
    train_gate: Mutex<()>,
    parse_warnings: RwLock<Vec<ParseWarning>>,
}

impl PredictionService {
    /// Create a service; the model is not trained until first use.
    ///
    /// The recommendation override sidecar, when configured, is loaded here.
    /// A missing or unreadable sidecar degrades to the built-in defaults with
    /// a warning rather than failing construction.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let mut recommendations = RecommendationTable::new();
        if let Some(path) = &config.override_path {
            match recommendations.load_overrides(path, config.batch_size, config.infer_rows) {
                Ok(warnings) => log_warnings(path, &warnings),
                Err(error) => warn!(
                    "Recommendation overrides unavailable at {}: {error}",
                    path.display()
                ),
            }
        }

        Self {
            config,
            recommendations,
            artifact: RwLock::new(None),
            train_gate: Mutex::new(()),
            parse_warnings: RwLock::new(Vec::new()),
        }
    }

    /// Rank diseases for a free-text symptom list.
    ///
    /// Blocks on the training gate when the artifact does not exist yet.
    /// `top_k` is clamped to at least 1; diseases with zero votes are never
    /// returned.
    pub fn predict<S: AsRef<str>>(&self, symptoms: &[S], top_k: usize) -> Result<Prediction> {
        let artifact = self.artifact()?;
        Ok(self.predict_with(&artifact, symptoms, top_k))
    }

    /// Non-blocking variant of [`PredictionService::predict`].
    ///
    /// Surfaces [`EngineError::Initializing`] when another caller holds the
    /// training gate, so callers can retry instead of queueing.
    pub fn try_predict<S: AsRef<str>>(&self, symptoms: &[S], top_k: usize) -> Result<Prediction> {
        if let Some(artifact) = self.installed() {
            return Ok(self.predict_with(&artifact, symptoms, top_k));
        }

        match self.train_gate.try_lock() {
            Ok(_gate) => {
                let artifact = self.install_if_absent()?;
                Ok(self.predict_with(&artifact, symptoms, top_k))
            }
            Err(TryLockError::WouldBlock | TryLockError::Poisoned(_)) => {
                Err(EngineError::Initializing)
            }
        }
    }

    /// The trained artifact, training it first when absent
    pub fn artifact(&self) -> Result<Arc<ModelArtifact>> {
        if let Some(artifact) = self.installed() {
            return Ok(artifact);
        }
        let _gate = self.train_gate.lock().unwrap_or_else(PoisonError::into_inner);
        self.install_if_absent()
    }

    /// Train a fresh artifact from the current dataset and swap it in.
    ///
    /// This is the only way a changed source dataset takes effect within a
    /// running process.
    pub fn rebuild(&self) -> Result<Arc<ModelArtifact>> {
        let _gate = self.train_gate.lock().unwrap_or_else(PoisonError::into_inner);
        let artifact = Arc::new(self.train_new_artifact()?);
        *self
            .artifact
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&artifact));
        Ok(artifact)
    }

    /// Vocabulary entries in display form, training first when needed
    pub fn available_symptoms(&self) -> Result<Vec<String>> {
        Ok(self.artifact()?.vocabulary.display_terms())
    }

    /// Near-miss vocabulary suggestions for an unrecognized symptom name
    pub fn similar_symptoms(&self, symptom: &str) -> Result<Vec<String>> {
        let artifact = self.artifact()?;
        let suggestions = artifact
            .vocabulary
            .similar(&canonicalize(symptom), 2, 5)
            .iter()
            .map(|term| crate::model::display_form(term))
            .collect();
        Ok(suggestions)
    }

    /// Warnings accumulated by the most recent dataset load
    #[must_use]
    pub fn parse_warnings(&self) -> Vec<ParseWarning> {
        self.parse_warnings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn installed(&self) -> Option<Arc<ModelArtifact>> {
        self.artifact
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
    }

    /// Caller must hold the training gate
    fn install_if_absent(&self) -> Result<Arc<ModelArtifact>> {
        // A concurrent caller may have installed while we waited on the gate.
        if let Some(artifact) = self.installed() {
            return Ok(artifact);
        }
        let artifact = Arc::new(self.train_new_artifact()?);
        *self
            .artifact
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&artifact));
        Ok(artifact)
    }

    fn train_new_artifact(&self) -> Result<ModelArtifact> {
        let options = TrainOptions::from(&self.config);

        match reader::load_dataset(&self.config) {
            Ok(parsed) if !parsed.records.is_empty() => {
                *self
                    .parse_warnings
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = parsed.warnings.clone();
                return classifier::train(&parsed.records, DatasetSource::File(parsed.path), &options);
            }
            Ok(parsed) => warn!(
                "Dataset {} produced no parsable rows, falling back to the synthetic catalog",
                parsed.path.display()
            ),
            Err(error) => warn!("{error}, falling back to the synthetic catalog"),
        }

        classifier::train(&synthetic::records(), DatasetSource::Synthetic, &options)
    }

    fn predict_with<S: AsRef<str>>(
        &self,
        artifact: &ModelArtifact,
        symptoms: &[S],
        top_k: usize,
    ) -> Prediction {
        let query: FxHashSet<String> = symptoms
            .iter()
            .map(|symptom| canonicalize(symptom.as_ref()))
            .filter(|symptom| !symptom.is_empty())
            .collect();

        let (vector, dropped) = artifact
            .vocabulary
            .encode(query.iter().map(String::as_str));
        if vector.iter().all(|&bit| bit == 0) {
            // Zero evidence: no disease may be claimed with confidence > 0.
            return Prediction {
                outcome: PredictionOutcome::NoEvidence,
                ranking: Vec::new(),
                dropped_symptoms: sorted(dropped),
            };
        }

        let votes = artifact.forest.vote_fractions(&vector);
        let mut candidates: Vec<(usize, f64)> = votes
            .into_iter()
            .enumerate()
            .filter(|&(_, confidence)| confidence > 0.0)
            .collect();
        candidates.sort_by(|a, b| {
            b.1.total_cmp(&a.1).then_with(|| {
                // Exact vote ties: larger symptom overlap first, then
                // canonical name order (the class index order).
                artifact
                    .class_overlap(b.0, &query)
                    .total_cmp(&artifact.class_overlap(a.0, &query))
                    .then_with(|| a.0.cmp(&b.0))
            })
        });

        let ranking = candidates
            .into_iter()
            .take(top_k.max(1))
            .filter_map(|(label, confidence)| {
                let entry = artifact.labels.get(label)?;
                let row = artifact.best_row_for(label, &query);
                let recommendation = self.recommendations.resolve(
                    &entry.canonical,
                    row.map_or(&[], |r| r.medicines.as_slice()),
                    row.map_or(&[], |r| r.diet.as_slice()),
                );
                Some(RankedDisease {
                    disease: entry.display.clone(),
                    confidence,
                    medicines: recommendation.medicines,
                    diet: recommendation.diet,
                })
            })
            .collect();

        Prediction {
            outcome: PredictionOutcome::Ranked,
            ranking,
            dropped_symptoms: sorted(dropped),
        }
    }
}

fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort_unstable();
    values
}
