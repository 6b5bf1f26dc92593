use std::time::Instant;

use anyhow::{Context, Result};
use dx_engine::{EngineConfig, PredictionOutcome, PredictionService};
use log::{info, warn};

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = EngineConfig::default();
    if let Some(path) = std::env::args().nth(1) {
        config.dataset_path = Some(path.into());
    } else if !config.data_dir.exists() {
        warn!(
            "Data directory not found: {}, using the built-in synthetic catalog",
            config.data_dir.display()
        );
    }

    let service = PredictionService::new(config);

    // Train eagerly so the first query timing below is pure prediction.
    let start = Instant::now();
    let artifact = service.artifact().context("initial model training failed")?;
    info!(
        "Model ready in {:?} ({} symptoms, {} diseases, fingerprint {:016x})",
        start.elapsed(),
        artifact.vocabulary.len(),
        artifact.labels.len(),
        artifact.fingerprint
    );

    let sample = ["fever", "cough", "body aches"];
    let start = Instant::now();
    let prediction = service
        .predict(&sample, 3)
        .with_context(|| format!("prediction failed for {sample:?}"))?;
    info!("Predicted {:?} in {:?}", sample, start.elapsed());

    if prediction.outcome == PredictionOutcome::NoEvidence {
        info!("No known symptoms in the query; nothing to rank");
    }
    for ranked in &prediction.ranking {
        info!(
            "{} ({:.1}%) - medicines: {}; diet: {}",
            ranked.disease,
            ranked.confidence * 100.0,
            ranked.medicines.join(", "),
            ranked.diet.join(", ")
        );
    }
    for dropped in &prediction.dropped_symptoms {
        let suggestions = service.similar_symptoms(dropped)?;
        if suggestions.is_empty() {
            info!("Unknown symptom: {dropped}");
        } else {
            info!("Unknown symptom: {dropped} (did you mean {}?)", suggestions.join(", "));
        }
    }

    Ok(())
}
