//! Built-in synthetic fallback dataset.
//!
//! Used when no caller-supplied dataset can be loaded, so the service stays
//! usable instead of failing at startup. The catalog is intentionally small:
//! common self-limiting conditions with well-separated symptom profiles.

use crate::model::{CanonicalRecord, split_delimited};

/// One synthetic entry: disease, symptoms, medicines, diet
const CATALOG: &[(&str, &str, &str, &str)] = &[
    (
        "Common Cold",
        "runny nose, sneezing, sore throat, cough, congestion",
        "Rest, plenty of fluids, paracetamol for fever",
        "Warm liquids, light foods, vitamin C rich foods",
    ),
    (
        "Influenza",
        "fever, cough, body aches, chills, fatigue, headache",
        "Rest, fluids, antiviral medication if prescribed",
        "Plenty of fluids, light foods",
    ),
    (
        "Gastroenteritis",
        "stomach pain, nausea, vomiting, diarrhea, dehydration",
        "ORS, anti-emetics if needed, probiotics",
        "BRAT diet, clear fluids",
    ),
    (
        "Migraine",
        "headache, nausea, visual disturbances, dizziness",
        "Pain relievers, rest in a dark room",
        "Regular meals, adequate hydration",
    ),
    (
        "Allergic Rhinitis",
        "sneezing, runny nose, itching, watering from eyes",
        "Antihistamines, nasal spray",
        "Avoid known food triggers",
    ),
    (
        "Diabetes",
        "excessive thirst, frequent urination, blurred vision, weight loss, fatigue",
        "Consult a healthcare provider for glucose management",
        "Low sugar diet, regular meals, whole grains",
    ),
    (
        "Hypertension",
        "headache, dizziness, chest pain, shortness of breath",
        "Consult a healthcare provider for blood pressure management",
        "Low sodium diet, fruits and vegetables",
    ),
    (
        "Food Poisoning",
        "nausea, vomiting, abdominal cramps, fever, weakness",
        "ORS, rest, seek care if symptoms persist",
        "Clear fluids, bland foods once tolerated",
    ),
];

/// Build the synthetic fallback records
#[must_use]
pub fn records() -> Vec<CanonicalRecord> {
    CATALOG
        .iter()
        .filter_map(|&(disease, symptoms, medicines, diet)| {
            let raw: Vec<&str> = symptoms.split(',').map(str::trim).collect();
            CanonicalRecord::new(disease, raw).map(|record| {
                record.with_recommendations(split_delimited(medicines), split_delimited(diet))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_records_are_complete() {
        let records = records();
        assert_eq!(records.len(), CATALOG.len());
        for record in &records {
            assert!(!record.symptoms.is_empty());
            assert!(!record.medicines.is_empty());
            assert!(!record.diet.is_empty());
        }
    }
}
