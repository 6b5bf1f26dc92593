//! Symptom vocabulary and disease label set.
//!
//! Both are built in one pass over the canonical records and sorted
//! lexicographically, so feature-vector positions and label indices are
//! stable across retrains of the same dataset content.

use itertools::Itertools;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::model::{CanonicalRecord, display_form};

/// Ordered, deduplicated set of canonical symptom names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    /// Number of known symptoms, i.e. the feature-vector length
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when no symptom is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Canonical terms in feature order
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Feature index of a canonical symptom name
    #[must_use]
    pub fn index_of(&self, canonical: &str) -> Option<usize> {
        self.terms.binary_search_by(|term| term.as_str().cmp(canonical)).ok()
    }

    /// Encode a set of canonical symptoms into a fixed-length 0/1 vector.
    ///
    /// Returns the vector together with the input symptoms that are not in
    /// the vocabulary; those are dropped from the encoding, never an error.
    #[must_use]
    pub fn encode<'a, I>(&self, canonical_symptoms: I) -> (Vec<u8>, Vec<String>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut vector = vec![0u8; self.terms.len()];
        let mut dropped = Vec::new();
        for symptom in canonical_symptoms {
            match self.index_of(symptom) {
                Some(idx) => vector[idx] = 1,
                None => dropped.push(symptom.to_string()),
            }
        }
        (vector, dropped)
    }

    /// Vocabulary entries in display form, in feature order
    #[must_use]
    pub fn display_terms(&self) -> Vec<String> {
        self.terms.iter().map(|term| display_form(term)).collect()
    }

    /// Vocabulary entries within `max_distance` edits of the given name.
    ///
    /// Results are ordered by distance, then lexicographically, and capped at
    /// `limit`. Used to suggest near-miss symptom names, never to silently
    /// substitute them.
    #[must_use]
    pub fn similar(&self, canonical: &str, max_distance: usize, limit: usize) -> Vec<String> {
        self.terms
            .iter()
            .filter_map(|term| {
                let distance = edit_distance(canonical, term, max_distance)?;
                Some((distance, term))
            })
            .sorted()
            .take(limit)
            .map(|(_, term)| term.clone())
            .collect()
    }
}

/// Ordered, deduplicated set of disease labels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelSet {
    labels: Vec<Label>,
}

/// One disease label with its canonical and display forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Canonical name, the grouping key
    pub canonical: String,
    /// Name as first seen in the source, for display
    pub display: String,
}

impl LabelSet {
    /// Number of distinct diseases
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no disease is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label at a class index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    /// Class index of a canonical disease name
    #[must_use]
    pub fn index_of(&self, canonical: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|label| label.canonical.as_str().cmp(canonical))
            .ok()
    }

    /// All labels in class-index order
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

/// Build the vocabulary and label set from one pass over the records
#[must_use]
pub fn build(records: &[CanonicalRecord]) -> (Vocabulary, LabelSet) {
    let terms: Vec<String> = records
        .iter()
        .flat_map(|record| record.symptoms.iter())
        .unique()
        .sorted()
        .cloned()
        .collect();

    let mut seen = FxHashSet::default();
    let labels: Vec<Label> = records
        .iter()
        .filter(|record| seen.insert(record.disease.clone()))
        .map(|record| Label {
            canonical: record.disease.clone(),
            display: record.display_disease.clone(),
        })
        .sorted_by(|a, b| a.canonical.cmp(&b.canonical))
        .collect();

    (Vocabulary { terms }, LabelSet { labels })
}

/// Bounded Levenshtein distance; `None` when it exceeds `max_distance`
fn edit_distance(a: &str, b: &str, max_distance: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > max_distance {
        return None;
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        let mut row_min = current[0];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
            row_min = row_min.min(current[j + 1]);
        }
        if row_min > max_distance {
            return None;
        }
        std::mem::swap(&mut previous, &mut current);
    }

    (previous[b.len()] <= max_distance).then_some(previous[b.len()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CanonicalRecord;

    fn records() -> Vec<CanonicalRecord> {
        vec![
            CanonicalRecord::new("Flu", ["fever", "cough", "body aches"]).unwrap(),
            CanonicalRecord::new("Diabetes", ["excessive thirst", "blurred vision"]).unwrap(),
            CanonicalRecord::new("flu ", ["Fever", "chills"]).unwrap(),
        ]
    }

    #[test]
    fn vocabulary_is_sorted_and_deduplicated() {
        let (vocabulary, labels) = build(&records());
        assert_eq!(
            vocabulary.terms(),
            ["blurred_vision", "body_aches", "chills", "cough", "excessive_thirst", "fever"]
        );
        // Two "Flu" spellings collapse to one label.
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get(1).unwrap().canonical, "flu");
        assert_eq!(labels.get(1).unwrap().display, "Flu");
    }

    #[test]
    fn encode_sets_known_bits_and_reports_dropped() {
        let (vocabulary, _) = build(&records());
        let (vector, dropped) = vocabulary.encode(["fever", "cough", "martian_flu"].into_iter());
        assert_eq!(vector.len(), vocabulary.len());
        assert_eq!(vector.iter().map(|&b| usize::from(b)).sum::<usize>(), 2);
        assert_eq!(dropped, ["martian_flu"]);
    }

    #[test]
    fn label_index_is_canonical_order() {
        let (_, labels) = build(&records());
        assert_eq!(labels.index_of("diabetes"), Some(0));
        assert_eq!(labels.index_of("flu"), Some(1));
        assert_eq!(labels.index_of("cholera"), None);
    }

    #[test]
    fn similar_suggests_near_misses() {
        let (vocabulary, _) = build(&records());
        let suggestions = vocabulary.similar("fevre", 2, 3);
        assert_eq!(suggestions, ["fever"]);
        assert!(vocabulary.similar("zzzzzz", 2, 3).is_empty());
    }
}
