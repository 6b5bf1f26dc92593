//! Canonical record model shared by all dataset formats.
//!
//! Every supported file layout is normalized into [`CanonicalRecord`]s before
//! the vocabulary is built, so the rest of the engine never sees the shape of
//! the source file.

pub mod artifact;
pub mod synthetic;
pub mod vocabulary;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// One disease/symptom observation in the engine's unified shape
#[derive(Debug, Clone)]
pub struct CanonicalRecord {
    /// Canonical disease name used for grouping and lookups
    pub disease: String,
    /// Disease name as it appeared in the source, for display
    pub display_disease: String,
    /// Canonical symptom names present in this observation
    pub symptoms: FxHashSet<String>,
    /// Medicine recommendation items embedded in the source row, original casing
    pub medicines: SmallVec<[String; 4]>,
    /// Diet recommendation items embedded in the source row, original casing
    pub diet: SmallVec<[String; 4]>,
}

impl CanonicalRecord {
    /// Create a record from a raw disease name and raw symptom names.
    ///
    /// Symptoms that canonicalize to the empty string are dropped. Returns
    /// `None` when the disease name is empty or no symptom survives, which the
    /// parsers report as a skipped row.
    #[must_use]
    pub fn new<S: AsRef<str>>(raw_disease: &str, raw_symptoms: impl IntoIterator<Item = S>) -> Option<Self> {
        let disease = canonicalize(raw_disease);
        if disease.is_empty() {
            return None;
        }

        let symptoms: FxHashSet<String> = raw_symptoms
            .into_iter()
            .map(|s| canonicalize(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        if symptoms.is_empty() {
            return None;
        }

        Some(Self {
            disease,
            display_disease: raw_disease.trim().to_string(),
            symptoms,
            medicines: SmallVec::new(),
            diet: SmallVec::new(),
        })
    }

    /// Attach medicine and diet items parsed from the source row
    #[must_use]
    pub fn with_recommendations(
        mut self,
        medicines: SmallVec<[String; 4]>,
        diet: SmallVec<[String; 4]>,
    ) -> Self {
        self.medicines = medicines;
        self.diet = diet;
        self
    }
}

/// Canonicalize a symptom or disease name.
///
/// Trims, lowercases, and collapses runs of whitespace and underscores into a
/// single underscore, so syntactic variants of one name collapse to one
/// vocabulary entry. Missing-value markers canonicalize to the empty string.
#[must_use]
pub fn canonicalize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() || lowered == "nan" || lowered == "none" {
        return String::new();
    }

    lowered
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Convert a canonical name back to a display form (`body_aches` -> `Body Aches`)
#[must_use]
pub fn display_form(canonical: &str) -> String {
    canonical
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a delimited cell (`,` or `;`) into trimmed, non-empty items.
///
/// Items keep their original casing; callers canonicalize when needed.
#[must_use]
pub fn split_delimited(cell: &str) -> SmallVec<[String; 4]> {
    cell.split([',', ';'])
        .map(str::trim)
        .filter(|item| !item.is_empty() && !item.eq_ignore_ascii_case("nan"))
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_collapses_variants() {
        assert_eq!(canonicalize("  Body  Aches "), "body_aches");
        assert_eq!(canonicalize("body_aches"), "body_aches");
        assert_eq!(canonicalize("BODY__ACHES"), "body_aches");
        assert_eq!(canonicalize("body \t aches"), "body_aches");
    }

    #[test]
    fn canonicalize_drops_missing_markers() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("   "), "");
        assert_eq!(canonicalize("NaN"), "");
    }

    #[test]
    fn display_form_round_trips() {
        assert_eq!(display_form("body_aches"), "Body Aches");
        assert_eq!(display_form("fever"), "Fever");
    }

    #[test]
    fn record_requires_disease_and_symptoms() {
        assert!(CanonicalRecord::new("", ["fever"]).is_none());
        assert!(CanonicalRecord::new("Flu", Vec::<String>::new()).is_none());
        assert!(CanonicalRecord::new("Flu", ["  ", "nan"]).is_none());

        let record = CanonicalRecord::new("Flu", ["Fever", "body aches"]).unwrap();
        assert_eq!(record.disease, "flu");
        assert_eq!(record.display_disease, "Flu");
        assert!(record.symptoms.contains("fever"));
        assert!(record.symptoms.contains("body_aches"));
    }

    #[test]
    fn split_delimited_handles_both_separators() {
        let items = split_delimited("Rest, fluids; Paracetamol");
        assert_eq!(items.as_slice(), ["Rest", "fluids", "Paracetamol"]);
        assert!(split_delimited(" , ;nan").is_empty());
    }
}
