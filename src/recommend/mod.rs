//! Medicine and diet recommendation lookup.
//!
//! Resolution order for a predicted disease: sidecar override table, then
//! medicine/diet text embedded in the training rows, then the built-in
//! default catalog, then a generic placeholder. Lookup is exact-match on the
//! canonicalized disease name; there is no fuzzy matching here.

use std::path::Path;

use arrow::record_batch::RecordBatch;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ParseWarning, Result};
use crate::format::values::cell_to_string;
use crate::format::{disease_column, is_diet_column, is_medicines_column, optional_column};
use crate::model::{canonicalize, split_delimited};
use crate::reader;

/// Medicine and diet guidance for one disease
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Medicine items, in catalog order
    pub medicines: Vec<String>,
    /// Diet items, in catalog order
    pub diet: Vec<String>,
}

/// Disease-keyed recommendation lookup
#[derive(Debug, Clone)]
pub struct RecommendationTable {
    overrides: FxHashMap<String, Recommendation>,
    defaults: FxHashMap<String, Recommendation>,
    placeholder: Recommendation,
}

impl Default for RecommendationTable {
    fn default() -> Self {
        let mut defaults = FxHashMap::default();
        defaults.insert(
            "common_cold".to_string(),
            Recommendation {
                medicines: items(&["Rest", "Plenty of fluids", "Paracetamol for fever"]),
                diet: items(&["Warm liquids", "Light foods", "Vitamin C rich foods"]),
            },
        );
        defaults.insert(
            "gastroenteritis".to_string(),
            Recommendation {
                medicines: items(&["ORS", "Anti-emetics if needed", "Probiotics"]),
                diet: items(&["BRAT diet", "Clear fluids"]),
            },
        );

        Self {
            overrides: FxHashMap::default(),
            defaults,
            placeholder: Recommendation {
                medicines: items(&["Consult a healthcare provider"]),
                diet: items(&["Maintain a balanced diet"]),
            },
        }
    }
}

impl RecommendationTable {
    /// Table with the built-in default catalog and no overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a sidecar override file (`disease, medicines, diet` columns).
    ///
    /// Malformed rows are skipped and returned as warnings; an override row
    /// replaces the entire entry for its disease.
    pub fn load_overrides(&mut self, path: &Path, batch_size: usize, infer_rows: usize) -> Result<Vec<ParseWarning>> {
        let batches = reader::read_batches(path, batch_size, infer_rows)?;
        let mut warnings = Vec::new();

        let mut base_row = 0;
        for batch in &batches {
            self.collect_overrides(batch, base_row, &mut warnings)?;
            base_row += batch.num_rows();
        }

        info!(
            "Loaded {} recommendation overrides from {}",
            self.overrides.len(),
            path.display()
        );
        Ok(warnings)
    }

    fn collect_overrides(
        &mut self,
        batch: &RecordBatch,
        base_row: usize,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<()> {
        let schema = batch.schema();
        let disease = disease_column(&schema)?;
        let medicines = optional_column(&schema, is_medicines_column);
        let diet = optional_column(&schema, is_diet_column);

        for row in 0..batch.num_rows() {
            let Some(name) = cell_to_string(batch.column(disease), row) else {
                warnings.push(ParseWarning::row(base_row + row, "missing disease name"));
                continue;
            };
            let entry = Recommendation {
                medicines: medicines
                    .and_then(|col| cell_to_string(batch.column(col), row))
                    .map(|cell| split_delimited(&cell).into_vec())
                    .unwrap_or_default(),
                diet: diet
                    .and_then(|col| cell_to_string(batch.column(col), row))
                    .map(|cell| split_delimited(&cell).into_vec())
                    .unwrap_or_default(),
            };
            self.overrides.insert(canonicalize(&name), entry);
        }
        Ok(())
    }

    /// Resolve guidance for a canonical disease name.
    ///
    /// An override entry wins outright. Otherwise each field falls through
    /// embedded training-row text, the default catalog, and finally the
    /// placeholder.
    #[must_use]
    pub fn resolve(
        &self,
        canonical_disease: &str,
        embedded_medicines: &[String],
        embedded_diet: &[String],
    ) -> Recommendation {
        if let Some(entry) = self.overrides.get(canonical_disease) {
            return entry.clone();
        }

        let catalog = self.defaults.get(canonical_disease);
        let medicines = first_non_empty(
            embedded_medicines,
            catalog.map(|entry| entry.medicines.as_slice()),
            &self.placeholder.medicines,
        );
        let diet = first_non_empty(
            embedded_diet,
            catalog.map(|entry| entry.diet.as_slice()),
            &self.placeholder.diet,
        );
        Recommendation { medicines, diet }
    }

    /// True when a sidecar entry exists for the disease
    #[must_use]
    pub fn has_override(&self, canonical_disease: &str) -> bool {
        self.overrides.contains_key(canonical_disease)
    }
}

fn first_non_empty(embedded: &[String], catalog: Option<&[String]>, placeholder: &[String]) -> Vec<String> {
    if !embedded.is_empty() {
        return embedded.to_vec();
    }
    match catalog {
        Some(items) if !items.is_empty() => items.to_vec(),
        _ => placeholder.to_vec(),
    }
}

fn items(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}
