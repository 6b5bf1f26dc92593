//! Dataset format detection and per-format parsers.
//!
//! Three file shapes are supported, each behind its own adapter implementing
//! [`FormatAdapter`]. Which adapter applies is decided by a pure, total
//! classification over the header row; there is no "unrecognized format"
//! failure mode, only degraded parsing when the data is genuinely
//! unstructured.

mod long;
mod multi_column;
mod one_hot;
pub mod values;

use std::fmt::Debug;

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

pub use long::LongFormat;
pub use multi_column::MultiColumnFormat;
pub use one_hot::OneHotFormat;

use crate::error::{ParseWarning, Result};
use crate::model::{CanonicalRecord, canonicalize};

/// Closed set of supported dataset shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// One row per disease with a single delimited `symptoms` column
    Long,
    /// One column per symptom holding boolean indicators
    OneHot,
    /// Numbered `symptom_1..symptom_n` columns, one name per cell
    MultiColumn,
}

impl DatasetFormat {
    /// Short name for logs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::OneHot => "one-hot",
            Self::MultiColumn => "multi-column",
        }
    }
}

/// Converter from record batches of one detected format to canonical records
pub trait FormatAdapter: Debug + Send + Sync {
    /// Convert one batch, appending row-scoped problems to `warnings`.
    ///
    /// `base_row` is the zero-based index of the batch's first data row
    /// within the whole file, so warnings stay addressable across batches.
    fn convert_batch(
        &self,
        batch: &RecordBatch,
        base_row: usize,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Vec<CanonicalRecord>>;
}

/// Classify a header row into one of the three supported formats.
///
/// A delimited `symptoms` column selects the long format; otherwise repeated
/// numbered symptom columns select the multi-column format; otherwise every
/// non-reserved column is treated as a one-hot indicator. Total by
/// construction.
#[must_use]
pub fn detect_format(schema: &Schema) -> DatasetFormat {
    let headers: Vec<String> = schema
        .fields()
        .iter()
        .map(|field| canonicalize(field.name()))
        .collect();

    let format = if headers.iter().any(|h| is_symptoms_column(h)) {
        DatasetFormat::Long
    } else if headers.iter().filter(|h| numbered_symptom(h).is_some()).count() >= 2 {
        DatasetFormat::MultiColumn
    } else {
        DatasetFormat::OneHot
    };

    log::debug!("Detected dataset format: {}", format.as_str());
    format
}

/// Build the adapter for a schema's detected format.
///
/// Fails with a schema error when the format's required columns (at minimum
/// a disease column) are missing; callers treat that as an unusable dataset,
/// not a fatal condition.
pub fn adapter_for(schema: &Schema) -> Result<(DatasetFormat, Box<dyn FormatAdapter>)> {
    let format = detect_format(schema);
    let adapter: Box<dyn FormatAdapter> = match format {
        DatasetFormat::Long => Box::new(LongFormat::from_schema(schema)?),
        DatasetFormat::OneHot => Box::new(OneHotFormat::from_schema(schema)?),
        DatasetFormat::MultiColumn => Box::new(MultiColumnFormat::from_schema(schema)?),
    };
    Ok((format, adapter))
}

/// Shared column-role classification over canonicalized header names
pub(crate) fn is_disease_column(header: &str) -> bool {
    matches!(header, "disease" | "prognosis")
}

pub(crate) fn is_symptoms_column(header: &str) -> bool {
    matches!(header, "symptoms" | "symptom" | "symptom_list")
}

pub(crate) fn is_medicines_column(header: &str) -> bool {
    matches!(header, "medicines" | "medicine" | "medicine_recommendation")
}

pub(crate) fn is_diet_column(header: &str) -> bool {
    matches!(header, "diet" | "diet_recommendation")
}

/// Column index suffix of a numbered symptom header (`symptom_3` -> 3)
pub(crate) fn numbered_symptom(header: &str) -> Option<usize> {
    let suffix = header.strip_prefix("symptom_")?;
    suffix.parse().ok()
}

/// Headers that never act as one-hot symptom indicators
pub(crate) fn is_reserved_column(header: &str) -> bool {
    is_disease_column(header)
        || is_medicines_column(header)
        || is_diet_column(header)
        || matches!(header, "notes" | "foods_to_avoid" | "hydration")
}

/// Resolve the disease column, shared by all adapters
pub(crate) fn disease_column(schema: &Schema) -> Result<usize> {
    schema
        .fields()
        .iter()
        .position(|field| is_disease_column(&canonicalize(field.name())))
        .ok_or_else(|| crate::error::EngineError::Schema("no disease column in header".to_string()))
}

/// Resolve an optional column by role predicate
pub(crate) fn optional_column(schema: &Schema, role: fn(&str) -> bool) -> Option<usize> {
    schema
        .fields()
        .iter()
        .position(|field| role(&canonicalize(field.name())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field};

    fn schema_of(names: &[&str]) -> Schema {
        Schema::new(
            names
                .iter()
                .map(|name| Field::new(*name, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn delimited_symptoms_column_selects_long() {
        let schema = schema_of(&["Disease", "Symptoms", "Medicines", "Diet"]);
        assert_eq!(detect_format(&schema), DatasetFormat::Long);
    }

    #[test]
    fn numbered_columns_select_multi_column() {
        let schema = schema_of(&["Disease", "Symptom_1", "Symptom_2", "Symptom_3"]);
        assert_eq!(detect_format(&schema), DatasetFormat::MultiColumn);

        // Header variants with spaces canonicalize the same way.
        let schema = schema_of(&["Disease", "Symptom 1", "Symptom 2"]);
        assert_eq!(detect_format(&schema), DatasetFormat::MultiColumn);
    }

    #[test]
    fn everything_else_is_one_hot() {
        let schema = schema_of(&["Disease", "fever", "cough", "body_aches"]);
        assert_eq!(detect_format(&schema), DatasetFormat::OneHot);

        // A single numbered column is not "repeated"; fall through to one-hot.
        let schema = schema_of(&["Disease", "Symptom_1"]);
        assert_eq!(detect_format(&schema), DatasetFormat::OneHot);

        // Detection is total even for unstructured headers.
        let schema = schema_of(&["a", "b"]);
        assert_eq!(detect_format(&schema), DatasetFormat::OneHot);
    }

    #[test]
    fn adapter_requires_a_disease_column() {
        let schema = schema_of(&["fever", "cough"]);
        assert!(adapter_for(&schema).is_err());
    }
}
