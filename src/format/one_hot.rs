//! One-hot format: one boolean indicator column per symptom.

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

use crate::error::{ParseWarning, Result};
use crate::format::values::{cell_is_truthy, cell_to_string};
use crate::format::{
    FormatAdapter, disease_column, is_diet_column, is_medicines_column, is_reserved_column,
    optional_column,
};
use crate::model::{CanonicalRecord, canonicalize, split_delimited};

/// Adapter for `disease, <symptom columns...>[, medicines][, diet]` layouts
#[derive(Debug)]
pub struct OneHotFormat {
    disease: usize,
    /// Indicator columns with their canonical symptom names
    indicators: Vec<(usize, String)>,
    medicines: Option<usize>,
    diet: Option<usize>,
}

impl OneHotFormat {
    /// Resolve column roles from the header; every non-reserved column
    /// becomes a symptom indicator
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let indicators = schema
            .fields()
            .iter()
            .enumerate()
            .filter_map(|(index, field)| {
                let header = canonicalize(field.name());
                (!header.is_empty() && !is_reserved_column(&header)).then_some((index, header))
            })
            .collect();

        Ok(Self {
            disease: disease_column(schema)?,
            indicators,
            medicines: optional_column(schema, is_medicines_column),
            diet: optional_column(schema, is_diet_column),
        })
    }
}

impl FormatAdapter for OneHotFormat {
    fn convert_batch(
        &self,
        batch: &RecordBatch,
        base_row: usize,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Vec<CanonicalRecord>> {
        let disease_col = batch.column(self.disease);

        let mut records = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let Some(disease) = cell_to_string(disease_col, row) else {
                warnings.push(ParseWarning::row(base_row + row, "missing disease name"));
                continue;
            };

            let symptoms: Vec<&str> = self
                .indicators
                .iter()
                .filter(|(column, _)| cell_is_truthy(batch.column(*column), row))
                .map(|(_, name)| name.as_str())
                .collect();

            match CanonicalRecord::new(&disease, symptoms) {
                Some(record) => records.push(record.with_recommendations(
                    self.medicines
                        .and_then(|col| cell_to_string(batch.column(col), row))
                        .map(|cell| split_delimited(&cell))
                        .unwrap_or_default(),
                    self.diet
                        .and_then(|col| cell_to_string(batch.column(col), row))
                        .map(|cell| split_delimited(&cell))
                        .unwrap_or_default(),
                )),
                None => {
                    warnings.push(ParseWarning::row(base_row + row, "no truthy symptom cell"));
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field};
    use std::sync::Arc;

    fn batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Disease", DataType::Utf8, true),
            Field::new("fever", DataType::Int64, true),
            Field::new("cough", DataType::Utf8, true),
            Field::new("Blurred Vision", DataType::Utf8, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![
                    Some("Flu"),
                    Some("Diabetes"),
                    Some("Nothing"),
                ])),
                Arc::new(Int64Array::from(vec![Some(1), Some(0), Some(0)])),
                Arc::new(StringArray::from(vec![Some("yes"), Some("no"), Some("0")])),
                Arc::new(StringArray::from(vec![Some("false"), Some("TRUE"), Some("0")])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn truthy_cells_become_symptoms() {
        let batch = batch();
        let adapter = OneHotFormat::from_schema(&batch.schema()).unwrap();
        let mut warnings = Vec::new();
        let records = adapter.convert_batch(&batch, 0, &mut warnings).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].symptoms.contains("fever"));
        assert!(records[0].symptoms.contains("cough"));
        assert!(!records[0].symptoms.contains("blurred_vision"));
        assert!(records[1].symptoms.contains("blurred_vision"));

        // The all-falsy row is skipped with a warning.
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].row, Some(2));
    }
}
