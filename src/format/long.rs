//! Long/list format: one row per disease, one delimited symptom column.

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

use crate::error::{EngineError, ParseWarning, Result};
use crate::format::values::cell_to_string;
use crate::format::{
    FormatAdapter, disease_column, is_diet_column, is_medicines_column, is_symptoms_column,
    optional_column,
};
use crate::model::{CanonicalRecord, canonicalize, split_delimited};

/// Adapter for `disease, symptoms[, medicines][, diet]` layouts
#[derive(Debug)]
pub struct LongFormat {
    disease: usize,
    symptoms: usize,
    medicines: Option<usize>,
    diet: Option<usize>,
}

impl LongFormat {
    /// Resolve column roles from the header
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let symptoms = schema
            .fields()
            .iter()
            .position(|field| is_symptoms_column(&canonicalize(field.name())))
            .ok_or_else(|| EngineError::Schema("no symptoms column in header".to_string()))?;

        Ok(Self {
            disease: disease_column(schema)?,
            symptoms,
            medicines: optional_column(schema, is_medicines_column),
            diet: optional_column(schema, is_diet_column),
        })
    }
}

impl FormatAdapter for LongFormat {
    fn convert_batch(
        &self,
        batch: &RecordBatch,
        base_row: usize,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Vec<CanonicalRecord>> {
        let disease_col = batch.column(self.disease);
        let symptoms_col = batch.column(self.symptoms);

        let mut records = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let Some(disease) = cell_to_string(disease_col, row) else {
                warnings.push(ParseWarning::row(base_row + row, "missing disease name"));
                continue;
            };
            let symptoms = cell_to_string(symptoms_col, row).unwrap_or_default();
            let raw: Vec<String> = split_delimited(&symptoms).into_vec();

            match CanonicalRecord::new(&disease, raw) {
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
                    warnings.push(ParseWarning::row(base_row + row, "empty symptom set"));
                }
            }
        }
        Ok(records)
    }
}
