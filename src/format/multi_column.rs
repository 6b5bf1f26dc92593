//! Multi-column format: numbered symptom columns, one name per cell.

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

use crate::error::{EngineError, ParseWarning, Result};
use crate::format::values::cell_to_string;
use crate::format::{
    FormatAdapter, disease_column, is_diet_column, is_medicines_column, numbered_symptom,
    optional_column,
};
use crate::model::{CanonicalRecord, canonicalize, split_delimited};

/// Adapter for `disease, symptom_1..symptom_n[, medicines][, diet]` layouts
#[derive(Debug)]
pub struct MultiColumnFormat {
    disease: usize,
    /// Numbered symptom columns in suffix order
    symptom_columns: Vec<usize>,
    medicines: Option<usize>,
    diet: Option<usize>,
}

impl MultiColumnFormat {
    /// Resolve column roles from the header
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let mut numbered: Vec<(usize, usize)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter_map(|(index, field)| {
                numbered_symptom(&canonicalize(field.name())).map(|suffix| (suffix, index))
            })
            .collect();
        numbered.sort_unstable();
        if numbered.is_empty() {
            return Err(EngineError::Schema("no numbered symptom columns in header".to_string()));
        }

        Ok(Self {
            disease: disease_column(schema)?,
            symptom_columns: numbered.into_iter().map(|(_, index)| index).collect(),
            medicines: optional_column(schema, is_medicines_column),
            diet: optional_column(schema, is_diet_column),
        })
    }
}

impl FormatAdapter for MultiColumnFormat {
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

            // Blank cells are skipped; a cell may also carry a delimited list.
            let symptoms: Vec<String> = self
                .symptom_columns
                .iter()
                .filter_map(|&column| cell_to_string(batch.column(column), row))
                .flat_map(|cell| split_delimited(&cell))
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
                    warnings.push(ParseWarning::row(base_row + row, "empty symptom set"));
                }
            }
        }
        Ok(records)
    }
}
