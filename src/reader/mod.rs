//! CSV dataset loading: file discovery, schema inference, batch reading.

use std::fs::{self, File};
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use log::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineError, ParseWarning, Result, log_warnings};
use crate::format::{DatasetFormat, adapter_for, detect_format};
use crate::model::CanonicalRecord;

/// Preferred dataset file name
const PRIMARY_DATASET: &str = "dataset_with_recommendations.csv";
/// Generic fallback file name
const GENERIC_DATASET: &str = "dataset.csv";

/// Outcome of loading one dataset source
#[derive(Debug)]
pub struct ParsedDataset {
    /// Canonical records in source-row order
    pub records: Vec<CanonicalRecord>,
    /// Non-fatal problems encountered along the way
    pub warnings: Vec<ParseWarning>,
    /// File the records came from
    pub path: PathBuf,
    /// Detected file shape
    pub format: DatasetFormat,
}

/// Locate a dataset file within the data directory.
///
/// Discovery order: the primary dataset name, then the generic `dataset.csv`,
/// then the first `*.csv` in sorted order.
pub fn discover_dataset(dir: &Path) -> Result<PathBuf> {
    for name in [PRIMARY_DATASET, GENERIC_DATASET] {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    let first_csv = fs::read_dir(dir)
        .map_err(|_| EngineError::DatasetMissing { dir: dir.to_path_buf() })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .sorted()
        .next();

    first_csv.ok_or_else(|| EngineError::DatasetMissing { dir: dir.to_path_buf() })
}

/// Read a CSV file into record batches.
///
/// The header and a bounded row sample drive schema inference, but every
/// column is then read as a nullable string: cell-level interpretation (and
/// therefore row-level failure tolerance) belongs to the format adapters,
/// not the decoder.
pub fn read_batches(path: &Path, batch_size: usize, infer_rows: usize) -> Result<Vec<RecordBatch>> {
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);
    let (inferred, _) = format.infer_schema(&mut file, Some(infer_rows))?;
    file.rewind()?;

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|field| Field::new(field.name(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    debug!(
        "Reading {} with {} columns",
        path.display(),
        schema.fields().len()
    );

    let reader = ReaderBuilder::new(schema)
        .with_format(format)
        .with_batch_size(batch_size)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(batches)
}

/// Load and parse the configured dataset into canonical records.
///
/// Row-level problems become warnings; an unusable header yields zero
/// records plus a dataset-level warning. Only a missing or unreadable file
/// is an error, and the caller recovers from that with the synthetic
/// fallback.
pub fn load_dataset(config: &EngineConfig) -> Result<ParsedDataset> {
    let path = match &config.dataset_path {
        Some(path) => path.clone(),
        None => discover_dataset(&config.data_dir)?,
    };
    info!("Loading dataset from {}", path.display());

    let batches = read_batches(&path, config.batch_size, config.infer_rows)?;
    let mut warnings = Vec::new();
    let mut records = Vec::new();

    let format = match batches.first() {
        Some(first) => {
            let schema = first.schema();
            let format = detect_format(&schema);
            match adapter_for(&schema) {
                Ok((_, adapter)) => {
                    let mut base_row = 0;
                    for batch in &batches {
                        records.extend(adapter.convert_batch(batch, base_row, &mut warnings)?);
                        base_row += batch.num_rows();
                    }
                }
                Err(error) => warnings.push(ParseWarning::dataset(error.to_string())),
            }
            format
        }
        None => {
            warnings.push(ParseWarning::dataset("file has no data rows"));
            DatasetFormat::OneHot
        }
    };

    log_warnings(&path, &warnings);
    info!(
        "Parsed {} records from {} ({} format, {} rows skipped)",
        records.len(),
        path.display(),
        format.as_str(),
        warnings.iter().filter(|w| w.row.is_some()).count()
    );

    Ok(ParsedDataset {
        records,
        warnings,
        path,
        format,
    })
}
