use std::collections::HashSet;
use std::path::Path;

use tg_types::{DataError, SweepResult};

/// A wide-format feature table: one row per sample, one column per feature.
///
/// Cells hold raw measurements; a missing measurement is NaN and is left
/// for the engine to handle.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    /// Sample ids, in file order.
    pub sample_ids: Vec<String>,
    /// Feature column names, in file order.
    pub columns: Vec<String>,
    /// Row-major values; `values[row][col]` belongs to `columns[col]`.
    pub values: Vec<Vec<f64>>,
}

impl FeatureTable {
    /// Load a wide-format CSV: first column sample id, remaining columns
    /// numeric features.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> SweepResult<Self> {
        let path = path.as_ref();
        tracing::info!("Loading feature table from: {}", path.display());

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to open features CSV {}: {}", path.display(), e),
            })?;

        let headers = rdr
            .headers()
            .map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to read CSV headers: {}", e),
            })?
            .clone();

        if headers.len() < 2 {
            return Err(DataError::InsufficientData {
                message: format!(
                    "features CSV {} needs a sample-id column plus at least one feature column",
                    path.display()
                ),
            }
            .into());
        }

        let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut sample_ids: Vec<String> = Vec::new();
        let mut values: Vec<Vec<f64>> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (line_num, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to read CSV record at line {}: {}", line_num + 2, e),
            })?;

            if record.len() != headers.len() {
                return Err(DataError::ParseError {
                    message: format!(
                        "line {} has {} fields, header has {}",
                        line_num + 2,
                        record.len(),
                        headers.len()
                    ),
                }
                .into());
            }

            let sample_id = record.get(0).unwrap_or("").trim().to_string();
            if sample_id.is_empty() {
                return Err(DataError::ParseError {
                    message: format!("missing sample id at line {}", line_num + 2),
                }
                .into());
            }
            if !seen.insert(sample_id.clone()) {
                return Err(DataError::DuplicateSampleId { sample_id }.into());
            }

            let mut row = Vec::with_capacity(columns.len());
            for (col_idx, field) in record.iter().skip(1).enumerate() {
                row.push(parse_cell(field, &columns[col_idx], line_num + 2)?);
            }

            sample_ids.push(sample_id);
            values.push(row);
        }

        if sample_ids.is_empty() {
            return Err(DataError::InsufficientData {
                message: format!("features CSV {} has no data rows", path.display()),
            }
            .into());
        }

        tracing::info!(
            "Loaded {} samples x {} features from {}",
            sample_ids.len(),
            columns.len(),
            path.display()
        );

        Ok(Self {
            sample_ids,
            columns,
            values,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }
}

/// Empty cells are missing measurements, not errors.
fn parse_cell(field: &str, column: &str, line_num: usize) -> SweepResult<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|e| {
        DataError::ParseError {
            message: format!(
                "Could not parse '{}' in column '{}' at line {}: {}",
                trimmed, column, line_num, e
            ),
        }
        .into()
    })
}
