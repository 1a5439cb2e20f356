use std::collections::HashMap;
use std::path::Path;

use tg_types::{DataError, SweepResult};

/// Ground-truth outcomes keyed by sample id.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeTable {
    pub by_sample: HashMap<String, f64>,
}

impl OutcomeTable {
    /// Load an outcome CSV: first column sample id, second column the
    /// numeric outcome. Extra columns are ignored with a warning.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> SweepResult<Self> {
        let path = path.as_ref();
        tracing::info!("Loading outcome table from: {}", path.display());

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to open outcome CSV {}: {}", path.display(), e),
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
                    "outcome CSV {} needs a sample-id column plus an outcome column",
                    path.display()
                ),
            }
            .into());
        }
        if headers.len() > 2 {
            tracing::warn!(
                "Outcome CSV {} has {} columns; using '{}' and ignoring the rest",
                path.display(),
                headers.len(),
                &headers[1]
            );
        }

        let mut by_sample: HashMap<String, f64> = HashMap::new();

        for (line_num, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to read CSV record at line {}: {}", line_num + 2, e),
            })?;

            let sample_id = record.get(0).unwrap_or("").trim().to_string();
            if sample_id.is_empty() {
                return Err(DataError::ParseError {
                    message: format!("missing sample id at line {}", line_num + 2),
                }
                .into());
            }

            let raw = record.get(1).unwrap_or("").trim();
            let value = raw.parse::<f64>().map_err(|e| DataError::ParseError {
                message: format!(
                    "Could not parse outcome '{}' at line {}: {}",
                    raw,
                    line_num + 2,
                    e
                ),
            })?;

            if by_sample.insert(sample_id.clone(), value).is_some() {
                return Err(DataError::DuplicateSampleId { sample_id }.into());
            }
        }

        if by_sample.is_empty() {
            return Err(DataError::InsufficientData {
                message: format!("outcome CSV {} has no data rows", path.display()),
            }
            .into());
        }

        tracing::info!("Loaded {} outcomes from {}", by_sample.len(), path.display());
        Ok(Self { by_sample })
    }

    pub fn get(&self, sample_id: &str) -> Option<f64> {
        self.by_sample.get(sample_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_sample.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sample.is_empty()
    }
}
