//! Delimited table reader producing a [`Dataset`].
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, NEGATIVE, POSITIVE};

/// Configuration for reading a labelled CSV/TSV table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvReaderConfig {
    /// Column name holding the binary label (-1 / 1, with 0 read as -1).
    pub label_column: String,
    /// Field delimiter, `,` for CSV and `\t` for TSV.
    pub delimiter: char,
    /// Optional list of feature columns to load (in order).
    /// When `None`, all non-label, non-ignored columns are features.
    pub feature_columns: Option<Vec<String>>,
    /// Columns to skip when auto-selecting features.
    pub ignore_columns: Vec<String>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            label_column: "target".to_string(),
            delimiter: ',',
            feature_columns: None,
            ignore_columns: Vec::new(),
        }
    }
}

/// Read a comma separated file whose label column is `target`.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    read_csv_with_config(path, &CsvReaderConfig::default())
}

/// Read a delimited table using a custom configuration.
pub fn read_csv_with_config<P: AsRef<Path>>(path: P, config: &CsvReaderConfig) -> Result<Dataset> {
    if !config.delimiter.is_ascii() {
        return Err(anyhow!("Delimiter must be a single ASCII character"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter as u8)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .with_context(|| format!("Failed to open data file: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read header row")?
        .clone();

    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| anyhow!("Missing label column '{}'", config.label_column))?;

    let feature_indices = resolve_feature_indices(&headers, config, label_idx)?;
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns detected in header"));
    }

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        // header is line 1
        let line = row_idx + 2;
        let record = result.with_context(|| format!("Failed to read line {}", line))?;

        let raw_label = record
            .get(label_idx)
            .ok_or_else(|| anyhow!("Missing label value at line {}", line))?;
        labels.push(parse_label(raw_label).with_context(|| format!("Invalid label at line {}", line))?);

        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing feature value at line {}", line))?;
            let parsed = value.parse::<f64>().with_context(|| {
                format!(
                    "Invalid value '{}' for feature '{}' at line {}",
                    value,
                    headers.get(idx).unwrap_or(""),
                    line
                )
            })?;
            features.push(parsed);
        }
    }

    let n_samples = labels.len();
    if n_samples == 0 {
        return Err(anyhow!("Data file {} has no rows", path.as_ref().display()));
    }
    let x = Array2::from_shape_vec((n_samples, feature_indices.len()), features)
        .context("Failed to build feature matrix")?;

    let feature_names = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    log::debug!(
        "Read {} rows x {} features from {}",
        n_samples,
        feature_indices.len(),
        path.as_ref().display()
    );

    Dataset::new(x, Array1::from_vec(labels), feature_names)
}

/// Labels are read as numbers so `1.0` and `-1` both work; `0` means negative.
fn parse_label(raw: &str) -> Result<i32> {
    let value = raw
        .parse::<f64>()
        .with_context(|| format!("'{}' is not numeric", raw))?;
    if value == 1.0 {
        Ok(POSITIVE)
    } else if value == -1.0 || value == 0.0 {
        Ok(NEGATIVE)
    } else {
        Err(anyhow!("label {} is not one of -1, 0, 1", raw))
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &CsvReaderConfig,
    label_idx: usize,
) -> Result<Vec<usize>> {
    if let Some(columns) = &config.feature_columns {
        return columns
            .iter()
            .map(|name| {
                find_column(headers, name)
                    .ok_or_else(|| anyhow!("Missing feature column '{}'", name))
            })
            .collect();
    }

    Ok(headers
        .iter()
        .enumerate()
        .filter(|(idx, name)| {
            *idx != label_idx && !config.ignore_columns.iter().any(|ignored| ignored == name)
        })
        .map(|(idx, _)| idx)
        .collect())
}
