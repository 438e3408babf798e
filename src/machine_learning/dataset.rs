// src/machine_learning/dataset.rs
//! Labeled datasets for metric learning
//!
//! Samples are fixed-width feature rows with a binary label in {-1, +1}.
//! The loader parses flat whitespace-separated numeric tables, one row per
//! sample, matching the dump format the trainer writes for parameters.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::{Array1, Array2};
use thiserror::Error;

/// Errors raised while constructing or indexing a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("index {0} out of bounds for dataset of length {1}")]
    IndexOutOfBounds(usize, usize),

    #[error("feature rows ({features}) do not match label rows ({labels})")]
    SampleCountMismatch { features: usize, labels: usize },

    #[error("ragged table: row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("label {0} at row {1} is not -1 or +1")]
    InvalidLabel(f64, usize),

    #[error("empty table")]
    Empty,

    #[error("could not parse '{value}' on line {line}")]
    Parse { value: String, line: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A labeled dataset: one feature row and one {-1, +1} label per sample
#[derive(Debug, Clone)]
pub struct MetricDataset {
    features: Array2<f64>,
    labels: Vec<f64>,
}

impl MetricDataset {
    /// Create a dataset from a feature matrix and labels.
    /// Labels must be exactly -1 or +1 and are fixed from here on.
    pub fn new(features: Array2<f64>, labels: Vec<f64>) -> Result<Self, DatasetError> {
        if features.nrows() != labels.len() {
            return Err(DatasetError::SampleCountMismatch {
                features: features.nrows(),
                labels: labels.len(),
            });
        }

        for (row, &label) in labels.iter().enumerate() {
            if label != -1.0 && label != 1.0 {
                return Err(DatasetError::InvalidLabel(label, row));
            }
        }

        Ok(MetricDataset { features, labels })
    }

    /// Load a dataset from two flat text files: a feature table (one
    /// fixed-width row of numbers per sample) and a label column.
    pub fn from_files<P: AsRef<Path>>(
        features_path: P,
        labels_path: P,
    ) -> Result<Self, DatasetError> {
        let features = read_table(features_path)?;
        let label_table = read_table(labels_path)?;

        if label_table.ncols() != 1 {
            return Err(DatasetError::RaggedRow {
                row: 0,
                expected: 1,
                actual: label_table.ncols(),
            });
        }

        let labels = label_table.column(0).to_vec();
        Self::new(features, labels)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of each feature row
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// The full feature matrix
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// All labels, sample order
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// One (feature vector, label) sample
    pub fn sample(&self, index: usize) -> Result<(Array1<f64>, f64), DatasetError> {
        if index >= self.len() {
            return Err(DatasetError::IndexOutOfBounds(index, self.len()));
        }

        Ok((self.features.row(index).to_owned(), self.labels[index]))
    }

    /// Indices of all samples carrying the given label
    pub fn class_indices(&self, label: f64) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// Feature vectors of all samples carrying the given label
    pub fn class_features(&self, label: f64) -> Vec<Array1<f64>> {
        self.class_indices(label)
            .into_iter()
            .map(|i| self.features.row(i).to_owned())
            .collect()
    }
}

// Parse a whitespace-separated numeric table, one row per non-blank line.
fn read_table<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, DatasetError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut row = Vec::new();
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| DatasetError::Parse {
                value: token.to_string(),
                line: line_no + 1,
            })?;
            row.push(value);
        }

        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }

    let n_cols = rows[0].len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n_cols {
            return Err(DatasetError::RaggedRow {
                row: i,
                expected: n_cols,
                actual: row.len(),
            });
        }
    }

    let n_rows = rows.len();
    let mut table = Array2::zeros((n_rows, n_cols));
    for (i, row) in rows.into_iter().enumerate() {
        for (j, value) in row.into_iter().enumerate() {
            table[[i, j]] = value;
        }
    }

    Ok(table)
}
