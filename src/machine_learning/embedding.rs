// src/machine_learning/embedding.rs
//! Trainable embedding: parameter bundle, overlap and cost
//!
//! A raw feature vector is mapped by a classical projection onto two
//! intermediate values, which the ansatz embeds into a register pair. The
//! similarity of two embedded points is measured with a swap test: ancilla
//! in superposition, the two embeddings on their own register pairs,
//! controlled swaps, and the ancilla Z expectation, which equals
//! |⟨a|b⟩|² in [0, 1].

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::{Array1, Array2};
use rand::Rng;
use rayon::prelude::*;
use thiserror::Error;

use crate::machine_learning::dataset::DatasetError;
use crate::quantum::ansatz::embedding_ops;
use crate::quantum::op::{Op, QuantumError};
use crate::simulators::StatevectorSimulator;

/// Ancilla position for the swap test
pub const ANCILLA: usize = 0;
/// Register pair holding the first embedded point
pub const REGISTER_A: [usize; 2] = [1, 2];
/// Register pair holding the second embedded point
pub const REGISTER_B: [usize; 2] = [3, 4];
/// Total register size for one overlap evaluation
pub const TOTAL_POSITIONS: usize = 5;

/// Dimension of the projected intermediate vector
pub const PROJECTED_DIM: usize = 2;

/// Errors raised by the embedding, training, and classification layers
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("parameter vector has {actual} entries, bundle holds {expected}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    #[error("class set is empty")]
    EmptyClass,

    #[error("classifier needs at least one reference draw")]
    ZeroSamples,

    #[error("could not parse '{value}' on line {line} of parameter file")]
    Parse { value: String, line: usize },

    #[error(transparent)]
    Quantum(#[from] QuantumError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The unit updated atomically each optimization step: the classical
/// projection matrix and the ansatz weight tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBundle {
    /// Projection matrix, shape (2, n_features)
    pub projection: Array2<f64>,
    /// Ansatz weights, shape (layers, 3): coupling angle plus one local
    /// field per register position
    pub weights: Array2<f64>,
}

impl ParameterBundle {
    /// Initialize from a seeded generator: small uniform angles for the
    /// ansatz, projection entries scaled by 1/sqrt(n_features).
    pub fn init<R: Rng>(n_features: usize, layers: usize, rng: &mut R) -> Self {
        let scale = 1.0 / (n_features as f64).sqrt();
        let projection =
            Array2::from_shape_fn((PROJECTED_DIM, n_features), |_| rng.gen_range(-scale..scale));
        let weights =
            Array2::from_shape_fn((layers, PROJECTED_DIM + 1), |_| rng.gen_range(-0.1..0.1));

        ParameterBundle {
            projection,
            weights,
        }
    }

    /// Input feature width this bundle expects
    pub fn n_features(&self) -> usize {
        self.projection.ncols()
    }

    /// Number of ansatz layers
    pub fn layer_count(&self) -> usize {
        self.weights.nrows()
    }

    /// Total number of trainable parameters
    pub fn parameter_count(&self) -> usize {
        self.projection.len() + self.weights.len()
    }

    /// Flatten into one parameter vector: projection rows first, then
    /// weight rows
    pub fn as_flat(&self) -> Vec<f64> {
        self.projection
            .iter()
            .chain(self.weights.iter())
            .copied()
            .collect()
    }

    /// Overwrite from a flat parameter vector produced by `as_flat`
    pub fn assign_flat(&mut self, flat: &[f64]) -> Result<(), ModelError> {
        if flat.len() != self.parameter_count() {
            return Err(ModelError::ParameterCountMismatch {
                expected: self.parameter_count(),
                actual: flat.len(),
            });
        }

        let split = self.projection.len();
        for (target, &value) in self.projection.iter_mut().zip(&flat[..split]) {
            *target = value;
        }
        for (target, &value) in self.weights.iter_mut().zip(&flat[split..]) {
            *target = value;
        }

        Ok(())
    }

    /// Persist to two flat text files: one row of space-separated numbers
    /// per weight-tensor row and per projection-matrix row.
    pub fn save<P: AsRef<Path>>(
        &self,
        quantum_path: P,
        classical_path: P,
    ) -> Result<(), ModelError> {
        write_rows(quantum_path, &self.weights)?;
        write_rows(classical_path, &self.projection)?;
        Ok(())
    }

    /// Reload a bundle persisted with `save`
    pub fn load<P: AsRef<Path>>(
        quantum_path: P,
        classical_path: P,
    ) -> Result<Self, ModelError> {
        let weights = read_rows(quantum_path)?;
        let projection = read_rows(classical_path)?;

        Ok(ParameterBundle {
            projection,
            weights,
        })
    }
}

/// Apply the classical projection to one raw feature vector, yielding the
/// two-dimensional intermediate point the ansatz encodes.
pub fn project(bundle: &ParameterBundle, x: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
    if x.len() != bundle.n_features() {
        return Err(ModelError::DimensionMismatch {
            expected: bundle.n_features(),
            actual: x.len(),
        });
    }

    Ok(bundle.projection.dot(x))
}

/// Swap-test overlap of two embedded points, in [0, 1]; 1 means identical
/// embeddings.
pub fn overlap(
    bundle: &ParameterBundle,
    a: &Array1<f64>,
    b: &Array1<f64>,
) -> Result<f64, ModelError> {
    let projected_a = project(bundle, a)?;
    let projected_b = project(bundle, b)?;

    let mut ops = Vec::new();
    ops.push(Op::Hadamard { position: ANCILLA });
    ops.extend(embedding_ops(&projected_a, &bundle.weights, &REGISTER_A)?);
    ops.extend(embedding_ops(&projected_b, &bundle.weights, &REGISTER_B)?);
    ops.push(Op::ControlledSwap {
        control: ANCILLA,
        first: REGISTER_A[0],
        second: REGISTER_B[0],
    });
    ops.push(Op::ControlledSwap {
        control: ANCILLA,
        first: REGISTER_A[1],
        second: REGISTER_B[1],
    });
    ops.push(Op::Hadamard { position: ANCILLA });

    let mut simulator = StatevectorSimulator::new(TOTAL_POSITIONS);
    simulator.run(&ops)?;

    Ok(simulator.expectation_z(ANCILLA)?)
}

/// Arithmetic mean of `overlap` over every ordered pair (x, y), self-pairs
/// included when the sets coincide. Pairs are evaluated in parallel but
/// summed in a fixed order, so the result is deterministic.
pub fn mean_overlap(
    bundle: &ParameterBundle,
    xs: &[Array1<f64>],
    ys: &[Array1<f64>],
) -> Result<f64, ModelError> {
    if xs.is_empty() || ys.is_empty() {
        return Err(ModelError::EmptyClass);
    }

    let pairs: Vec<(usize, usize)> = (0..xs.len())
        .flat_map(|i| (0..ys.len()).map(move |j| (i, j)))
        .collect();

    let overlaps = pairs
        .par_iter()
        .map(|&(i, j)| overlap(bundle, &xs[i], &ys[j]))
        .collect::<Result<Vec<f64>, ModelError>>()?;

    Ok(overlaps.iter().sum::<f64>() / overlaps.len() as f64)
}

/// Hilbert-Schmidt-distance surrogate cost. With aa, bb the intra-class and
/// ab the inter-class mean overlaps, d = -2·ab + (aa + bb) and the returned
/// cost is 1 - d/2. Lower cost means larger inter-class distance relative to
/// intra-class spread. The value is not clamped.
pub fn cost(
    bundle: &ParameterBundle,
    class_a: &[Array1<f64>],
    class_b: &[Array1<f64>],
) -> Result<f64, ModelError> {
    let aa = mean_overlap(bundle, class_a, class_a)?;
    let bb = mean_overlap(bundle, class_b, class_b)?;
    let ab = mean_overlap(bundle, class_a, class_b)?;

    let distance = -2.0 * ab + (aa + bb);
    Ok(1.0 - 0.5 * distance)
}

fn write_rows<P: AsRef<Path>>(path: P, table: &Array2<f64>) -> Result<(), ModelError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for row in table.rows() {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line)?;
    }

    writer.flush()?;
    Ok(())
}

fn read_rows<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, ModelError> {
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
            let value = token.parse::<f64>().map_err(|_| ModelError::Parse {
                value: token.to_string(),
                line: line_no + 1,
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    let n_rows = rows.len();
    let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);

    for row in &rows {
        if row.len() != n_cols {
            return Err(ModelError::ParameterCountMismatch {
                expected: n_cols,
                actual: row.len(),
            });
        }
    }

    let mut table = Array2::zeros((n_rows, n_cols));
    for (i, row) in rows.into_iter().enumerate() {
        for (j, value) in row.into_iter().enumerate() {
            table[[i, j]] = value;
        }
    }

    Ok(table)
}
