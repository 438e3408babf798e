// src/quantum/ansatz.rs
//! Feature-embedding ansatz
//!
//! Produces the operation list that maps a (projected) feature vector into
//! the register state: repeated blocks of a feature-encoding rotation layer
//! followed by an entangling coupling and per-position local fields. The
//! feature layer is applied once more after the last block, so an `L`-layer
//! embedding carries `L + 1` feature-encoding applications and `L`
//! coupling/local-field applications.

use ndarray::{Array1, Array2};

use crate::quantum::op::{Axis, Op, QuantumError};

/// Emit the embedding operation sequence for one feature vector.
///
/// `weights` has shape `(L, wires + 1)`: per layer, one coupling angle
/// followed by one local Y-rotation angle per wire. The embedding is defined
/// on register pairs, so `wires` must name exactly two distinct positions
/// and `features` must have one value per wire.
///
/// This is a pure function: it only describes operations, it never touches
/// a simulator.
pub fn embedding_ops(
    features: &Array1<f64>,
    weights: &Array2<f64>,
    wires: &[usize],
) -> Result<Vec<Op>, QuantumError> {
    if wires.len() != 2 {
        return Err(QuantumError::InvalidWireCount(wires.len()));
    }

    if features.len() != wires.len() {
        return Err(QuantumError::DimensionMismatch {
            expected: wires.len(),
            actual: features.len(),
        });
    }

    if weights.ncols() != wires.len() + 1 {
        return Err(QuantumError::DimensionMismatch {
            expected: wires.len() + 1,
            actual: weights.ncols(),
        });
    }

    let layers = weights.nrows();
    let mut ops = Vec::with_capacity((layers + 1) * wires.len() + layers * (wires.len() + 1));

    for layer in 0..layers {
        push_feature_layer(&mut ops, features, wires);

        ops.push(Op::Coupling {
            first: wires[0],
            second: wires[1],
            angle: weights[[layer, 0]],
        });

        for (i, &wire) in wires.iter().enumerate() {
            ops.push(Op::Rotation {
                axis: Axis::Y,
                position: wire,
                angle: weights[[layer, 1 + i]],
            });
        }
    }

    // closing feature-encoding layer
    push_feature_layer(&mut ops, features, wires);

    Ok(ops)
}

fn push_feature_layer(ops: &mut Vec<Op>, features: &Array1<f64>, wires: &[usize]) {
    for (i, &wire) in wires.iter().enumerate() {
        ops.push(Op::Rotation {
            axis: Axis::X,
            position: wire,
            angle: features[i],
        });
    }
}
