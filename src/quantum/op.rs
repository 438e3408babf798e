// src/quantum/op.rs
//! Elementary register operations
//!
//! The embedding circuit is described as a plain list of tagged operations,
//! which the statevector simulator interprets in order. This keeps the
//! circuit definition decoupled from the simulation backend.

use num_complex::Complex64;
use thiserror::Error;

/// Errors raised by the quantum layer
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuantumError {
    #[error("position {position} out of range for {register_size}-position register")]
    PositionOutOfRange {
        position: usize,
        register_size: usize,
    },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("state vector is not normalized (|psi|^2 = {norm_sqr})")]
    NotNormalized { norm_sqr: f64 },

    #[error("operation references the same position more than once")]
    DuplicatePositions,

    #[error("non-real expectation value (imaginary part {imag}); observable is not Hermitian")]
    NonHermitianObservable { imag: f64 },

    #[error("embedding is defined on register pairs, got {0} wires")]
    InvalidWireCount(usize),
}

/// Rotation axis for single-position rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The 2x2 rotation matrix exp(-i * angle/2 * sigma) for this axis
    pub fn rotation_matrix(&self, angle: f64) -> [[Complex64; 2]; 2] {
        let half = angle / 2.0;
        let (sin, cos) = half.sin_cos();

        match self {
            Axis::X => [
                [Complex64::new(cos, 0.0), Complex64::new(0.0, -sin)],
                [Complex64::new(0.0, -sin), Complex64::new(cos, 0.0)],
            ],
            Axis::Y => [
                [Complex64::new(cos, 0.0), Complex64::new(-sin, 0.0)],
                [Complex64::new(sin, 0.0), Complex64::new(cos, 0.0)],
            ],
            Axis::Z => [
                [Complex64::new(cos, -sin), Complex64::new(0.0, 0.0)],
                [Complex64::new(0.0, 0.0), Complex64::new(cos, sin)],
            ],
        }
    }
}

/// One elementary operation on the simulated register
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Single-position rotation by `angle` about a named axis
    Rotation {
        axis: Axis,
        position: usize,
        angle: f64,
    },

    /// Hadamard on one position (ancilla superposition for the swap test)
    Hadamard { position: usize },

    /// Two-position conditional-flip coupling: flip, Z-rotation, flip.
    /// Diagonal in the computational basis with phase exp(-/+ i*angle/2)
    /// by bit parity of the two positions.
    Coupling {
        first: usize,
        second: usize,
        angle: f64,
    },

    /// Conditional swap of two positions (Fredkin)
    ControlledSwap {
        control: usize,
        first: usize,
        second: usize,
    },
}

impl Op {
    /// Positions this operation touches
    pub fn positions(&self) -> Vec<usize> {
        match self {
            Op::Rotation { position, .. } | Op::Hadamard { position } => vec![*position],
            Op::Coupling { first, second, .. } => vec![*first, *second],
            Op::ControlledSwap {
                control,
                first,
                second,
            } => vec![*control, *first, *second],
        }
    }

    /// Check that all positions fit the register and are distinct
    pub fn validate(&self, register_size: usize) -> Result<(), QuantumError> {
        let positions = self.positions();

        for &p in &positions {
            if p >= register_size {
                return Err(QuantumError::PositionOutOfRange {
                    position: p,
                    register_size,
                });
            }
        }

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                if positions[i] == positions[j] {
                    return Err(QuantumError::DuplicatePositions);
                }
            }
        }

        Ok(())
    }
}
