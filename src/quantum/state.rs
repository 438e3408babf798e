// src/quantum/state.rs
//! State vector representation of the simulated register

use std::fmt::{self, Display};

use ndarray::Array1;
use num_complex::Complex64;

use crate::quantum::op::QuantumError;

/// State vector over `2^n` computational basis states for `n` positions.
/// Positions are big-endian: position 0 is the most significant bit of a
/// basis index.
#[derive(Clone, Debug)]
pub struct StateVector {
    qubit_count: usize,
    amplitudes: Array1<Complex64>,
}

impl StateVector {
    /// Create a new state vector with the given amplitudes
    pub fn new(qubit_count: usize, amplitudes: Array1<Complex64>) -> Result<Self, QuantumError> {
        let expected_dim = 1 << qubit_count;

        if amplitudes.len() != expected_dim {
            return Err(QuantumError::DimensionMismatch {
                expected: expected_dim,
                actual: amplitudes.len(),
            });
        }

        let state = StateVector {
            qubit_count,
            amplitudes,
        };

        let norm_sqr = state.norm_sqr();
        if (norm_sqr - 1.0).abs() > 1e-10 {
            return Err(QuantumError::NotNormalized { norm_sqr });
        }

        Ok(state)
    }

    /// Create a state vector in the computational basis state |index⟩
    pub fn computational_basis(qubit_count: usize, index: usize) -> Result<Self, QuantumError> {
        let dim = 1 << qubit_count;

        if index >= dim {
            return Err(QuantumError::PositionOutOfRange {
                position: index,
                register_size: dim,
            });
        }

        let mut amplitudes = Array1::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);

        Ok(StateVector {
            qubit_count,
            amplitudes,
        })
    }

    /// Create the all-zero state |00...0⟩
    pub fn zero_state(qubit_count: usize) -> Self {
        let dim = 1 << qubit_count;
        let mut amplitudes = Array1::zeros(dim);
        amplitudes[0] = Complex64::new(1.0, 0.0);

        StateVector {
            qubit_count,
            amplitudes,
        }
    }

    /// Number of register positions
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Dimension of the Hilbert space (2^n)
    pub fn dimension(&self) -> usize {
        1 << self.qubit_count
    }

    /// Get a reference to the amplitudes
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Mutable access for the simulator's in-place kernels
    pub(crate) fn amplitudes_mut(&mut self) -> &mut Array1<Complex64> {
        &mut self.amplitudes
    }

    /// Probability of measuring the given basis index
    pub fn probability(&self, basis_index: usize) -> f64 {
        if basis_index >= self.dimension() {
            return 0.0;
        }

        self.amplitudes[basis_index].norm_sqr()
    }

    /// Inner product ⟨self|other⟩
    pub fn inner_product(&self, other: &Self) -> Result<Complex64, QuantumError> {
        if self.qubit_count != other.qubit_count {
            return Err(QuantumError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }

        let mut result = Complex64::new(0.0, 0.0);
        for i in 0..self.dimension() {
            result += self.amplitudes[i].conj() * other.amplitudes[i];
        }

        Ok(result)
    }

    /// Squared norm of the state vector
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).sum()
    }

    /// Check if the state is normalized
    pub fn is_valid(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() < 1e-10
    }
}

impl Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}-position state:", self.qubit_count)?;

        let threshold = 1e-10;
        let mut has_entries = false;

        for i in 0..self.dimension() {
            let amp = self.amplitudes[i];
            if amp.norm_sqr() > threshold {
                has_entries = true;

                let bit_string = format!("{:0width$b}", i, width = self.qubit_count);
                write!(f, "  ({:.6}{:+.6}i) |{}⟩", amp.re, amp.im, bit_string)?;
                writeln!(f, " [{:.1}%]", amp.norm_sqr() * 100.0)?;
            }
        }

        if !has_entries {
            writeln!(f, "  (zero state)")?;
        }

        Ok(())
    }
}
