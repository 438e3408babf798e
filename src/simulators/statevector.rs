// src/simulators/statevector.rs
//! Statevector simulator
//!
//! Interprets an ordered list of elementary operations against the all-zero
//! initial state and exposes expectation values of single-position
//! observables. The simulation itself is fully deterministic: identical
//! operation lists and angles always yield identical expectations.

use ndarray::Array2;
use num_complex::Complex64;

use crate::quantum::op::{Op, QuantumError};
use crate::quantum::state::StateVector;

const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// A statevector simulator for a fixed-size register
#[derive(Clone, Debug)]
pub struct StatevectorSimulator {
    state: StateVector,
}

impl StatevectorSimulator {
    /// Create a new simulator in the all-zero state
    pub fn new(qubit_count: usize) -> Self {
        StatevectorSimulator {
            state: StateVector::zero_state(qubit_count),
        }
    }

    /// Create a simulator from an existing state vector
    pub fn from_state(state: StateVector) -> Self {
        StatevectorSimulator { state }
    }

    /// Get the current state vector
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Reset the simulator to the |0...0⟩ state
    pub fn reset(&mut self) {
        self.state = StateVector::zero_state(self.state.qubit_count());
    }

    /// Number of register positions
    pub fn qubit_count(&self) -> usize {
        self.state.qubit_count()
    }

    /// Apply a single operation in place
    pub fn apply(&mut self, op: &Op) -> Result<(), QuantumError> {
        op.validate(self.qubit_count())?;

        match *op {
            Op::Rotation {
                axis,
                position,
                angle,
            } => {
                let matrix = axis.rotation_matrix(angle);
                self.apply_single(position, &matrix);
            }
            Op::Hadamard { position } => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                let matrix = [[h, h], [h, -h]];
                self.apply_single(position, &matrix);
            }
            Op::Coupling {
                first,
                second,
                angle,
            } => self.apply_coupling(first, second, angle),
            Op::ControlledSwap {
                control,
                first,
                second,
            } => self.apply_controlled_swap(control, first, second),
        }

        Ok(())
    }

    /// Apply an ordered operation list
    pub fn run(&mut self, ops: &[Op]) -> Result<(), QuantumError> {
        for op in ops {
            self.apply(op)?;
        }

        Ok(())
    }

    /// Probability of measuring 0 on one position
    pub fn probability_zero(&self, position: usize) -> Result<f64, QuantumError> {
        let n = self.qubit_count();
        if position >= n {
            return Err(QuantumError::PositionOutOfRange {
                position,
                register_size: n,
            });
        }

        let mask = self.bit_mask(position);
        let mut prob_zero = 0.0;

        for i in 0..self.state.dimension() {
            if i & mask == 0 {
                prob_zero += self.state.probability(i);
            }
        }

        Ok(prob_zero)
    }

    /// Expectation value of the Z observable on one position, in [-1, 1]
    pub fn expectation_z(&self, position: usize) -> Result<f64, QuantumError> {
        let prob_zero = self.probability_zero(position)?;
        Ok(2.0 * prob_zero - 1.0)
    }

    /// Expectation value of an arbitrary Hermitian 2x2 observable on one
    /// position. Uses the measurement-probability shortcut when the
    /// observable is Z.
    pub fn expectation_single_qubit(
        &self,
        observable: &Array2<Complex64>,
        position: usize,
    ) -> Result<f64, QuantumError> {
        let n = self.qubit_count();
        if position >= n {
            return Err(QuantumError::PositionOutOfRange {
                position,
                register_size: n,
            });
        }

        if observable.shape() != [2, 2] {
            return Err(QuantumError::DimensionMismatch {
                expected: 2,
                actual: observable.shape()[0],
            });
        }

        if is_z_operator(observable) {
            return self.expectation_z(position);
        }

        // ⟨psi|O_q|psi⟩ accumulated over basis-index pairs differing in the
        // target bit
        let mask = self.bit_mask(position);
        let amps = self.state.amplitudes();
        let mut expectation = Complex64::new(0.0, 0.0);

        for i in 0..self.state.dimension() {
            if i & mask == 0 {
                let j = i | mask;
                let a0 = amps[i];
                let a1 = amps[j];

                expectation += a0.conj() * (observable[[0, 0]] * a0 + observable[[0, 1]] * a1);
                expectation += a1.conj() * (observable[[1, 0]] * a0 + observable[[1, 1]] * a1);
            }
        }

        if expectation.im.abs() > 1e-10 {
            return Err(QuantumError::NonHermitianObservable {
                imag: expectation.im,
            });
        }

        Ok(expectation.re)
    }

    // Big-endian bit position of one register position within a basis index
    fn bit_mask(&self, position: usize) -> usize {
        1 << (self.qubit_count() - 1 - position)
    }

    fn apply_single(&mut self, position: usize, matrix: &[[Complex64; 2]; 2]) {
        let mask = self.bit_mask(position);
        let dim = self.state.dimension();
        let amps = self.state.amplitudes_mut();

        for i in 0..dim {
            if i & mask == 0 {
                let j = i | mask;
                let a0 = amps[i];
                let a1 = amps[j];

                amps[i] = matrix[0][0] * a0 + matrix[0][1] * a1;
                amps[j] = matrix[1][0] * a0 + matrix[1][1] * a1;
            }
        }
    }

    fn apply_coupling(&mut self, first: usize, second: usize, angle: f64) {
        let mask_first = self.bit_mask(first);
        let mask_second = self.bit_mask(second);
        let dim = self.state.dimension();

        let half = angle / 2.0;
        let phase_even = Complex64::new(half.cos(), -half.sin());
        let phase_odd = Complex64::new(half.cos(), half.sin());

        let amps = self.state.amplitudes_mut();

        for i in 0..dim {
            let parity = ((i & mask_first) != 0) ^ ((i & mask_second) != 0);
            amps[i] *= if parity { phase_odd } else { phase_even };
        }
    }

    fn apply_controlled_swap(&mut self, control: usize, first: usize, second: usize) {
        let mask_control = self.bit_mask(control);
        let mask_first = self.bit_mask(first);
        let mask_second = self.bit_mask(second);
        let dim = self.state.dimension();
        let amps = self.state.amplitudes_mut();

        for i in 0..dim {
            // visit each swapped pair once, from the (first=1, second=0) side
            if i & mask_control != 0 && i & mask_first != 0 && i & mask_second == 0 {
                let j = (i & !mask_first) | mask_second;
                amps.swap(i, j);
            }
        }
    }
}

// Z observable check, tolerant to floating-point representation
fn is_z_operator(observable: &Array2<Complex64>) -> bool {
    let one = Complex64::new(1.0, 0.0);
    let neg_one = Complex64::new(-1.0, 0.0);
    let zero = Complex64::new(0.0, 0.0);

    (observable[[0, 0]] - one).norm_sqr() < 1e-10
        && (observable[[0, 1]] - zero).norm_sqr() < 1e-10
        && (observable[[1, 0]] - zero).norm_sqr() < 1e-10
        && (observable[[1, 1]] - neg_one).norm_sqr() < 1e-10
}
