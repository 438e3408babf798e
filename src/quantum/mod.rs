// src/quantum/mod.rs
//! Quantum register abstractions
//!
//! This module defines the operation vocabulary, the state vector
//! representation, and the feature-embedding ansatz that produces
//! operation lists for the simulator.

pub mod ansatz;
pub mod op;
pub mod state;

pub use ansatz::embedding_ops;
pub use op::{Axis, Op, QuantumError};
pub use state::StateVector;

/// Re-export commonly used types
pub mod prelude {
    pub use super::{embedding_ops, Axis, Op, QuantumError, StateVector};
}
