// src/simulators/mod.rs
//! Simulation backends
//!
//! Currently a single deterministic statevector simulator that interprets
//! operation lists produced by the embedding ansatz.

pub mod statevector;

pub use statevector::StatevectorSimulator;
