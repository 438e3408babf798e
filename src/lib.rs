//! Quantum Metric Learning
//!
//! This crate trains a hybrid classical-quantum embedding for binary
//! classification: feature vectors are projected by a learned linear map,
//! encoded into a simulated quantum register by a layered ansatz, and
//! compared via swap-test overlaps. Training minimizes a Hilbert-Schmidt
//! distance surrogate so that same-class points overlap maximally and
//! different-class points overlap minimally; classification is an average
//! weighted overlap vote against labeled references.

pub mod machine_learning;
pub mod quantum;
pub mod simulators;

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::machine_learning::prelude::*;
    pub use crate::quantum::prelude::*;
    pub use crate::simulators::StatevectorSimulator;
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
