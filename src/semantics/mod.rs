//! Edit-cost semantics, solver backend and differential checking

pub mod cost;
pub mod equivalence;
pub mod smt;

// Re-export main functionality
pub use cost::{CostMode, DistanceBudget, edit_cost};
pub use equivalence::{EquivalenceResult, Witness, WitnessSearchConfig, find_distinguishing_input};
pub use smt::{SolveOutcome, SolverConfig, solve};
