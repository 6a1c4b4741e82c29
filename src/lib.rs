//! Synthesis of finite-state string transducers with an SMT solver
//!
//! A [`SynthesisProblem`] fixes a source language, a target language, a set
//! of input/output examples and optionally a template. [`synthesize`] grows
//! the candidate's size until Z3 finds a transducer that maps every source
//! word into the target language, reproduces the examples, and stays within
//! the configured edit budget.

pub mod error;
pub mod ir;
pub mod problem;
pub mod search;
pub mod semantics;
pub mod validation;

pub use error::{SynthError, SynthResult};
pub use ir::{Alphabet, Automaton, Minterm, Transducer, Transition};
pub use problem::{Example, ProblemFile, SynthesisProblem, Template};
pub use search::{
    Bounds, Solution, SynthesisConfig, SynthesisOutcome, SynthesisResult, SynthesisStatistics,
    Uniqueness, synthesize,
};
pub use semantics::{CostMode, DistanceBudget, SolverConfig};
