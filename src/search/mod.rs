//! Search for transducers satisfying a synthesis problem
//!
//! Synthesis is symbolic: each attempt is one SMT query at fixed bounds,
//! and the driver escalates the bounds until a query is satisfiable.

pub mod config;
pub mod result;
pub mod symbolic;

pub use config::{Bounds, SynthesisConfig};
pub use result::{
    AttemptRecord, AttemptVerdict, Solution, SynthesisOutcome, SynthesisResult, SynthesisStatistics,
    Uniqueness,
};
pub use symbolic::{TransducerSynthesis, escalation_schedule, synthesize};
