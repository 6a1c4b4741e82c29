//! Symbolic (SMT-based) transducer synthesis
//!
//! The candidate transducer is a sketch of Z3 unknowns. One attempt:
//! 1. Declare the sketch (and the lookahead classifier) for fixed bounds
//! 2. Assert product reachability with source and target, plus the energy law
//! 3. Assert that every example is reproduced exactly
//! 4. Solve, then decode the model into an explicit transducer

pub mod drive;
pub mod encoder;
pub mod examples;
pub mod extract;
pub mod lookahead;
pub mod product;
pub mod sketch;
pub mod synthesis;

pub use encoder::{EncoderConfig, Formula, encode};
pub use extract::{AssignedTransition, CandidateAssignment};
pub use synthesis::{TransducerSynthesis, escalation_schedule, synthesize};
