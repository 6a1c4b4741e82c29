//! Error types shared by the library and the command-line front end

use thiserror::Error;

/// Errors raised while building a synthesis problem or configuring a run.
///
/// Solver outcomes (UNSAT, timeouts) are not errors; they are reported through
/// [`crate::search::SynthesisOutcome`].
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),

    #[error("example {index} is malformed: {reason}")]
    MalformedExample { index: usize, reason: String },

    #[error("unsupported cost mode '{0}' (valid options: unconstrained, bounded, mean)")]
    UnsupportedCostMode(String),

    #[error("invalid distance budget: {0}")]
    InvalidBudget(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("alphabet mismatch: {0}")]
    AlphabetMismatch(String),

    #[error("failed to decode solver model: {0}")]
    ModelDecoding(String),

    #[error("problem file error: {0}")]
    ProblemFile(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type SynthResult<T> = Result<T, SynthError>;
