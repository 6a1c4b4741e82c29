//! Synthesis result types and statistics

use crate::ir::transducer::Transducer;
use crate::search::config::Bounds;
use crate::search::symbolic::extract::CandidateAssignment;
use crate::semantics::equivalence::Witness;
use std::time::Duration;

/// Verdict of one solver call during escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptVerdict {
    Sat,
    Unsat,
    Unknown,
}

impl std::fmt::Display for AttemptVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptVerdict::Sat => write!(f, "sat"),
            AttemptVerdict::Unsat => write!(f, "unsat"),
            AttemptVerdict::Unknown => write!(f, "unknown"),
        }
    }
}

/// One encode-solve round at fixed bounds
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub bounds: Bounds,
    pub verdict: AttemptVerdict,
    /// Number of assertions handed to the solver
    pub assertions: usize,
    pub elapsed_time: Duration,
}

/// Whether the found transducer is the only one at its bounds
#[derive(Debug, Clone)]
pub enum Uniqueness {
    NotChecked,
    /// No other assignment with different behavior exists at these bounds
    Unique,
    /// Another transducer fits and behaves differently on `witness.input`
    Ambiguous {
        alternative: Transducer,
        witness: Witness,
    },
    /// The check ran out of solver time or alternatives
    Undetermined { reason: String },
}

/// A synthesized transducer and how it was found
#[derive(Debug, Clone)]
pub struct Solution {
    pub transducer: Transducer,
    pub bounds: Bounds,
    pub assignment: CandidateAssignment,
    pub uniqueness: Uniqueness,
}

#[derive(Debug, Clone)]
pub enum SynthesisOutcome {
    Found(Box<Solution>),
    /// Every bound in the schedule was UNSAT
    NotFound { last_bounds: Option<Bounds> },
    /// The solver gave up (timeout, resource limit) at `bounds`
    Inconclusive { bounds: Bounds, reason: String },
}

/// Result of a synthesis run
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub outcome: SynthesisOutcome,
    pub statistics: SynthesisStatistics,
}

impl SynthesisResult {
    pub fn solution(&self) -> Option<&Solution> {
        match &self.outcome {
            SynthesisOutcome::Found(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn transducer(&self) -> Option<&Transducer> {
        self.solution().map(|s| &s.transducer)
    }

    pub fn is_found(&self) -> bool {
        self.solution().is_some()
    }
}

/// Statistics from a synthesis run
#[derive(Debug, Clone, Default)]
pub struct SynthesisStatistics {
    /// Escalation attempts in order
    pub attempts: Vec<AttemptRecord>,
    /// Solver calls, uniqueness re-solves included
    pub solver_calls: u64,
    /// Alternatives decoded while checking uniqueness
    pub alternatives_checked: u64,
    /// Total time spent
    pub elapsed_time: Duration,
}

impl SynthesisStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unsat_attempts(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.verdict == AttemptVerdict::Unsat)
            .count()
    }

    /// Time spent inside solver calls during escalation
    pub fn solver_time(&self) -> Duration {
        self.attempts.iter().map(|a| a.elapsed_time).sum()
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Attempts: {}\n", self.attempts.len()));
        s.push_str(&format!("UNSAT attempts: {}\n", self.unsat_attempts()));
        s.push_str(&format!("Solver calls: {}\n", self.solver_calls));
        s.push_str(&format!("Solver time: {:.2?}\n", self.solver_time()));

        if self.alternatives_checked > 0 {
            s.push_str(&format!(
                "Alternatives checked: {}\n",
                self.alternatives_checked
            ));
        }

        for attempt in &self.attempts {
            s.push_str(&format!(
                "  [{}] {} ({} assertions, {:.2?})\n",
                attempt.bounds, attempt.verdict, attempt.assertions, attempt.elapsed_time
            ));
        }

        s
    }
}
