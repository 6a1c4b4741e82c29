//! Solver backend: hands a finished formula to Z3 and reports the verdict

use std::time::Duration;
use z3::ast::{Bool, Int};
use z3::{Model, Params, SatResult, Solver};

/// Limits applied to every solver call of a synthesis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Wall-clock limit per call (None = unlimited)
    pub timeout: Option<Duration>,
    /// Z3 resource limit per call (None = unlimited). Unlike `timeout` it
    /// does not depend on machine speed.
    pub rlimit: Option<u32>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            rlimit: None,
        }
    }
}

impl SolverConfig {
    /// Every call runs until Z3 reaches a verdict
    pub fn unlimited() -> Self {
        Self {
            timeout: None,
            rlimit: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn with_rlimit(mut self, rlimit: u32) -> Self {
        self.rlimit = Some(rlimit);
        self
    }

    /// Whether a call may end in UNKNOWN for lack of time or resources
    pub fn is_limited(&self) -> bool {
        self.timeout.is_some() || self.rlimit.is_some()
    }
}

/// Fresh Z3 solver carrying the configured limits
pub fn create_solver_with_config(cfg: &SolverConfig) -> Solver {
    let solver = Solver::new();
    if cfg.is_limited() {
        let mut params = Params::new();
        if let Some(timeout) = cfg.timeout {
            params.set_u32("timeout", timeout.as_millis().min(u32::MAX as u128) as u32);
        }
        if let Some(rlimit) = cfg.rlimit {
            params.set_u32("rlimit", rlimit);
        }
        solver.set_params(&params);
    }
    solver
}

/// Verdict of one solver call
pub enum SolveOutcome {
    Sat(Model),
    Unsat,
    /// Timeout, resource limit or incompleteness; never conflated with UNSAT
    Unknown(String),
}

impl SolveOutcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveOutcome::Sat(_))
    }
}

impl std::fmt::Debug for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveOutcome::Sat(_) => write!(f, "Sat(..)"),
            SolveOutcome::Unsat => write!(f, "Unsat"),
            SolveOutcome::Unknown(reason) => write!(f, "Unknown({})", reason),
        }
    }
}

/// Decide the conjunction of `assertions` on a fresh solver
pub fn solve(assertions: &[Bool], cfg: &SolverConfig) -> SolveOutcome {
    let solver = create_solver_with_config(cfg);
    for assertion in assertions {
        solver.assert(assertion);
    }
    match solver.check() {
        SatResult::Sat => match solver.get_model() {
            Some(model) => SolveOutcome::Sat(model),
            None => SolveOutcome::Unknown("solver reported sat without a model".to_string()),
        },
        SatResult::Unsat => SolveOutcome::Unsat,
        SatResult::Unknown => SolveOutcome::Unknown(
            solver
                .get_reason_unknown()
                .unwrap_or_else(|| "unknown".to_string()),
        ),
    }
}

/// `lo <= value < hi`
pub fn in_range(value: &Int, lo: i64, hi: i64) -> Bool {
    Bool::and(&[value.ge(&Int::from_i64(lo)), value.lt(&Int::from_i64(hi))])
}

/// `value == constant`
pub fn equals(value: &Int, constant: usize) -> Bool {
    value.eq(&Int::from_i64(constant as i64))
}

/// Conjunction that tolerates an empty list
pub fn all(conjuncts: Vec<Bool>) -> Bool {
    if conjuncts.is_empty() {
        Bool::from_bool(true)
    } else {
        Bool::and(&conjuncts)
    }
}

/// Disjunction that tolerates an empty list
pub fn any(disjuncts: Vec<Bool>) -> Bool {
    if disjuncts.is_empty() {
        Bool::from_bool(false)
    } else {
        Bool::or(&disjuncts)
    }
}

/// Evaluate an integer unknown, completing the model where unconstrained
pub fn eval_int(model: &Model, value: &Int) -> Option<i64> {
    model.eval(value, true)?.as_i64()
}

/// Evaluate a boolean unknown, completing the model where unconstrained
pub fn eval_bool(model: &Model, value: &Bool) -> Option<bool> {
    model.eval(value, true)?.as_bool()
}
