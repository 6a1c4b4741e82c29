//! Edit-cost model for transducer transitions
//!
//! A transition consuming `a` and emitting `k` symbols costs:
//! - `1` when it emits nothing (a deletion),
//! - `k - 1` when `a` is among the emitted symbols (a copy plus insertions),
//! - `k` otherwise (a substitution).

use crate::error::{SynthError, SynthResult};
use crate::ir::types::SymbolId;
use z3::ast::{Bool, Int};

/// How the edit budget is threaded through accepted runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostMode {
    /// No distance accounting; only languages and examples constrain the result
    Unconstrained,
    /// Every accepted run spends exactly the budget `m`
    Bounded,
    /// Accepted runs stay within an average of `m/n` edits per symbol
    #[default]
    Mean,
}

impl std::fmt::Display for CostMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostMode::Unconstrained => write!(f, "unconstrained"),
            CostMode::Bounded => write!(f, "bounded"),
            CostMode::Mean => write!(f, "mean"),
        }
    }
}

impl std::str::FromStr for CostMode {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unconstrained" | "none" => Ok(CostMode::Unconstrained),
            "bounded" | "sum" | "exact" => Ok(CostMode::Bounded),
            "mean" | "average" | "threshold" => Ok(CostMode::Mean),
            _ => Err(SynthError::UnsupportedCostMode(s.to_string())),
        }
    }
}

/// Rational edit budget `m/n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceBudget {
    pub numerator: u32,
    pub denominator: u32,
}

impl DistanceBudget {
    pub fn new(numerator: u32, denominator: u32) -> SynthResult<Self> {
        if denominator == 0 {
            return Err(SynthError::InvalidBudget(format!(
                "{}/{} has a zero denominator",
                numerator, denominator
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Check the budget is usable with the given mode
    pub fn validate_for(&self, mode: CostMode) -> SynthResult<()> {
        if mode == CostMode::Bounded && self.denominator != 1 {
            return Err(SynthError::InvalidBudget(format!(
                "bounded mode needs an integral budget, got {}",
                self
            )));
        }
        Ok(())
    }
}

impl Default for DistanceBudget {
    fn default() -> Self {
        Self {
            numerator: 1,
            denominator: 1,
        }
    }
}

impl std::fmt::Display for DistanceBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl std::str::FromStr for DistanceBudget {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SynthError::InvalidBudget(format!("cannot parse '{}' as m/n", s));
        let (m, n) = match s.split_once('/') {
            Some((m, n)) => (m.trim(), n.trim()),
            None => (s.trim(), "1"),
        };
        let numerator = m.parse::<u32>().map_err(|_| invalid())?;
        let denominator = n.parse::<u32>().map_err(|_| invalid())?;
        DistanceBudget::new(numerator, denominator)
    }
}

/// Edit cost of consuming `consumed` while emitting `emitted`
pub fn edit_cost(consumed: SymbolId, emitted: &[SymbolId]) -> u64 {
    let k = emitted.len() as u64;
    if k == 0 {
        1
    } else if emitted.contains(&consumed) {
        k - 1
    } else {
        k
    }
}

/// Symbolic edit cost of a transition whose output length and symbols are unknowns.
///
/// Only the first `out_len` entries of `out_syms` take part in the copy test.
pub fn symbolic_edit_cost(consumed: SymbolId, out_len: &Int, out_syms: &[Int]) -> Int {
    let zero = Int::from_i64(0);
    let one = Int::from_i64(1);
    let consumed = Int::from_i64(consumed as i64);

    let copies: Vec<Bool> = out_syms
        .iter()
        .enumerate()
        .map(|(j, sym)| Bool::and(&[out_len.gt(&Int::from_i64(j as i64)), sym.eq(&consumed)]))
        .collect();
    let copies_input = if copies.is_empty() {
        Bool::from_bool(false)
    } else {
        Bool::or(&copies)
    };

    let substitution = copies_input.ite(&Int::sub(&[out_len, &one]), out_len);
    out_len.eq(&zero).ite(&one, &substitution)
}
