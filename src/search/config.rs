//! Configuration types for transducer synthesis

use crate::error::{SynthError, SynthResult};
use crate::semantics::cost::{CostMode, DistanceBudget};
use crate::semantics::equivalence::WitnessSearchConfig;
use crate::semantics::smt::SolverConfig;
use std::time::Duration;

/// Size parameters of one synthesis attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Number of candidate transducer states
    pub num_states: usize,
    /// Maximum number of symbols emitted per transition
    pub output_bound: usize,
    /// Number of classifier states (None = no lookahead)
    pub lookahead_states: Option<usize>,
}

impl Bounds {
    pub fn new(num_states: usize, output_bound: usize) -> Self {
        Self {
            num_states,
            output_bound,
            lookahead_states: None,
        }
    }

    pub fn with_lookahead(mut self, states: usize) -> Self {
        self.lookahead_states = Some(states);
        self
    }

    /// Classifier states the encoder iterates over; one when lookahead is off
    pub fn lookahead_count(&self) -> usize {
        self.lookahead_states.unwrap_or(1)
    }

    pub fn has_lookahead(&self) -> bool {
        self.lookahead_states.is_some()
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "states={}, output_bound={}", self.num_states, self.output_bound)?;
        if let Some(l) = self.lookahead_states {
            write!(f, ", lookahead={}", l)?;
        }
        Ok(())
    }
}

/// Main synthesis configuration
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// How the edit budget is threaded through accepted runs
    pub cost_mode: CostMode,
    /// Edit budget `m/n`
    pub budget: DistanceBudget,
    /// Largest output bound tried before adding a state
    pub max_output_bound: usize,
    /// Largest state count tried (None = size of the totalized source automaton)
    pub max_states: Option<usize>,
    /// Classifier size for lookahead synthesis (None = no lookahead)
    pub lookahead_states: Option<usize>,
    /// Honor the problem's template when it has one
    pub use_template: bool,
    /// Per-call solver settings
    pub solver: SolverConfig,
    /// Re-solve with the found assignment excluded
    pub check_uniqueness: bool,
    /// Alternatives without a distinguishing input blocked before giving up
    pub max_alternatives: usize,
    /// Budgets for the distinguishing-input search
    pub witness: WitnessSearchConfig,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            cost_mode: CostMode::default(),
            budget: DistanceBudget::default(),
            max_output_bound: 2,
            max_states: None,
            lookahead_states: None,
            use_template: true,
            solver: SolverConfig::default(),
            check_uniqueness: false,
            max_alternatives: 8,
            witness: WitnessSearchConfig::default(),
        }
    }
}

impl SynthesisConfig {
    pub fn with_cost_mode(mut self, mode: CostMode) -> Self {
        self.cost_mode = mode;
        self
    }

    pub fn with_budget(mut self, budget: DistanceBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_max_output_bound(mut self, bound: usize) -> Self {
        self.max_output_bound = bound;
        self
    }

    pub fn with_max_states(mut self, states: usize) -> Self {
        self.max_states = Some(states);
        self
    }

    pub fn with_lookahead_states(mut self, states: usize) -> Self {
        self.lookahead_states = Some(states);
        self
    }

    pub fn with_template(mut self, use_template: bool) -> Self {
        self.use_template = use_template;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.solver = self.solver.with_timeout(timeout);
        self
    }

    /// Cap every solver call at `rlimit` Z3 resource units
    pub fn with_rlimit(mut self, rlimit: u32) -> Self {
        self.solver = self.solver.with_rlimit(rlimit);
        self
    }

    pub fn with_uniqueness_check(mut self, check: bool) -> Self {
        self.check_uniqueness = check;
        self
    }

    pub fn with_max_alternatives(mut self, alternatives: usize) -> Self {
        self.max_alternatives = alternatives;
        self
    }

    pub fn with_witness_search(mut self, witness: WitnessSearchConfig) -> Self {
        self.witness = witness;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.witness.seed = Some(seed);
        self
    }

    /// Reject settings no attempt could use
    pub fn validate(&self) -> SynthResult<()> {
        self.budget.validate_for(self.cost_mode)?;
        if self.max_output_bound == 0 {
            return Err(SynthError::InvalidConfig(
                "the output bound ceiling must be at least 1".to_string(),
            ));
        }
        if self.max_states == Some(0) {
            return Err(SynthError::InvalidConfig(
                "the state cap must be at least 1".to_string(),
            ));
        }
        if self.lookahead_states == Some(0) {
            return Err(SynthError::InvalidConfig(
                "a lookahead classifier needs at least 1 state".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_display() {
        assert_eq!(Bounds::new(2, 1).to_string(), "states=2, output_bound=1");
        assert_eq!(
            Bounds::new(1, 3).with_lookahead(2).to_string(),
            "states=1, output_bound=3, lookahead=2"
        );
    }

    #[test]
    fn test_lookahead_count() {
        assert_eq!(Bounds::new(1, 1).lookahead_count(), 1);
        assert!(!Bounds::new(1, 1).has_lookahead());
        assert_eq!(Bounds::new(1, 1).with_lookahead(3).lookahead_count(), 3);
    }

    #[test]
    fn test_synthesis_config_builder() {
        let config = SynthesisConfig::default()
            .with_cost_mode(CostMode::Bounded)
            .with_max_output_bound(3)
            .with_max_states(4)
            .with_uniqueness_check(true)
            .with_seed(9);

        assert_eq!(config.cost_mode, CostMode::Bounded);
        assert_eq!(config.max_output_bound, 3);
        assert_eq!(config.max_states, Some(4));
        assert!(config.check_uniqueness);
        assert_eq!(config.witness.seed, Some(9));
    }

    #[test]
    fn test_validate() {
        assert!(SynthesisConfig::default().validate().is_ok());
        assert!(
            SynthesisConfig::default()
                .with_max_output_bound(0)
                .validate()
                .is_err()
        );
        assert!(
            SynthesisConfig::default()
                .with_lookahead_states(0)
                .validate()
                .is_err()
        );
        let half = DistanceBudget::new(1, 2).unwrap();
        assert!(matches!(
            SynthesisConfig::default()
                .with_cost_mode(CostMode::Bounded)
                .with_budget(half)
                .validate(),
            Err(SynthError::InvalidBudget(_))
        ));
    }
}
