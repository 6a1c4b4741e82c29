//! Symbolic candidate transducer for SMT-based synthesis
//!
//! A sketch holds one group of unknowns per `(state, lookahead, symbol)`
//! key: the successor state, the output length, `output_bound` output
//! symbols (only the first `out_len` are meaningful) and the derived edit
//! cost. Without lookahead the lookahead coordinate is always 0.

use crate::ir::types::{StateId, SymbolId};
use crate::problem::Template;
use crate::search::config::Bounds;
use crate::semantics::cost::symbolic_edit_cost;
use crate::semantics::smt::{equals, in_range};
use z3::ast::{Bool, Int};

/// Index of one candidate transition: `(state, lookahead, symbol)`
pub type TransitionKey = (StateId, StateId, SymbolId);

/// The unknowns of one candidate transition
pub struct SymbolicTransition {
    pub step: Int,
    pub out_len: Int,
    pub out_syms: Vec<Int>,
    pub cost: Int,
}

impl SymbolicTransition {
    fn new(prefix: &str, output_bound: usize) -> Self {
        Self {
            step: Int::new_const(format!("{}_step", prefix)),
            out_len: Int::new_const(format!("{}_len", prefix)),
            out_syms: (0..output_bound)
                .map(|j| Int::new_const(format!("{}_sym_{}", prefix, j)))
                .collect(),
            cost: Int::new_const(format!("{}_cost", prefix)),
        }
    }
}

/// All candidate unknowns for one attempt
pub struct CandidateSketch {
    num_states: usize,
    lookahead_states: usize,
    num_symbols: usize,
    output_bound: usize,
    transitions: Vec<SymbolicTransition>,
    /// `materialized[q * |Σ| + a]`: the pair belongs to the candidate
    materialized: Vec<bool>,
}

impl CandidateSketch {
    pub fn new(bounds: &Bounds, num_symbols: usize, template: Option<&Template>) -> Self {
        let lookahead_states = bounds.lookahead_count();
        let mut transitions = Vec::with_capacity(bounds.num_states * lookahead_states * num_symbols);
        for q in 0..bounds.num_states {
            for l in 0..lookahead_states {
                for a in 0..num_symbols {
                    let prefix = format!("t_{}_{}_{}", q, l, a);
                    transitions.push(SymbolicTransition::new(&prefix, bounds.output_bound));
                }
            }
        }

        let mut materialized = vec![true; bounds.num_states * num_symbols];
        if let Some(template) = template {
            for q in 0..bounds.num_states {
                for a in 0..num_symbols {
                    materialized[q * num_symbols + a] = template.allows(q, a);
                }
            }
        }

        Self {
            num_states: bounds.num_states,
            lookahead_states,
            num_symbols,
            output_bound: bounds.output_bound,
            transitions,
            materialized,
        }
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn lookahead_states(&self) -> usize {
        self.lookahead_states
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    pub fn output_bound(&self) -> usize {
        self.output_bound
    }

    pub fn transition(&self, (q, l, a): TransitionKey) -> &SymbolicTransition {
        &self.transitions[(q * self.lookahead_states + l) * self.num_symbols + a]
    }

    /// Whether `(state, symbol)` is part of the candidate (always, without a template)
    pub fn is_materialized(&self, state: StateId, symbol: SymbolId) -> bool {
        self.materialized[state * self.num_symbols + symbol]
    }

    /// Every key whose `(state, symbol)` pair is materialized
    pub fn keys(&self) -> impl Iterator<Item = TransitionKey> + '_ {
        let (s, l_count, sigma) = (self.num_states, self.lookahead_states, self.num_symbols);
        (0..s)
            .flat_map(move |q| (0..l_count).flat_map(move |l| (0..sigma).map(move |a| (q, l, a))))
            .filter(move |&(q, _, a)| self.is_materialized(q, a))
    }

    /// Successor, output length and output symbols stay in their domains
    pub fn range_constraints(&self) -> Vec<Bool> {
        let mut constraints = Vec::new();
        for t in &self.transitions {
            constraints.push(in_range(&t.step, 0, self.num_states as i64));
            constraints.push(in_range(&t.out_len, 0, self.output_bound as i64 + 1));
            for sym in &t.out_syms {
                constraints.push(in_range(sym, 0, self.num_symbols as i64));
            }
        }
        constraints
    }

    /// Template pairs keep the template's successor under every lookahead state
    pub fn template_constraints(&self, template: &Template) -> Vec<Bool> {
        template
            .transitions()
            .filter(|&(q, _, _)| q < self.num_states)
            .flat_map(move |(q, a, to)| {
                (0..self.lookahead_states).map(move |l| equals(&self.transition((q, l, a)).step, to))
            })
            .collect()
    }

    /// Define each `cost` unknown by the edit-cost law
    pub fn cost_definitions(&self) -> Vec<Bool> {
        self.keys()
            .map(|key| {
                let t = self.transition(key);
                let (_, _, a) = key;
                t.cost.eq(&symbolic_edit_cost(a, &t.out_len, &t.out_syms))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::automaton::Automaton;
    use crate::semantics::smt::{SolveOutcome, SolverConfig, eval_int, solve};

    #[test]
    fn test_keys_without_template() {
        let sketch = CandidateSketch::new(&Bounds::new(2, 1), 3, None);
        assert_eq!(sketch.keys().count(), 6);
        assert!(sketch.is_materialized(1, 2));
    }

    #[test]
    fn test_keys_with_lookahead() {
        let sketch = CandidateSketch::new(&Bounds::new(2, 1).with_lookahead(2), 3, None);
        assert_eq!(sketch.lookahead_states(), 2);
        assert_eq!(sketch.keys().count(), 12);
    }

    #[test]
    fn test_template_restricts_keys() {
        let automaton = Automaton::from_parts(2, 2, 0, &[1], &[(0, 0, 1), (1, 1, 1)]).unwrap();
        let template = Template::new(&automaton).unwrap();
        let sketch = CandidateSketch::new(&Bounds::new(2, 1), 2, Some(&template));
        let keys: Vec<TransitionKey> = sketch.keys().collect();
        assert_eq!(keys, vec![(0, 0, 0), (1, 0, 1)]);
    }

    #[test]
    fn test_template_fixes_successor() {
        let automaton = Automaton::from_parts(2, 1, 0, &[1], &[(0, 0, 1)]).unwrap();
        let template = Template::new(&automaton).unwrap();
        let sketch = CandidateSketch::new(&Bounds::new(2, 1), 1, Some(&template));
        let mut assertions = sketch.range_constraints();
        assertions.extend(sketch.template_constraints(&template));
        match solve(&assertions, &SolverConfig::default()) {
            SolveOutcome::Sat(model) => {
                assert_eq!(eval_int(&model, &sketch.transition((0, 0, 0)).step), Some(1));
            }
            other => panic!("expected sat, got {:?}", other),
        }
    }

    #[test]
    fn test_ranges_bound_output_length() {
        let sketch = CandidateSketch::new(&Bounds::new(1, 2), 2, None);
        let mut assertions = sketch.range_constraints();
        assertions.push(equals(&sketch.transition((0, 0, 1)).out_len, 3));
        assert!(matches!(
            solve(&assertions, &SolverConfig::default()),
            SolveOutcome::Unsat
        ));
    }
}
