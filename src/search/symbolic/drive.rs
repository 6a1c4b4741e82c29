//! Bounded unrolling of the target automaton over a transition's output
//!
//! The theory has no recursion, so "the target state reached after reading
//! the first `out_len` output symbols" is spelled out position by position up
//! to `output_bound`, then selected by a case split on `out_len`.

use crate::ir::automaton::Automaton;
use crate::ir::types::StateId;
use crate::search::symbolic::sketch::{CandidateSketch, TransitionKey};
use crate::semantics::smt::equals;
use std::collections::HashMap;
use z3::ast::{Bool, Int};

/// Memoized landing states of candidate outputs in the target automaton
pub struct TargetDrive<'a> {
    target: &'a Automaton,
    landings: HashMap<(TransitionKey, StateId), Int>,
    constraints: Vec<Bool>,
}

impl<'a> TargetDrive<'a> {
    pub fn new(target: &'a Automaton) -> Self {
        Self {
            target,
            landings: HashMap::new(),
            constraints: Vec::new(),
        }
    }

    /// Target state reached from `from` after emitting the output of `key`
    pub fn landing(&mut self, sketch: &CandidateSketch, key: TransitionKey, from: StateId) -> Int {
        if let Some(landing) = self.landings.get(&(key, from)) {
            return landing.clone();
        }

        let (q, l, a) = key;
        let prefix = format!("drive_{}_{}_{}_{}", q, l, a, from);
        let transition = sketch.transition(key);

        // Symbols past `out_len` are unconstrained and never drive the target
        let mut positions = vec![Int::from_i64(from as i64)];
        for (j, sym) in transition.out_syms.iter().enumerate() {
            let next = Int::new_const(format!("{}_pos_{}", prefix, j + 1));
            let emitted = transition.out_len.gt(&Int::from_i64(j as i64));
            if j == 0 {
                for b in 0..self.target.num_symbols() {
                    let premise = Bool::and(&[emitted.clone(), equals(sym, b)]);
                    let step = self.advance(premise, &next, from, b);
                    self.constraints.push(step);
                }
            } else {
                for s in self.target.states() {
                    for b in 0..self.target.num_symbols() {
                        let premise =
                            Bool::and(&[emitted.clone(), equals(&positions[j], s), equals(sym, b)]);
                        let step = self.advance(premise, &next, s, b);
                        self.constraints.push(step);
                    }
                }
            }
            positions.push(next);
        }

        let landing = Int::new_const(format!("{}_landing", prefix));
        for (len, position) in positions.iter().enumerate() {
            self.constraints
                .push(equals(&transition.out_len, len).implies(&landing.eq(position)));
        }

        self.landings.insert((key, from), landing.clone());
        landing
    }

    fn advance(&self, premise: Bool, next: &Int, state: StateId, symbol: usize) -> Bool {
        match self.target.step(state, symbol) {
            Some(to) => premise.implies(&equals(next, to)),
            // Partial target: emitting `symbol` here leaves the language
            None => premise.not(),
        }
    }

    pub fn into_constraints(self) -> Vec<Bool> {
        self.constraints
    }
}
