//! Backward lookahead classifier
//!
//! `classify(l, a)` summarizes the right context: reading a word from its
//! end, starting in the empty-context state 0, yields one classifier state
//! per position. A candidate transition at position `i` sees the state of
//! position `i + 1`.

use crate::ir::types::{LOOKAHEAD_INITIAL, StateId, SymbolId};
use crate::semantics::smt::{equals, in_range};
use z3::ast::{Bool, Int};

pub struct ClassifierSketch {
    num_states: usize,
    num_symbols: usize,
    table: Vec<Int>,
}

impl ClassifierSketch {
    pub fn new(num_states: usize, num_symbols: usize) -> Self {
        let table = (0..num_states)
            .flat_map(|l| (0..num_symbols).map(move |a| Int::new_const(format!("look_{}_{}", l, a))))
            .collect();
        Self {
            num_states,
            num_symbols,
            table,
        }
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    /// `classify(state, symbol)`
    pub fn value(&self, state: StateId, symbol: SymbolId) -> &Int {
        &self.table[state * self.num_symbols + symbol]
    }

    /// Total and deterministic over `[0, num_states)`
    pub fn range_constraints(&self) -> Vec<Bool> {
        self.table
            .iter()
            .map(|v| in_range(v, 0, self.num_states as i64))
            .collect()
    }

    /// `classify(next, symbol) = current`
    pub fn guard(&self, next: StateId, symbol: SymbolId, current: StateId) -> Bool {
        equals(self.value(next, symbol), current)
    }

    /// Classifier state of every position of `word`, computed from the end.
    ///
    /// Returns `|word| + 1` integers (the last is fixed to the initial state)
    /// and the constraints linking them.
    pub fn reverse_run(&self, prefix: &str, word: &[SymbolId]) -> (Vec<Int>, Vec<Bool>) {
        let states: Vec<Int> = (0..=word.len())
            .map(|i| Int::new_const(format!("{}_rev_{}", prefix, i)))
            .collect();
        let mut constraints = vec![equals(&states[word.len()], LOOKAHEAD_INITIAL)];
        for (i, &a) in word.iter().enumerate() {
            constraints.push(in_range(&states[i], 0, self.num_states as i64));
            for l in 0..self.num_states {
                constraints.push(
                    equals(&states[i + 1], l).implies(&states[i].eq(self.value(l, a))),
                );
            }
        }
        (states, constraints)
    }
}
