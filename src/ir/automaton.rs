//! Deterministic finite automata over a dense alphabet
//!
//! Source and target languages, templates and the lookahead classifier
//! are all handled through this one representation. Transitions are
//! stored as a `state × symbol` table; a missing entry means the
//! automaton is partial at that point.

use crate::error::{SynthError, SynthResult};
use crate::ir::types::{StateId, SymbolId};
use std::collections::VecDeque;
use std::ops::Range;

/// A deterministic (possibly partial) finite automaton
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    num_symbols: usize,
    initial: StateId,
    finals: Vec<bool>,
    delta: Vec<Vec<Option<StateId>>>,
}

impl Automaton {
    /// Create an automaton with no transitions and no final states
    pub fn new(num_states: usize, num_symbols: usize, initial: StateId) -> SynthResult<Self> {
        if num_states == 0 {
            return Err(SynthError::InvalidAutomaton(
                "automaton needs at least one state".to_string(),
            ));
        }
        if initial >= num_states {
            return Err(SynthError::InvalidAutomaton(format!(
                "initial state {} out of range (states: {})",
                initial, num_states
            )));
        }
        Ok(Self {
            num_symbols,
            initial,
            finals: vec![false; num_states],
            delta: vec![vec![None; num_symbols]; num_states],
        })
    }

    /// Build an automaton from its final states and transition triples
    pub fn from_parts(
        num_states: usize,
        num_symbols: usize,
        initial: StateId,
        finals: &[StateId],
        transitions: &[(StateId, SymbolId, StateId)],
    ) -> SynthResult<Self> {
        let mut automaton = Self::new(num_states, num_symbols, initial)?;
        for &state in finals {
            automaton.set_final(state)?;
        }
        for &(from, symbol, to) in transitions {
            automaton.add_transition(from, symbol, to)?;
        }
        Ok(automaton)
    }

    pub fn add_transition(&mut self, from: StateId, symbol: SymbolId, to: StateId) -> SynthResult<()> {
        self.check_state(from)?;
        self.check_state(to)?;
        if symbol >= self.num_symbols {
            return Err(SynthError::InvalidAutomaton(format!(
                "symbol {} out of range (alphabet size: {})",
                symbol, self.num_symbols
            )));
        }
        match self.delta[from][symbol] {
            Some(existing) if existing != to => Err(SynthError::InvalidAutomaton(format!(
                "state {} has two successors on symbol {} ({} and {})",
                from, symbol, existing, to
            ))),
            _ => {
                self.delta[from][symbol] = Some(to);
                Ok(())
            }
        }
    }

    pub fn set_final(&mut self, state: StateId) -> SynthResult<()> {
        self.check_state(state)?;
        self.finals[state] = true;
        Ok(())
    }

    fn check_state(&self, state: StateId) -> SynthResult<()> {
        if state < self.finals.len() {
            Ok(())
        } else {
            Err(SynthError::InvalidAutomaton(format!(
                "state {} out of range (states: {})",
                state,
                self.finals.len()
            )))
        }
    }

    pub fn num_states(&self) -> usize {
        self.finals.len()
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    pub fn states(&self) -> Range<StateId> {
        0..self.finals.len()
    }

    pub fn initial_state(&self) -> StateId {
        self.initial
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals[state]
    }

    pub fn step(&self, state: StateId, symbol: SymbolId) -> Option<StateId> {
        self.delta[state][symbol]
    }

    /// Outgoing `(symbol, successor)` pairs of a state
    pub fn transitions_from(&self, state: StateId) -> impl Iterator<Item = (SymbolId, StateId)> + '_ {
        self.delta[state]
            .iter()
            .enumerate()
            .filter_map(|(symbol, to)| to.map(|to| (symbol, to)))
    }

    pub fn is_total(&self) -> bool {
        self.delta.iter().all(|row| row.iter().all(Option::is_some))
    }

    /// Complete the transition table with a non-final sink state
    pub fn totalize(&self) -> Automaton {
        if self.is_total() {
            return self.clone();
        }
        let sink = self.num_states();
        let mut delta: Vec<Vec<Option<StateId>>> = self
            .delta
            .iter()
            .map(|row| row.iter().map(|to| Some(to.unwrap_or(sink))).collect())
            .collect();
        delta.push(vec![Some(sink); self.num_symbols]);
        let mut finals = self.finals.clone();
        finals.push(false);
        Automaton {
            num_symbols: self.num_symbols,
            initial: self.initial,
            finals,
            delta,
        }
    }

    /// State reached after reading `word`, if the run stays defined
    pub fn run(&self, word: &[SymbolId]) -> Option<StateId> {
        word.iter()
            .try_fold(self.initial, |state, &symbol| self.step(state, symbol))
    }

    pub fn accepts(&self, word: &[SymbolId]) -> bool {
        self.run(word).is_some_and(|state| self.is_final(state))
    }

    /// States from which some final state is reachable
    pub fn live_states(&self) -> Vec<bool> {
        self.distances_to_final()
            .into_iter()
            .map(|d| d.is_some())
            .collect()
    }

    /// Length of the shortest accepted suffix from each state
    pub fn distances_to_final(&self) -> Vec<Option<usize>> {
        let mut predecessors = vec![Vec::new(); self.num_states()];
        for from in self.states() {
            for (_, to) in self.transitions_from(from) {
                predecessors[to].push(from);
            }
        }

        let mut distance = vec![None; self.num_states()];
        let mut queue = VecDeque::new();
        for state in self.states().filter(|&s| self.is_final(s)) {
            distance[state] = Some(0);
            queue.push_back(state);
        }
        while let Some(state) = queue.pop_front() {
            let next = distance[state].map(|d: usize| d + 1);
            for &pred in &predecessors[state] {
                if distance[pred].is_none() {
                    distance[pred] = next;
                    queue.push_back(pred);
                }
            }
        }
        distance
    }

    /// States reachable from the initial state
    pub fn reachable_states(&self) -> Vec<bool> {
        let mut seen = vec![false; self.num_states()];
        let mut queue = VecDeque::from([self.initial]);
        seen[self.initial] = true;
        while let Some(state) = queue.pop_front() {
            for (_, to) in self.transitions_from(state) {
                if !seen[to] {
                    seen[to] = true;
                    queue.push_back(to);
                }
            }
        }
        seen
    }
}
