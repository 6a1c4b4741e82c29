//! Synthesis problems: languages, examples and an optional template
//!
//! A [`SynthesisProblem`] owns everything the encoder reads. Both automata
//! are totalized on construction and every example is checked against the
//! alphabet and the two languages before any solver call.

pub mod file;

use crate::error::{SynthError, SynthResult};
use crate::ir::alphabet::Alphabet;
use crate::ir::automaton::Automaton;
use crate::ir::types::{INITIAL_STATE, StateId, SymbolId};

pub use file::ProblemFile;

/// A concrete input/output pair the transducer must reproduce exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub input: Vec<SymbolId>,
    pub output: Vec<SymbolId>,
}

/// Fixed transition structure for the candidate.
///
/// States are relabelled so the template's initial state becomes state 0,
/// the candidate's initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    automaton: Automaton,
}

impl Template {
    pub fn new(automaton: &Automaton) -> SynthResult<Self> {
        let initial = automaton.initial_state();
        let relabel = |state: StateId| {
            if state == initial {
                INITIAL_STATE
            } else if state == INITIAL_STATE {
                initial
            } else {
                state
            }
        };

        let finals: Vec<StateId> = automaton
            .states()
            .filter(|&s| automaton.is_final(s))
            .map(relabel)
            .collect();
        let transitions: Vec<(StateId, SymbolId, StateId)> = automaton
            .states()
            .flat_map(|from| {
                automaton
                    .transitions_from(from)
                    .map(move |(symbol, to)| (relabel(from), symbol, relabel(to)))
            })
            .collect();

        Ok(Self {
            automaton: Automaton::from_parts(
                automaton.num_states(),
                automaton.num_symbols(),
                INITIAL_STATE,
                &finals,
                &transitions,
            )?,
        })
    }

    pub fn num_states(&self) -> usize {
        self.automaton.num_states()
    }

    pub fn num_symbols(&self) -> usize {
        self.automaton.num_symbols()
    }

    /// Successor of `(state, symbol)` fixed by the template, if the pair is defined
    pub fn successor(&self, state: StateId, symbol: SymbolId) -> Option<StateId> {
        if state >= self.num_states() || symbol >= self.num_symbols() {
            return None;
        }
        self.automaton.step(state, symbol)
    }

    pub fn allows(&self, state: StateId, symbol: SymbolId) -> bool {
        self.successor(state, symbol).is_some()
    }

    /// All `(state, symbol, successor)` triples of the template
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.automaton.states().flat_map(move |from| {
            self.automaton
                .transitions_from(from)
                .map(move |(symbol, to)| (from, symbol, to))
        })
    }
}

/// Everything a synthesis run needs, validated up front
#[derive(Debug, Clone)]
pub struct SynthesisProblem {
    alphabet: Alphabet,
    declared_source: Automaton,
    source: Automaton,
    target: Automaton,
    examples: Vec<Example>,
    template: Option<Template>,
}

impl SynthesisProblem {
    /// Build a problem; both automata must range over `alphabet`
    pub fn new(alphabet: Alphabet, source: Automaton, target: Automaton) -> SynthResult<Self> {
        for (role, automaton) in [("source", &source), ("target", &target)] {
            if automaton.num_symbols() != alphabet.len() {
                return Err(SynthError::AlphabetMismatch(format!(
                    "{} automaton has {} symbols, alphabet has {}",
                    role,
                    automaton.num_symbols(),
                    alphabet.len()
                )));
            }
        }
        Ok(Self {
            alphabet,
            source: source.totalize(),
            declared_source: source,
            target: target.totalize(),
            examples: Vec::new(),
            template: None,
        })
    }

    /// Add an example given as text
    pub fn with_example(self, input: &str, output: &str) -> SynthResult<Self> {
        let index = self.examples.len();
        let outside = |c: char| SynthError::MalformedExample {
            index,
            reason: format!("character {:?} is outside the alphabet", c),
        };
        let input = self.alphabet.encode(input).map_err(outside)?;
        let output = self.alphabet.encode(output).map_err(outside)?;
        self.with_symbol_example(input, output)
    }

    /// Add an example given as symbol sequences
    pub fn with_symbol_example(mut self, input: Vec<SymbolId>, output: Vec<SymbolId>) -> SynthResult<Self> {
        let index = self.examples.len();
        let malformed = |reason: String| SynthError::MalformedExample { index, reason };

        if let Some(&symbol) = input.iter().chain(&output).find(|&&s| s >= self.alphabet.len()) {
            return Err(malformed(format!(
                "symbol {} out of range (alphabet size: {})",
                symbol,
                self.alphabet.len()
            )));
        }
        if !self.source.accepts(&input) {
            return Err(malformed(format!(
                "input \"{}\" is not in the source language",
                self.alphabet.render(&input)
            )));
        }
        if !self.target.accepts(&output) {
            return Err(malformed(format!(
                "output \"{}\" is not in the target language",
                self.alphabet.render(&output)
            )));
        }

        self.examples.push(Example { input, output });
        Ok(self)
    }

    /// Fix the candidate's transition structure to `template`
    pub fn with_template(mut self, template: &Automaton) -> SynthResult<Self> {
        if template.num_symbols() != self.alphabet.len() {
            return Err(SynthError::AlphabetMismatch(format!(
                "template has {} symbols, alphabet has {}",
                template.num_symbols(),
                self.alphabet.len()
            )));
        }
        self.template = Some(Template::new(template)?);
        Ok(self)
    }

    /// Use the source automaton, as declared, as the template
    pub fn with_source_template(self) -> SynthResult<Self> {
        let source = self.declared_source.clone();
        self.with_template(&source)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The totalized source automaton
    pub fn source(&self) -> &Automaton {
        &self.source
    }

    /// The totalized target automaton
    pub fn target(&self) -> &Automaton {
        &self.target
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }
}
