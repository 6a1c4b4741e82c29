//! Explicit finite-state transducers produced by synthesis

use crate::ir::alphabet::Alphabet;
use crate::ir::types::{StateId, SymbolId};
use crate::semantics::cost::edit_cost;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

/// A labeled transition `from --symbol / output--> to`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
    pub from: StateId,
    pub symbol: SymbolId,
    pub to: StateId,
    pub output: Vec<SymbolId>,
}

impl Transition {
    /// Edit cost of this transition relative to copying its input symbol
    pub fn edit_cost(&self) -> u64 {
        edit_cost(self.symbol, &self.output)
    }
}

/// A (possibly non-deterministic) finite-state transducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transducer {
    num_states: usize,
    num_symbols: usize,
    initial: StateId,
    finals: BTreeSet<StateId>,
    transitions: Vec<Transition>,
    outgoing: Vec<Vec<usize>>,
}

impl Transducer {
    pub fn new(
        num_states: usize,
        num_symbols: usize,
        initial: StateId,
        finals: impl IntoIterator<Item = StateId>,
        mut transitions: Vec<Transition>,
    ) -> Self {
        transitions.sort();
        transitions.dedup();
        let mut outgoing = vec![Vec::new(); num_states];
        for (index, transition) in transitions.iter().enumerate() {
            outgoing[transition.from].push(index);
        }
        Self {
            num_states,
            num_symbols,
            initial,
            finals: finals.into_iter().collect(),
            transitions,
            outgoing,
        }
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    pub fn initial_state(&self) -> StateId {
        self.initial
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    pub fn final_states(&self) -> &BTreeSet<StateId> {
        &self.finals
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transitions leaving `state` on `symbol`
    pub fn transitions_on(&self, state: StateId, symbol: SymbolId) -> impl Iterator<Item = &Transition> {
        self.outgoing[state]
            .iter()
            .map(|&index| &self.transitions[index])
            .filter(move |t| t.symbol == symbol)
    }

    /// At most one transition per state and symbol
    pub fn is_deterministic(&self) -> bool {
        (0..self.num_states).all(|state| {
            (0..self.num_symbols).all(|symbol| self.transitions_on(state, symbol).count() <= 1)
        })
    }

    /// Exactly one transition per state and symbol
    pub fn is_total(&self) -> bool {
        (0..self.num_states).all(|state| {
            (0..self.num_symbols).all(|symbol| self.transitions_on(state, symbol).count() == 1)
        })
    }

    /// All outputs of accepting runs on `input`
    pub fn outputs(&self, input: &[SymbolId]) -> BTreeSet<Vec<SymbolId>> {
        let mut configs: BTreeSet<(StateId, Vec<SymbolId>)> =
            BTreeSet::from([(self.initial, Vec::new())]);
        for &symbol in input {
            let mut next = BTreeSet::new();
            for (state, output) in &configs {
                for transition in self.transitions_on(*state, symbol) {
                    let mut extended = output.clone();
                    extended.extend_from_slice(&transition.output);
                    next.insert((transition.to, extended));
                }
            }
            if next.is_empty() {
                return BTreeSet::new();
            }
            configs = next;
        }
        configs
            .into_iter()
            .filter(|(state, _)| self.is_final(*state))
            .map(|(_, output)| output)
            .collect()
    }

    /// The output on `input` when exactly one accepting run produces one
    pub fn apply(&self, input: &[SymbolId]) -> Option<Vec<SymbolId>> {
        let mut outputs = self.outputs(input).into_iter();
        match (outputs.next(), outputs.next()) {
            (Some(output), None) => Some(output),
            _ => None,
        }
    }

    /// Run on concrete text.
    ///
    /// An emitted symbol equal to the consumed one copies the consumed
    /// character; any other symbol emits its minterm's representative.
    pub fn translate(&self, alphabet: &Alphabet, text: &str) -> Option<String> {
        let mut configs: BTreeSet<(StateId, String)> =
            BTreeSet::from([(self.initial, String::new())]);
        for c in text.chars() {
            let symbol = alphabet.symbol_of(c)?;
            let mut next = BTreeSet::new();
            for (state, output) in &configs {
                for transition in self.transitions_on(*state, symbol) {
                    let mut extended = output.clone();
                    for &emitted in &transition.output {
                        if emitted == symbol {
                            extended.push(c);
                        } else {
                            extended.push(alphabet.minterm(emitted).representative());
                        }
                    }
                    next.insert((transition.to, extended));
                }
            }
            configs = next;
        }
        let mut accepted = configs
            .into_iter()
            .filter(|(state, _)| self.is_final(*state))
            .map(|(_, output)| output);
        match (accepted.next(), accepted.next()) {
            (Some(output), None) => Some(output),
            _ => None,
        }
    }

    /// Sum of edit costs along the unique run on `input`
    pub fn run_cost(&self, input: &[SymbolId]) -> Option<u64> {
        let mut state = self.initial;
        let mut cost = 0;
        for &symbol in input {
            let mut candidates = self.transitions_on(state, symbol);
            let transition = candidates.next()?;
            if candidates.next().is_some() {
                return None;
            }
            cost += transition.edit_cost();
            state = transition.to;
        }
        Some(cost)
    }

    /// Drop states unreachable from the initial state and renumber densely
    pub fn trim(&self) -> Transducer {
        let mut index = vec![None; self.num_states];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([self.initial]);
        index[self.initial] = Some(0);
        order.push(self.initial);
        while let Some(state) = queue.pop_front() {
            for &t in &self.outgoing[state] {
                let to = self.transitions[t].to;
                if index[to].is_none() {
                    index[to] = Some(order.len());
                    order.push(to);
                    queue.push_back(to);
                }
            }
        }

        let transitions = self
            .transitions
            .iter()
            .filter_map(|t| {
                Some(Transition {
                    from: index[t.from]?,
                    symbol: t.symbol,
                    to: index[t.to]?,
                    output: t.output.clone(),
                })
            })
            .collect();
        let finals = self.finals.iter().filter_map(|&s| index[s]);
        Transducer::new(order.len(), self.num_symbols, 0, finals, transitions)
    }

    /// Human-readable listing of the transitions using alphabet labels
    pub fn display<'a>(&'a self, alphabet: &'a Alphabet) -> TransducerDisplay<'a> {
        TransducerDisplay {
            transducer: self,
            alphabet,
        }
    }
}

/// Formatter returned by [`Transducer::display`]
pub struct TransducerDisplay<'a> {
    transducer: &'a Transducer,
    alphabet: &'a Alphabet,
}

impl fmt::Display for TransducerDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.transducer;
        let finals: Vec<String> = t.finals.iter().map(|s| format!("q{}", s)).collect();
        writeln!(
            f,
            "states: {}, initial: q{}, final: {{{}}}",
            t.num_states,
            t.initial,
            finals.join(", ")
        )?;
        for transition in &t.transitions {
            let output = if transition.output.is_empty() {
                "ε".to_string()
            } else {
                self.alphabet.render(&transition.output)
            };
            writeln!(
                f,
                "  q{} --{} / {}--> q{}",
                transition.from,
                self.alphabet.label(transition.symbol),
                output,
                transition.to
            )?;
        }
        Ok(())
    }
}
