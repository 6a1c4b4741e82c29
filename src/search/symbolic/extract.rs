//! Model-to-transducer extraction
//!
//! A satisfying model is first decoded into a plain [`CandidateAssignment`]
//! (no solver handles), which can then be dumped for debugging, turned into
//! an explicit [`Transducer`], or negated to exclude it from the next solve.

use crate::error::{SynthError, SynthResult};
use crate::ir::transducer::{Transducer, Transition};
use crate::ir::types::{INITIAL_STATE, LOOKAHEAD_INITIAL, StateId, SymbolId};
use crate::search::symbolic::lookahead::ClassifierSketch;
use crate::search::symbolic::sketch::{CandidateSketch, TransitionKey};
use crate::semantics::smt::{any, equals, eval_int};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use z3::Model;
use z3::ast::Bool;

/// Decoded value of one candidate transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedTransition {
    pub to: StateId,
    pub output: Vec<SymbolId>,
}

/// Concrete values of every materialized candidate unknown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateAssignment {
    pub num_states: usize,
    pub num_symbols: usize,
    pub transitions: BTreeMap<TransitionKey, AssignedTransition>,
    /// `classifier[l][a]`, present only for lookahead synthesis
    pub classifier: Option<Vec<Vec<StateId>>>,
}

fn read(model: &Model, value: &z3::ast::Int, what: &str, upper: usize) -> SynthResult<usize> {
    let raw = eval_int(model, value)
        .ok_or_else(|| SynthError::ModelDecoding(format!("no value for {}", what)))?;
    if raw < 0 || raw as usize >= upper {
        return Err(SynthError::ModelDecoding(format!(
            "{} = {} is outside [0, {})",
            what, raw, upper
        )));
    }
    Ok(raw as usize)
}

impl CandidateAssignment {
    pub fn decode(
        model: &Model,
        sketch: &CandidateSketch,
        classifier: Option<&ClassifierSketch>,
    ) -> SynthResult<Self> {
        let mut transitions = BTreeMap::new();
        for key in sketch.keys() {
            let t = sketch.transition(key);
            let what = |field: &str| format!("{} of {:?}", field, key);
            let to = read(model, &t.step, &what("step"), sketch.num_states())?;
            let len = read(model, &t.out_len, &what("output length"), sketch.output_bound() + 1)?;
            let output = t.out_syms[..len]
                .iter()
                .map(|sym| read(model, sym, &what("output symbol"), sketch.num_symbols()))
                .collect::<SynthResult<Vec<_>>>()?;
            transitions.insert(key, AssignedTransition { to, output });
        }

        let classifier = match classifier {
            Some(c) => Some(
                (0..c.num_states())
                    .map(|l| {
                        (0..c.num_symbols())
                            .map(|a| read(model, c.value(l, a), &format!("classify({}, {})", l, a), c.num_states()))
                            .collect::<SynthResult<Vec<_>>>()
                    })
                    .collect::<SynthResult<Vec<_>>>()?,
            ),
            None => None,
        };

        Ok(Self {
            num_states: sketch.num_states(),
            num_symbols: sketch.num_symbols(),
            transitions,
            classifier,
        })
    }

    fn lookahead_states(&self) -> usize {
        self.classifier.as_ref().map_or(1, Vec::len)
    }

    /// The explicit transducer: deterministic without lookahead, composed otherwise
    pub fn to_transducer(&self) -> Transducer {
        match &self.classifier {
            None => self.deterministic(),
            Some(classifier) => self.compose(classifier),
        }
    }

    /// Every state is final; the candidate accepts whatever the source accepts
    fn deterministic(&self) -> Transducer {
        let transitions = self
            .transitions
            .iter()
            .map(|(&(q, _, a), t)| Transition {
                from: q,
                symbol: a,
                to: t.to,
                output: t.output.clone(),
            })
            .collect();
        Transducer::new(
            self.num_states,
            self.num_symbols,
            INITIAL_STATE,
            0..self.num_states,
            transitions,
        )
    }

    /// Forward candidate composed with the backward classifier.
    ///
    /// State `(q, l)` is numbered `q * L + l`; a fresh initial state copies the
    /// outgoing transitions of every `(0, l)`, and `(q, 0)` states are final.
    fn compose(&self, classifier: &[Vec<StateId>]) -> Transducer {
        let lookahead = classifier.len();
        let pair = |q: StateId, l: StateId| q * lookahead + l;
        let fresh = self.num_states * lookahead;

        let mut transitions = Vec::new();
        for (&(q, l2, a), t) in &self.transitions {
            let transition = Transition {
                from: pair(q, classifier[l2][a]),
                symbol: a,
                to: pair(t.to, l2),
                output: t.output.clone(),
            };
            if q == INITIAL_STATE {
                transitions.push(Transition {
                    from: fresh,
                    ..transition.clone()
                });
            }
            transitions.push(transition);
        }

        let finals = (0..self.num_states)
            .map(|q| pair(q, LOOKAHEAD_INITIAL))
            .chain([fresh]);
        Transducer::new(fresh + 1, self.num_symbols, fresh, finals, transitions).trim()
    }

    /// Candidate states reachable from the initial state under any lookahead
    fn reachable_states(&self) -> BTreeSet<StateId> {
        let mut seen = BTreeSet::from([INITIAL_STATE]);
        let mut queue = VecDeque::from([INITIAL_STATE]);
        while let Some(q) = queue.pop_front() {
            for (_, t) in self.transitions.range((q, 0, 0)..(q + 1, 0, 0)) {
                if seen.insert(t.to) {
                    queue.push_back(t.to);
                }
            }
        }
        seen
    }

    /// Holds for any assignment that differs from this one on a reachable
    /// transition or on the classifier
    pub fn exclusion(&self, sketch: &CandidateSketch, classifier: Option<&ClassifierSketch>) -> Bool {
        let reachable = self.reachable_states();
        let mut differences = Vec::new();
        for (&key, assigned) in &self.transitions {
            if !reachable.contains(&key.0) {
                continue;
            }
            let t = sketch.transition(key);
            differences.push(equals(&t.step, assigned.to).not());
            differences.push(equals(&t.out_len, assigned.output.len()).not());
            for (sym, &b) in t.out_syms.iter().zip(&assigned.output) {
                differences.push(equals(sym, b).not());
            }
        }
        if let (Some(values), Some(c)) = (&self.classifier, classifier) {
            for (l, row) in values.iter().enumerate() {
                for (a, &value) in row.iter().enumerate() {
                    differences.push(equals(c.value(l, a), value).not());
                }
            }
        }
        any(differences)
    }
}

impl fmt::Display for CandidateAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lookahead = self.lookahead_states();
        for (&(q, l, a), t) in &self.transitions {
            if lookahead > 1 {
                write!(f, "step({}, {}, {}) = {}", q, l, a, t.to)?;
            } else {
                write!(f, "step({}, {}) = {}", q, a, t.to)?;
            }
            writeln!(f, ", out = {:?}", t.output)?;
        }
        if let Some(classifier) = &self.classifier {
            for (l, row) in classifier.iter().enumerate() {
                writeln!(f, "classify({}, _) = {:?}", l, row)?;
            }
        }
        Ok(())
    }
}
