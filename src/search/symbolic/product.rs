//! Product reachability between source, candidate and target
//!
//! `reach(r, q, t, l)` holds when some source prefix leads the source to
//! `r`, the candidate to `q` and the candidate's output leads the target to
//! `t`, with `l` the classifier state guessed for the remaining suffix.
//! Accepted source words must land in a final target state. Alongside the
//! relation, an energy integer per tuple threads the edit budget.

use crate::ir::automaton::Automaton;
use crate::ir::types::{INITIAL_STATE, LOOKAHEAD_INITIAL, StateId};
use crate::search::symbolic::drive::TargetDrive;
use crate::search::symbolic::lookahead::ClassifierSketch;
use crate::search::symbolic::sketch::CandidateSketch;
use crate::semantics::cost::{CostMode, DistanceBudget};
use crate::semantics::smt::{all, equals};
use z3::ast::{Bool, Int};

/// How energy evolves along the product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyLaw {
    Unconstrained,
    /// Start at `budget`, pay each edit, end at exactly zero
    Bounded { budget: i64 },
    /// Earn `numerator` and pay `denominator` per edit each step, never end negative
    Mean { numerator: i64, denominator: i64 },
}

impl EnergyLaw {
    pub fn new(mode: CostMode, budget: DistanceBudget) -> Self {
        match mode {
            CostMode::Unconstrained => EnergyLaw::Unconstrained,
            CostMode::Bounded => EnergyLaw::Bounded {
                budget: budget.numerator as i64,
            },
            CostMode::Mean => EnergyLaw::Mean {
                numerator: budget.numerator as i64,
                denominator: budget.denominator as i64,
            },
        }
    }

    pub fn tracks_energy(&self) -> bool {
        !matches!(self, EnergyLaw::Unconstrained)
    }

    fn initial(&self, energy: &Int) -> Bool {
        match *self {
            EnergyLaw::Bounded { budget } => energy.eq(&Int::from_i64(budget)),
            _ => energy.eq(&Int::from_i64(0)),
        }
    }

    fn step(&self, energy: &Int, next: &Int, cost: &Int) -> Bool {
        match *self {
            EnergyLaw::Unconstrained => Bool::from_bool(true),
            EnergyLaw::Bounded { .. } => next.eq(&Int::sub(&[energy, cost])),
            EnergyLaw::Mean {
                numerator,
                denominator,
            } => {
                let charge = Int::mul(&[&Int::from_i64(denominator), cost]);
                let allowance = Int::add(&[energy, &Int::from_i64(numerator)]);
                next.le(&Int::sub(&[&allowance, &charge]))
            }
        }
    }

    fn accept(&self, energy: &Int) -> Bool {
        match *self {
            EnergyLaw::Bounded { .. } => energy.eq(&Int::from_i64(0)),
            _ => energy.ge(&Int::from_i64(0)),
        }
    }
}

/// Relation and energy unknowns over `source × candidate × target × lookahead`
pub struct ProductRelation {
    dims: [usize; 4],
    reach: Vec<Bool>,
    energy: Option<Vec<Int>>,
}

impl ProductRelation {
    pub fn declare(source: usize, candidate: usize, target: usize, lookahead: usize, with_energy: bool) -> Self {
        let dims = [source, candidate, target, lookahead];
        let tuples = move || {
            (0..source).flat_map(move |r| {
                (0..candidate).flat_map(move |q| {
                    (0..target).flat_map(move |t| (0..lookahead).map(move |l| (r, q, t, l)))
                })
            })
        };
        let reach = tuples()
            .map(|(r, q, t, l)| Bool::new_const(format!("x_{}_{}_{}_{}", r, q, t, l)))
            .collect();
        let energy = with_energy.then(|| {
            tuples()
                .map(|(r, q, t, l)| Int::new_const(format!("energy_{}_{}_{}_{}", r, q, t, l)))
                .collect()
        });
        Self { dims, reach, energy }
    }

    fn index(&self, r: StateId, q: StateId, t: StateId, l: StateId) -> usize {
        let [_, s, tc, lc] = self.dims;
        ((r * s + q) * tc + t) * lc + l
    }

    pub fn reach(&self, r: StateId, q: StateId, t: StateId, l: StateId) -> &Bool {
        &self.reach[self.index(r, q, t, l)]
    }

    pub fn energy(&self, r: StateId, q: StateId, t: StateId, l: StateId) -> Option<&Int> {
        let index = self.index(r, q, t, l);
        self.energy.as_ref().map(|e| &e[index])
    }
}

/// Seed, propagation, acceptance and energy constraints of the product.
///
/// Only source states that can still reach a final state are tracked; dead
/// source states never contribute to an accepted run.
pub fn encode_product(
    source: &Automaton,
    target: &Automaton,
    sketch: &CandidateSketch,
    classifier: Option<&ClassifierSketch>,
    drive: &mut TargetDrive<'_>,
    law: EnergyLaw,
) -> Vec<Bool> {
    let lookahead = sketch.lookahead_states();
    let product = ProductRelation::declare(
        source.num_states(),
        sketch.num_states(),
        target.num_states(),
        lookahead,
        law.tracks_energy(),
    );
    let live = source.live_states();
    let mut assertions = Vec::new();

    let (r0, t0) = (source.initial_state(), target.initial_state());
    if !live[r0] {
        return assertions;
    }

    // Any right context may follow the empty prefix
    for l in 0..lookahead {
        assertions.push(product.reach(r0, INITIAL_STATE, t0, l).clone());
        if let Some(energy) = product.energy(r0, INITIAL_STATE, t0, l) {
            assertions.push(law.initial(energy));
        }
    }

    for r in source.states().filter(|&r| live[r]) {
        for (a, r2) in source.transitions_from(r) {
            if !live[r2] {
                continue;
            }
            for q in (0..sketch.num_states()).filter(|&q| sketch.is_materialized(q, a)) {
                for t in target.states() {
                    for l in 0..lookahead {
                        let here = product.reach(r, q, t, l);
                        for l2 in 0..lookahead {
                            let key = (q, l2, a);
                            let transition = sketch.transition(key);
                            let landing = drive.landing(sketch, key, t);

                            let mut premise = vec![here.clone()];
                            if let Some(classifier) = classifier {
                                premise.push(classifier.guard(l2, a, l));
                            }

                            for q2 in 0..sketch.num_states() {
                                for t2 in target.states() {
                                    let mut moved = premise.clone();
                                    moved.push(equals(&transition.step, q2));
                                    moved.push(equals(&landing, t2));

                                    let mut conclusion = vec![product.reach(r2, q2, t2, l2).clone()];
                                    if let (Some(energy), Some(next)) =
                                        (product.energy(r, q, t, l), product.energy(r2, q2, t2, l2))
                                    {
                                        conclusion.push(law.step(energy, next, &transition.cost));
                                    }
                                    assertions.push(all(moved).implies(&all(conclusion)));
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    // Accepted words end with an empty right context
    for r in source.states().filter(|&r| source.is_final(r)) {
        for q in 0..sketch.num_states() {
            for t in target.states() {
                let reached = product.reach(r, q, t, LOOKAHEAD_INITIAL);
                if !target.is_final(t) {
                    assertions.push(reached.not());
                } else if let Some(energy) = product.energy(r, q, t, LOOKAHEAD_INITIAL) {
                    assertions.push(reached.implies(&law.accept(energy)));
                }
            }
        }
    }

    assertions
}
