//! Example consistency: the candidate's run reproduces each example exactly
//!
//! Per example, position `i` of the input carries the candidate state and
//! the number of output symbols produced so far. Each step advances both
//! and pins the emitted symbols to the expected output.

use crate::ir::types::INITIAL_STATE;
use crate::problem::Example;
use crate::search::symbolic::lookahead::ClassifierSketch;
use crate::search::symbolic::sketch::CandidateSketch;
use crate::semantics::smt::{all, equals, in_range};
use z3::ast::{Bool, Int};

/// Constraints forcing the candidate to map `example.input` to `example.output`
pub fn encode_example(
    index: usize,
    example: &Example,
    sketch: &CandidateSketch,
    classifier: Option<&ClassifierSketch>,
) -> Vec<Bool> {
    let prefix = format!("ex{}", index);
    let (word, expected) = (&example.input, &example.output);
    let n = word.len();
    let m = expected.len();

    let states: Vec<Int> = (0..=n)
        .map(|i| Int::new_const(format!("{}_state_{}", prefix, i)))
        .collect();
    let positions: Vec<Int> = (0..=n)
        .map(|i| Int::new_const(format!("{}_pos_{}", prefix, i)))
        .collect();

    let mut constraints = vec![
        equals(&states[0], INITIAL_STATE),
        equals(&positions[0], 0),
        equals(&positions[n], m),
    ];
    for i in 0..=n {
        constraints.push(in_range(&states[i], 0, sketch.num_states() as i64));
        constraints.push(in_range(&positions[i], 0, m as i64 + 1));
    }

    // Without lookahead every position sees classifier state 0
    let lookahead = match classifier {
        Some(classifier) => {
            let (run, run_constraints) = classifier.reverse_run(&prefix, word);
            constraints.extend(run_constraints);
            Some(run)
        }
        None => None,
    };

    for (i, &a) in word.iter().enumerate() {
        for q in 0..sketch.num_states() {
            for l in 0..sketch.lookahead_states() {
                let mut premise = vec![equals(&states[i], q)];
                if let Some(run) = &lookahead {
                    premise.push(equals(&run[i + 1], l));
                }

                if !sketch.is_materialized(q, a) {
                    constraints.push(all(premise).not());
                    continue;
                }

                let transition = sketch.transition((q, l, a));
                constraints.push(all(premise.clone()).implies(&Bool::and(&[
                    states[i + 1].eq(&transition.step),
                    positions[i + 1].eq(&Int::add(&[&positions[i], &transition.out_len])),
                ])));

                for p in 0..=m {
                    for len in 0..=sketch.output_bound() {
                        let mut case = premise.clone();
                        case.push(equals(&positions[i], p));
                        case.push(equals(&transition.out_len, len));

                        let emitted = if p + len > m {
                            Bool::from_bool(false)
                        } else {
                            all(transition.out_syms[..len]
                                .iter()
                                .zip(&expected[p..p + len])
                                .map(|(sym, &b)| equals(sym, b))
                                .collect())
                        };
                        constraints.push(all(case).implies(&emitted));
                    }
                }
            }
        }
    }

    constraints
}
