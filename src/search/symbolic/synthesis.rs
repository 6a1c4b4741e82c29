//! Iterative synthesis driver
//!
//! Bounds grow in a fixed order: the output bound first, up to its ceiling,
//! then one more candidate state with the output bound reset. Each attempt
//! encodes a fresh formula and hands it to a fresh solver. The first SAT
//! attempt wins; UNSAT escalates; UNKNOWN (usually a timeout) stops the run
//! as inconclusive, since skipping ahead would break the monotone order.

use crate::error::SynthResult;
use crate::ir::transducer::Transducer;
use crate::problem::SynthesisProblem;
use crate::search::config::{Bounds, SynthesisConfig};
use crate::search::result::{
    AttemptRecord, AttemptVerdict, Solution, SynthesisOutcome, SynthesisResult, SynthesisStatistics,
    Uniqueness,
};
use crate::search::symbolic::encoder::{EncoderConfig, Formula, encode};
use crate::search::symbolic::extract::CandidateAssignment;
use crate::semantics::equivalence::{EquivalenceResult, find_distinguishing_input};
use crate::semantics::smt::{SolveOutcome, solve};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Bounds tried by the driver, in order
pub fn escalation_schedule(problem: &SynthesisProblem, config: &SynthesisConfig) -> Vec<Bounds> {
    let state_counts: Vec<usize> = match problem.template().filter(|_| config.use_template) {
        Some(template) => vec![template.num_states()],
        None => (1..=config.max_states.unwrap_or(problem.source().num_states())).collect(),
    };
    let lookahead = config.lookahead_states;
    let max_output_bound = config.max_output_bound;
    state_counts
        .into_iter()
        .flat_map(|states| {
            (1..=max_output_bound).map(move |output_bound| Bounds {
                num_states: states,
                output_bound,
                lookahead_states: lookahead,
            })
        })
        .collect()
}

/// SMT-based transducer synthesis with bound escalation
pub struct TransducerSynthesis {
    statistics: SynthesisStatistics,
}

impl TransducerSynthesis {
    pub fn new() -> Self {
        Self {
            statistics: SynthesisStatistics::new(),
        }
    }

    pub fn synthesize(
        &mut self,
        problem: &SynthesisProblem,
        config: &SynthesisConfig,
    ) -> SynthResult<SynthesisResult> {
        self.reset();
        config.validate()?;
        let start_time = Instant::now();
        let encoder_config = EncoderConfig::from_config(config);
        let schedule = escalation_schedule(problem, config);

        info!(
            "Synthesizing over {} symbols with {} examples ({} mode, budget {})",
            problem.alphabet().len(),
            problem.examples().len(),
            config.cost_mode,
            config.budget
        );

        let mut last_bounds = None;
        for bounds in schedule {
            let formula = encode(problem, &bounds, &encoder_config);
            debug!("Trying {} ({} assertions)", bounds, formula.assertions.len());

            let attempt_start = Instant::now();
            let outcome = solve(&formula.assertions, &config.solver);
            self.record(bounds, &outcome, formula.assertions.len(), attempt_start);

            match outcome {
                SolveOutcome::Sat(model) => {
                    let assignment = formula.decode(&model)?;
                    trace!("Decoded model at {}:\n{}", bounds, assignment);
                    let transducer = assignment.to_transducer();
                    info!(
                        "Found a transducer at {} ({} states, {} transitions)",
                        bounds,
                        transducer.num_states(),
                        transducer.transitions().len()
                    );

                    let uniqueness = if config.check_uniqueness {
                        self.check_uniqueness(problem, config, &formula, &assignment, &transducer)?
                    } else {
                        Uniqueness::NotChecked
                    };

                    self.statistics.elapsed_time = start_time.elapsed();
                    return Ok(SynthesisResult {
                        outcome: SynthesisOutcome::Found(Box::new(Solution {
                            transducer,
                            bounds,
                            assignment,
                            uniqueness,
                        })),
                        statistics: self.statistics.clone(),
                    });
                }
                SolveOutcome::Unsat => {
                    debug!("No transducer at {}", bounds);
                    last_bounds = Some(bounds);
                }
                SolveOutcome::Unknown(reason) => {
                    warn!("Solver gave up at {}: {}", bounds, reason);
                    self.statistics.elapsed_time = start_time.elapsed();
                    return Ok(SynthesisResult {
                        outcome: SynthesisOutcome::Inconclusive { bounds, reason },
                        statistics: self.statistics.clone(),
                    });
                }
            }
        }

        info!("No transducer within the configured bounds");
        self.statistics.elapsed_time = start_time.elapsed();
        Ok(SynthesisResult {
            outcome: SynthesisOutcome::NotFound { last_bounds },
            statistics: self.statistics.clone(),
        })
    }

    fn record(&mut self, bounds: Bounds, outcome: &SolveOutcome, assertions: usize, start: Instant) {
        let verdict = match outcome {
            SolveOutcome::Sat(_) => AttemptVerdict::Sat,
            SolveOutcome::Unsat => AttemptVerdict::Unsat,
            SolveOutcome::Unknown(_) => AttemptVerdict::Unknown,
        };
        self.statistics.solver_calls += 1;
        self.statistics.attempts.push(AttemptRecord {
            bounds,
            verdict,
            assertions,
            elapsed_time: start.elapsed(),
        });
    }

    /// Re-solve with the found assignment excluded and look for an input
    /// on which an alternative behaves differently.
    ///
    /// Alternatives with no distinguishing input are blocked in turn, up to
    /// `max_alternatives` of them.
    fn check_uniqueness(
        &mut self,
        problem: &SynthesisProblem,
        config: &SynthesisConfig,
        formula: &Formula,
        assignment: &CandidateAssignment,
        transducer: &Transducer,
    ) -> SynthResult<Uniqueness> {
        let mut blocked = vec![assignment.clone()];
        for _ in 0..config.max_alternatives {
            self.statistics.solver_calls += 1;
            match solve(&formula.excluding(&blocked), &config.solver) {
                SolveOutcome::Unsat => {
                    info!("Solution is unique at {}", formula.bounds);
                    return Ok(Uniqueness::Unique);
                }
                SolveOutcome::Unknown(reason) => {
                    warn!("Uniqueness check inconclusive: {}", reason);
                    return Ok(Uniqueness::Undetermined { reason });
                }
                SolveOutcome::Sat(model) => {
                    self.statistics.alternatives_checked += 1;
                    let alternative = formula.decode(&model)?;
                    let candidate = alternative.to_transducer();
                    match find_distinguishing_input(problem.source(), transducer, &candidate, &config.witness)
                    {
                        EquivalenceResult::NotEquivalent(witness) => {
                            info!(
                                "Ambiguous: another transducer differs on \"{}\"",
                                problem.alphabet().render(&witness.input)
                            );
                            return Ok(Uniqueness::Ambiguous {
                                alternative: candidate,
                                witness,
                            });
                        }
                        EquivalenceResult::NoDifferenceFound => {
                            debug!("Alternative agrees on all tested inputs; blocking it");
                            blocked.push(alternative);
                        }
                    }
                }
            }
        }

        Ok(Uniqueness::Undetermined {
            reason: format!(
                "{} alternatives without a distinguishing input",
                config.max_alternatives
            ),
        })
    }

    /// Get statistics from the most recent run
    pub fn statistics(&self) -> SynthesisStatistics {
        self.statistics.clone()
    }

    pub fn reset(&mut self) {
        self.statistics = SynthesisStatistics::new();
    }
}

impl Default for TransducerSynthesis {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the driver once with a fresh synthesizer
pub fn synthesize(problem: &SynthesisProblem, config: &SynthesisConfig) -> SynthResult<SynthesisResult> {
    TransducerSynthesis::new().synthesize(problem, config)
}
