//! Formula construction for one synthesis attempt
//!
//! [`encode`] is pure: it declares fresh unknowns for the given bounds and
//! returns every assertion together with the handles needed to decode a
//! model. Nothing is shared between attempts.

use crate::error::SynthResult;
use crate::problem::SynthesisProblem;
use crate::search::config::{Bounds, SynthesisConfig};
use crate::search::symbolic::drive::TargetDrive;
use crate::search::symbolic::examples::encode_example;
use crate::search::symbolic::extract::CandidateAssignment;
use crate::search::symbolic::lookahead::ClassifierSketch;
use crate::search::symbolic::product::{EnergyLaw, encode_product};
use crate::search::symbolic::sketch::CandidateSketch;
use crate::semantics::cost::{CostMode, DistanceBudget};
use z3::Model;
use z3::ast::Bool;

/// Encoding choices that stay fixed across attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    pub cost_mode: CostMode,
    pub budget: DistanceBudget,
    /// Restrict the candidate to the problem's template when it has one
    pub use_template: bool,
}

impl EncoderConfig {
    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self {
            cost_mode: config.cost_mode,
            budget: config.budget,
            use_template: config.use_template,
        }
    }
}

/// All assertions of one attempt plus the unknowns to decode
pub struct Formula {
    pub assertions: Vec<Bool>,
    pub sketch: CandidateSketch,
    pub classifier: Option<ClassifierSketch>,
    pub bounds: Bounds,
}

impl Formula {
    pub fn decode(&self, model: &Model) -> SynthResult<CandidateAssignment> {
        CandidateAssignment::decode(model, &self.sketch, self.classifier.as_ref())
    }

    /// The assertions with every assignment in `blocked` ruled out
    pub fn excluding(&self, blocked: &[CandidateAssignment]) -> Vec<Bool> {
        let mut assertions = self.assertions.clone();
        assertions.extend(
            blocked
                .iter()
                .map(|a| a.exclusion(&self.sketch, self.classifier.as_ref())),
        );
        assertions
    }
}

/// Encode `problem` at `bounds`
pub fn encode(problem: &SynthesisProblem, bounds: &Bounds, config: &EncoderConfig) -> Formula {
    let num_symbols = problem.alphabet().len();
    let template = problem.template().filter(|_| config.use_template);

    let sketch = CandidateSketch::new(bounds, num_symbols, template);
    let classifier = bounds
        .lookahead_states
        .map(|states| ClassifierSketch::new(states, num_symbols));
    let law = EnergyLaw::new(config.cost_mode, config.budget);

    let mut assertions = sketch.range_constraints();
    if let Some(template) = template {
        assertions.extend(sketch.template_constraints(template));
    }
    if let Some(classifier) = &classifier {
        assertions.extend(classifier.range_constraints());
    }
    if law.tracks_energy() {
        assertions.extend(sketch.cost_definitions());
    }

    let mut drive = TargetDrive::new(problem.target());
    assertions.extend(encode_product(
        problem.source(),
        problem.target(),
        &sketch,
        classifier.as_ref(),
        &mut drive,
        law,
    ));
    assertions.extend(drive.into_constraints());

    for (index, example) in problem.examples().iter().enumerate() {
        assertions.extend(encode_example(index, example, &sketch, classifier.as_ref()));
    }

    Formula {
        assertions,
        sketch,
        classifier,
        bounds: *bounds,
    }
}
