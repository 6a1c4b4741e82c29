use proptest::prelude::*;
use std::sync::OnceLock;

use transynth::search::{AttemptVerdict, escalation_schedule};
use transynth::{
    Alphabet, Automaton, CostMode, DistanceBudget, Minterm, SynthError, SynthesisConfig,
    SynthesisOutcome, SynthesisProblem, Transducer, Uniqueness, synthesize,
};

const UPPER: usize = 0;
const LOWER: usize = 1;
const SPACE: usize = 2;

fn budget(m: u32, n: u32) -> DistanceBudget {
    DistanceBudget::new(m, n).unwrap()
}

/// Title-cased phrases to their acronyms
fn acronym_problem() -> SynthesisProblem {
    let alphabet = Alphabet::new(vec![
        Minterm::new("upper", vec![('A', 'Z')]).unwrap(),
        Minterm::new("lower", vec![('a', 'z')]).unwrap(),
        Minterm::new("space", vec![(' ', ' ')]).unwrap(),
    ])
    .unwrap();
    let source = Automaton::from_parts(
        3,
        3,
        0,
        &[1],
        &[(0, UPPER, 1), (1, LOWER, 1), (1, SPACE, 2), (2, UPPER, 1)],
    )
    .unwrap();
    let target = Automaton::from_parts(2, 3, 0, &[1], &[(0, UPPER, 1), (1, UPPER, 1)]).unwrap();
    SynthesisProblem::new(alphabet, source, target)
        .unwrap()
        .with_example("Principles Of Programming Languages", "POPL")
        .unwrap()
}

fn acronym_transducer() -> &'static Transducer {
    static TRANSDUCER: OnceLock<Transducer> = OnceLock::new();
    TRANSDUCER.get_or_init(|| {
        let config = SynthesisConfig::default()
            .with_cost_mode(CostMode::Mean)
            .with_budget(budget(1, 1));
        let result = synthesize(&acronym_problem(), &config).unwrap();
        result.transducer().expect("an acronym transducer").clone()
    })
}

/// Automaton accepting exactly `word`
fn single_word(alphabet: &str, word: &[usize]) -> Automaton {
    let transitions: Vec<_> = word.iter().enumerate().map(|(i, &s)| (i, s, i + 1)).collect();
    Automaton::from_parts(word.len() + 1, alphabet.len(), 0, &[word.len()], &transitions).unwrap()
}

fn word_problem(alphabet: &str, input: &[usize], output: &[usize]) -> SynthesisProblem {
    SynthesisProblem::new(
        Alphabet::from_chars(alphabet.chars()).unwrap(),
        single_word(alphabet, input),
        single_word(alphabet, output),
    )
    .unwrap()
}

fn assert_monotone(result: &transynth::SynthesisResult) {
    let attempts = &result.statistics.attempts;
    let (last, earlier) = attempts.split_last().expect("at least one attempt");
    assert_eq!(last.verdict, AttemptVerdict::Sat);
    assert!(earlier.iter().all(|a| a.verdict == AttemptVerdict::Unsat));
    assert_eq!(Some(last.bounds), result.solution().map(|s| s.bounds));
}

#[test]
fn test_acronym_generalizes() {
    let transducer = acronym_transducer();
    let problem = acronym_problem();
    assert_eq!(
        transducer.translate(problem.alphabet(), "Principles Of Programming Languages"),
        Some("POPL".to_string())
    );
    assert_eq!(
        transducer.translate(problem.alphabet(), "Hello World"),
        Some("HW".to_string())
    );
}

#[test]
fn test_acronym_found_at_smallest_bounds() {
    let config = SynthesisConfig::default().with_budget(budget(1, 1));
    let result = synthesize(&acronym_problem(), &config).unwrap();
    assert_monotone(&result);
    let solution = result.solution().unwrap();
    assert_eq!(solution.bounds.num_states, 1);
    assert_eq!(solution.bounds.output_bound, 1);
}

#[test]
fn test_substitution_bounded() {
    let problem = word_problem("ab", &[0], &[1]);
    let config = SynthesisConfig::default()
        .with_cost_mode(CostMode::Bounded)
        .with_budget(budget(1, 1));
    let result = synthesize(&problem, &config).unwrap();
    let transducer = result.transducer().expect("a transducer");
    assert!(transducer.is_deterministic());
    assert!(transducer.is_total());
    assert_eq!(transducer.apply(&[0]), Some(vec![1]));
    assert_eq!(transducer.run_cost(&[0]), Some(1));
    assert_eq!(result.statistics.attempts.len(), 1);
}

#[test]
fn test_bounded_run_spends_exact_budget() {
    // "ab" -> "cb" costs exactly one substitution
    let problem = word_problem("abc", &[0, 1], &[2, 1]);
    let config = SynthesisConfig::default()
        .with_cost_mode(CostMode::Bounded)
        .with_budget(budget(1, 1));
    let result = synthesize(&problem, &config).unwrap();
    let transducer = result.transducer().expect("a transducer");
    assert_eq!(transducer.apply(&[0, 1]), Some(vec![2, 1]));
    assert_eq!(transducer.run_cost(&[0, 1]), Some(1));
}

#[test]
fn test_over_budget_is_not_found() {
    // "a" -> "bb" needs two edits
    let problem = word_problem("ab", &[0], &[1, 1]);
    let config = SynthesisConfig::default()
        .with_cost_mode(CostMode::Bounded)
        .with_budget(budget(1, 1))
        .with_max_output_bound(2)
        .with_max_states(2);
    let schedule = escalation_schedule(&problem, &config);
    let result = synthesize(&problem, &config).unwrap();

    match &result.outcome {
        SynthesisOutcome::NotFound { last_bounds } => {
            assert_eq!(*last_bounds, schedule.last().copied());
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(result.statistics.attempts.len(), schedule.len());
    assert_eq!(result.statistics.unsat_attempts(), schedule.len());
}

#[test]
fn test_ambiguity_has_witness() {
    // a* into (a|b)* with nothing pinning the output
    let alphabet = Alphabet::from_chars("ab".chars()).unwrap();
    let source = Automaton::from_parts(1, 2, 0, &[0], &[(0, 0, 0)]).unwrap();
    let target = Automaton::from_parts(1, 2, 0, &[0], &[(0, 0, 0), (0, 1, 0)]).unwrap();
    let problem = SynthesisProblem::new(alphabet, source, target).unwrap();
    let config = SynthesisConfig::default()
        .with_cost_mode(CostMode::Unconstrained)
        .with_max_states(1)
        .with_max_output_bound(1)
        .with_uniqueness_check(true)
        .with_seed(7);

    let result = synthesize(&problem, &config).unwrap();
    let solution = result.solution().expect("a transducer");
    match &solution.uniqueness {
        Uniqueness::Ambiguous {
            alternative,
            witness,
        } => {
            assert!(problem.source().accepts(&witness.input));
            assert_ne!(witness.left, witness.right);
            assert_eq!(solution.transducer.apply(&witness.input), witness.left);
            assert_eq!(alternative.apply(&witness.input), witness.right);
        }
        other => panic!("expected ambiguity, got {:?}", other),
    }
    assert!(result.statistics.alternatives_checked >= 1);
}

#[test]
fn test_forced_solution_is_unique() {
    let problem = word_problem("ab", &[0], &[1]);
    let config = SynthesisConfig::default()
        .with_cost_mode(CostMode::Bounded)
        .with_budget(budget(1, 1))
        .with_uniqueness_check(true)
        .with_seed(1);
    let result = synthesize(&problem, &config).unwrap();
    let solution = result.solution().expect("a transducer");
    assert!(matches!(solution.uniqueness, Uniqueness::Unique));
}

#[test]
fn test_lookahead_rewrites_before_b() {
    // Rewrite `a` to `b` only when the next symbol is `b`
    let alphabet = Alphabet::from_chars("ab".chars()).unwrap();
    let any = Automaton::from_parts(1, 2, 0, &[0], &[(0, 0, 0), (0, 1, 0)]).unwrap();
    let problem = SynthesisProblem::new(alphabet, any.clone(), any)
        .unwrap()
        .with_example("ab", "bb")
        .unwrap()
        .with_example("aa", "aa")
        .unwrap()
        .with_example("ba", "ba")
        .unwrap();
    let config = SynthesisConfig::default()
        .with_cost_mode(CostMode::Unconstrained)
        .with_max_states(1)
        .with_max_output_bound(1)
        .with_lookahead_states(2);

    let result = synthesize(&problem, &config).unwrap();
    let solution = result.solution().expect("a lookahead transducer");
    assert!(solution.bounds.has_lookahead());
    for example in problem.examples() {
        assert_eq!(
            solution.transducer.apply(&example.input),
            Some(example.output.clone())
        );
    }
}

/// `ab | ac` into `bb | cc`: the rewrite of `a` depends on the next symbol
fn copy_next_problem() -> SynthesisProblem {
    let alphabet = Alphabet::from_chars("abc".chars()).unwrap();
    let source = Automaton::from_parts(3, 3, 0, &[2], &[(0, 0, 1), (1, 1, 2), (1, 2, 2)]).unwrap();
    let target = Automaton::from_parts(
        4,
        3,
        0,
        &[3],
        &[(0, 1, 1), (1, 1, 3), (0, 2, 2), (2, 2, 3)],
    )
    .unwrap();
    SynthesisProblem::new(alphabet, source, target).unwrap()
}

#[test]
fn test_lookahead_drives_product_without_examples() {
    let config = SynthesisConfig::default()
        .with_cost_mode(CostMode::Bounded)
        .with_budget(budget(1, 1))
        .with_max_states(1)
        .with_max_output_bound(1);

    let sequential = synthesize(&copy_next_problem(), &config).unwrap();
    assert!(matches!(sequential.outcome, SynthesisOutcome::NotFound { .. }));

    let result = synthesize(&copy_next_problem(), &config.with_lookahead_states(3)).unwrap();
    let transducer = result.transducer().expect("a lookahead transducer");
    assert_eq!(transducer.apply(&[0, 1]), Some(vec![1, 1]));
    assert_eq!(transducer.apply(&[0, 2]), Some(vec![2, 2]));
}

#[test]
fn test_resource_limit_is_inconclusive() {
    let problem = acronym_problem();
    let config = SynthesisConfig::default().with_rlimit(1);
    let first = escalation_schedule(&problem, &config)[0];

    let result = synthesize(&problem, &config).unwrap();
    match &result.outcome {
        SynthesisOutcome::Inconclusive { bounds, reason } => {
            assert_eq!(*bounds, first);
            assert!(!reason.is_empty());
        }
        other => panic!("expected Inconclusive, got {:?}", other),
    }
    assert_eq!(result.statistics.attempts.len(), 1);
    assert_eq!(result.statistics.attempts[0].verdict, AttemptVerdict::Unknown);
}

#[test]
fn test_uniqueness_undetermined_without_alternatives() {
    let problem = word_problem("ab", &[0], &[1]);
    let config = SynthesisConfig::default()
        .with_cost_mode(CostMode::Bounded)
        .with_budget(budget(1, 1))
        .with_uniqueness_check(true)
        .with_max_alternatives(0);
    let result = synthesize(&problem, &config).unwrap();
    let solution = result.solution().expect("a transducer");
    assert!(matches!(solution.uniqueness, Uniqueness::Undetermined { .. }));
    assert_eq!(result.statistics.alternatives_checked, 0);
}

#[test]
fn test_template_fixes_structure() {
    let alphabet = Alphabet::from_chars("ab".chars()).unwrap();
    let source = Automaton::from_parts(1, 2, 0, &[0], &[(0, 0, 0)]).unwrap();
    let target = Automaton::from_parts(1, 2, 0, &[0], &[(0, 1, 0)]).unwrap();
    let problem = SynthesisProblem::new(alphabet, source, target)
        .unwrap()
        .with_source_template()
        .unwrap()
        .with_example("aa", "bb")
        .unwrap();

    let result = synthesize(&problem, &SynthesisConfig::default()).unwrap();
    let transducer = result.transducer().expect("a transducer");
    assert_eq!(transducer.num_states(), 1);
    assert_eq!(transducer.transitions().len(), 1);
    assert_eq!(transducer.apply(&[0, 0, 0]), Some(vec![1, 1, 1]));
}

#[test]
fn test_example_outside_alphabet() {
    let problem = word_problem("ab", &[0], &[1]);
    match problem.with_example("c", "b") {
        Err(SynthError::MalformedExample { index, .. }) => assert_eq!(index, 0),
        other => panic!("expected MalformedExample, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_example_outside_source_language() {
    let problem = word_problem("ab", &[0], &[1]);
    assert!(matches!(
        problem.with_example("aa", "b"),
        Err(SynthError::MalformedExample { .. })
    ));
}

#[test]
fn test_bounded_mode_rejects_fractional_budget() {
    let problem = word_problem("ab", &[0], &[1]);
    let config = SynthesisConfig::default()
        .with_cost_mode(CostMode::Bounded)
        .with_budget(budget(1, 2));
    assert!(matches!(
        synthesize(&problem, &config),
        Err(SynthError::InvalidBudget(_))
    ));
}

fn phrase() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[A-Z][a-z]{0,6}", 1..5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn acronym_keeps_initials(words in phrase()) {
        let problem = acronym_problem();
        let text = words.join(" ");
        let expected: String = words.iter().filter_map(|w| w.chars().next()).collect();
        prop_assert_eq!(
            acronym_transducer().translate(problem.alphabet(), &text),
            Some(expected)
        );
    }
}
