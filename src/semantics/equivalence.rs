//! Differential checking of two transducers over a source language
//!
//! Used to turn a second satisfying assignment into a concrete witness of
//! non-uniqueness: an input accepted by the source automaton on which the
//! two transducers produce different outputs. Random words are tried
//! first, then a bounded shortlex enumeration.

use crate::ir::automaton::Automaton;
use crate::ir::transducer::Transducer;
use crate::ir::types::SymbolId;
use crate::validation::random::{RandomInputConfig, enumerate_words, generate_random_words};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Budgets for the witness search
#[derive(Debug, Clone)]
pub struct WitnessSearchConfig {
    /// Number of random source words to try first
    pub random_tests: usize,
    /// Longest word considered by the exhaustive pass
    pub max_length: usize,
    /// Maximum number of words checked by the exhaustive pass
    pub max_words: usize,
    /// Seed for the random pass (None = seeded from the OS)
    pub seed: Option<u64>,
}

impl Default for WitnessSearchConfig {
    fn default() -> Self {
        Self {
            random_tests: 64,
            max_length: 8,
            max_words: 20_000,
            seed: None,
        }
    }
}

/// An input on which two transducers disagree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    pub input: Vec<SymbolId>,
    /// Output of the first transducer (None when it has no unique output)
    pub left: Option<Vec<SymbolId>>,
    /// Output of the second transducer (None when it has no unique output)
    pub right: Option<Vec<SymbolId>>,
}

/// Result of differential checking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquivalenceResult {
    /// The transducers disagree on the witness input
    NotEquivalent(Witness),
    /// No disagreement within the search budgets (not a proof of equivalence)
    NoDifferenceFound,
}

fn disagreement(left: &Transducer, right: &Transducer, input: &[SymbolId]) -> Option<Witness> {
    let l = left.outputs(input);
    let r = right.outputs(input);
    if l == r {
        return None;
    }
    Some(Witness {
        input: input.to_vec(),
        left: left.apply(input),
        right: right.apply(input),
    })
}

/// Search for a source-accepted input on which `left` and `right` differ
pub fn find_distinguishing_input(
    source: &Automaton,
    left: &Transducer,
    right: &Transducer,
    cfg: &WitnessSearchConfig,
) -> EquivalenceResult {
    let mut rng: ChaCha8Rng = match cfg.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };
    let random_config = RandomInputConfig {
        count: cfg.random_tests,
        max_length: cfg.max_length,
        ..RandomInputConfig::default()
    };

    // Random words first, shortest witness among them
    let mut found: Option<Witness> = None;
    for word in generate_random_words(source, &random_config, &mut rng) {
        if let Some(witness) = disagreement(left, right, &word) {
            if found
                .as_ref()
                .is_none_or(|best| witness.input.len() < best.input.len())
            {
                found = Some(witness);
            }
        }
    }
    if let Some(witness) = found {
        return EquivalenceResult::NotEquivalent(witness);
    }

    for word in enumerate_words(source, cfg.max_length, cfg.max_words) {
        if let Some(witness) = disagreement(left, right, &word) {
            return EquivalenceResult::NotEquivalent(witness);
        }
    }

    EquivalenceResult::NoDifferenceFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::transducer::Transition;

    fn single_state(outputs: [&[SymbolId]; 2]) -> Transducer {
        Transducer::new(
            1,
            2,
            0,
            [0],
            outputs
                .iter()
                .enumerate()
                .map(|(symbol, out)| Transition {
                    from: 0,
                    symbol,
                    to: 0,
                    output: out.to_vec(),
                })
                .collect(),
        )
    }

    /// a* b over {a, b}
    fn a_star_b() -> Automaton {
        Automaton::from_parts(2, 2, 0, &[1], &[(0, 0, 0), (0, 1, 1)])
            .unwrap()
            .totalize()
    }

    fn config() -> WitnessSearchConfig {
        WitnessSearchConfig {
            seed: Some(42),
            ..WitnessSearchConfig::default()
        }
    }

    #[test]
    fn test_identical_transducers() {
        let t = single_state([&[0], &[1]]);
        let result = find_distinguishing_input(&a_star_b(), &t, &t.clone(), &config());
        assert_eq!(result, EquivalenceResult::NoDifferenceFound);
    }

    #[test]
    fn test_difference_found() {
        let left = single_state([&[0], &[1]]);
        let right = single_state([&[0], &[0]]);
        match find_distinguishing_input(&a_star_b(), &left, &right, &config()) {
            EquivalenceResult::NotEquivalent(witness) => {
                assert!(a_star_b().accepts(&witness.input));
                assert_ne!(witness.left, witness.right);
            }
            other => panic!("expected a witness, got {:?}", other),
        }
    }

    #[test]
    fn test_difference_outside_source_is_ignored() {
        // They only differ on `b` followed by more input, which a*b never reads
        let left = Transducer::new(
            2,
            2,
            0,
            [0, 1],
            vec![
                Transition { from: 0, symbol: 0, to: 0, output: vec![0] },
                Transition { from: 0, symbol: 1, to: 1, output: vec![1] },
                Transition { from: 1, symbol: 0, to: 1, output: vec![0] },
                Transition { from: 1, symbol: 1, to: 1, output: vec![1] },
            ],
        );
        let right = Transducer::new(
            2,
            2,
            0,
            [0, 1],
            vec![
                Transition { from: 0, symbol: 0, to: 0, output: vec![0] },
                Transition { from: 0, symbol: 1, to: 1, output: vec![1] },
                Transition { from: 1, symbol: 0, to: 1, output: vec![] },
                Transition { from: 1, symbol: 1, to: 1, output: vec![] },
            ],
        );
        let result = find_distinguishing_input(&a_star_b(), &left, &right, &config());
        assert_eq!(result, EquivalenceResult::NoDifferenceFound);
    }
}
