//! Random input generation for fast differential testing
//!
//! Words are drawn by random walks over the source automaton that never
//! leave its live states, so every generated word is accepted.

use crate::ir::automaton::Automaton;
use crate::ir::types::SymbolId;
use rand::Rng;

/// Configuration for random word generation
#[derive(Debug, Clone)]
pub struct RandomInputConfig {
    /// Number of random words to generate
    pub count: usize,
    /// Length after which the walk heads straight for a final state
    pub max_length: usize,
    /// Probability of stopping whenever the walk sits on a final state
    pub stop_probability: f64,
}

impl Default for RandomInputConfig {
    fn default() -> Self {
        RandomInputConfig {
            count: 64,
            max_length: 12,
            stop_probability: 0.2,
        }
    }
}

/// Generate random words accepted by `source`
///
/// Returns an empty list when `source` accepts nothing.
pub fn generate_random_words<R: Rng>(
    source: &Automaton,
    config: &RandomInputConfig,
    rng: &mut R,
) -> Vec<Vec<SymbolId>> {
    let distance = source.distances_to_final();
    if distance[source.initial_state()].is_none() {
        return Vec::new();
    }

    let mut words = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let mut state = source.initial_state();
        let mut word = Vec::new();

        while word.len() < config.max_length {
            if source.is_final(state) && rng.random_bool(config.stop_probability) {
                break;
            }
            let live: Vec<(SymbolId, usize)> = source
                .transitions_from(state)
                .filter(|&(_, to)| distance[to].is_some())
                .collect();
            if live.is_empty() {
                break;
            }
            let (symbol, to) = live[rng.random_range(0..live.len())];
            word.push(symbol);
            state = to;
        }

        // Finish along a shortest accepted suffix
        while !source.is_final(state) {
            let Some((symbol, to)) = source
                .transitions_from(state)
                .filter_map(|(symbol, to)| distance[to].map(|d| (d, symbol, to)))
                .min()
                .map(|(_, symbol, to)| (symbol, to))
            else {
                break;
            };
            word.push(symbol);
            state = to;
        }

        words.push(word);
    }

    words
}

/// Cap on partial words kept per length during enumeration
const MAX_FRONTIER: usize = 100_000;

/// Every word accepted by `source` up to `max_length`, in shortlex order.
///
/// Enumeration stops after `limit` words; only live states are explored.
/// Past `MAX_FRONTIER` partial words per length the enumeration is truncated.
pub fn enumerate_words(source: &Automaton, max_length: usize, limit: usize) -> Vec<Vec<SymbolId>> {
    let live = source.live_states();
    let mut accepted = Vec::new();
    if !live[source.initial_state()] {
        return accepted;
    }

    let mut frontier = vec![(source.initial_state(), Vec::new())];
    for length in 0..=max_length {
        for (state, word) in &frontier {
            if source.is_final(*state) {
                accepted.push(word.clone());
                if accepted.len() >= limit {
                    return accepted;
                }
            }
        }
        if length == max_length {
            break;
        }
        let mut next = Vec::new();
        for (state, word) in &frontier {
            for (symbol, to) in source.transitions_from(*state) {
                if live[to] {
                    let mut extended = word.clone();
                    extended.push(symbol);
                    next.push((to, extended));
                }
            }
        }
        if next.is_empty() {
            break;
        }
        next.truncate(MAX_FRONTIER);
        frontier = next;
    }

    accepted
}
