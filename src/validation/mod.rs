//! Validation utilities for fast differential testing

pub mod random;

pub use random::{RandomInputConfig, enumerate_words, generate_random_words};
