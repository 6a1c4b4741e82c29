//! Alphabet map: a partition of characters into named minterms
//!
//! Every synthesis run works over a finite alphabet whose symbols are
//! disjoint character classes. The map between minterms and the dense
//! range `[0, |Σ|)` is built once per problem and handed down explicitly.

use crate::error::{SynthError, SynthResult};
use crate::ir::types::SymbolId;
use std::ops::Range;

/// A named character class, stored as inclusive ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minterm {
    name: String,
    ranges: Vec<(char, char)>,
}

impl Minterm {
    pub fn new(name: impl Into<String>, ranges: Vec<(char, char)>) -> SynthResult<Self> {
        let name = name.into();
        if ranges.is_empty() {
            return Err(SynthError::InvalidAlphabet(format!(
                "minterm '{}' has no character ranges",
                name
            )));
        }
        if let Some((lo, hi)) = ranges.iter().find(|(lo, hi)| lo > hi) {
            return Err(SynthError::InvalidAlphabet(format!(
                "minterm '{}' has an empty range {:?}-{:?}",
                name, lo, hi
            )));
        }
        Ok(Self { name, ranges })
    }

    /// A minterm holding exactly one character, named after it
    pub fn single(c: char) -> Self {
        Self {
            name: c.to_string(),
            ranges: vec![(c, c)],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    pub fn contains(&self, c: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
    }

    /// Character emitted when this minterm is produced without a matching input
    pub fn representative(&self) -> char {
        self.ranges[0].0
    }

    fn overlaps(&self, other: &Minterm) -> bool {
        self.ranges.iter().any(|&(lo, hi)| {
            other
                .ranges
                .iter()
                .any(|&(olo, ohi)| lo <= ohi && olo <= hi)
        })
    }
}

/// Bijection between minterms and dense symbol ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    minterms: Vec<Minterm>,
}

impl Alphabet {
    /// Build an alphabet; minterm names must be unique and classes disjoint
    pub fn new(minterms: Vec<Minterm>) -> SynthResult<Self> {
        if minterms.is_empty() {
            return Err(SynthError::InvalidAlphabet("alphabet is empty".to_string()));
        }
        for (i, a) in minterms.iter().enumerate() {
            for b in &minterms[i + 1..] {
                if a.name == b.name {
                    return Err(SynthError::InvalidAlphabet(format!(
                        "duplicate minterm name '{}'",
                        a.name
                    )));
                }
                if a.overlaps(b) {
                    return Err(SynthError::InvalidAlphabet(format!(
                        "minterms '{}' and '{}' overlap",
                        a.name, b.name
                    )));
                }
            }
        }
        Ok(Self { minterms })
    }

    /// One singleton minterm per distinct character, in sorted order
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> SynthResult<Self> {
        let mut chars: Vec<char> = chars.into_iter().collect();
        chars.sort_unstable();
        chars.dedup();
        Self::new(chars.into_iter().map(Minterm::single).collect())
    }

    pub fn len(&self) -> usize {
        self.minterms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minterms.is_empty()
    }

    pub fn symbols(&self) -> Range<SymbolId> {
        0..self.minterms.len()
    }

    pub fn minterm(&self, symbol: SymbolId) -> &Minterm {
        &self.minterms[symbol]
    }

    pub fn symbol_of(&self, c: char) -> Option<SymbolId> {
        self.minterms.iter().position(|m| m.contains(c))
    }

    pub fn symbol_named(&self, name: &str) -> Option<SymbolId> {
        self.minterms.iter().position(|m| m.name == name)
    }

    /// Map a string onto symbols; the error carries the first unmapped character
    pub fn encode(&self, text: &str) -> Result<Vec<SymbolId>, char> {
        text.chars()
            .map(|c| self.symbol_of(c).ok_or(c))
            .collect()
    }

    /// Render a symbol sequence, bracketing multi-character minterms
    pub fn render(&self, symbols: &[SymbolId]) -> String {
        symbols.iter().map(|&s| self.label(s)).collect()
    }

    /// Display label of a single symbol
    pub fn label(&self, symbol: SymbolId) -> String {
        let minterm = &self.minterms[symbol];
        match minterm.ranges.as_slice() {
            [(lo, hi)] if lo == hi && minterm.name.chars().count() == 1 => minterm.name.clone(),
            _ => format!("[{}]", minterm.name),
        }
    }
}
