//! Core index types shared by automata, transducers and the encoder

/// Dense index of an alphabet symbol (a minterm) in `[0, |Σ|)`
pub type SymbolId = usize;

/// Dense index of an automaton or transducer state
pub type StateId = usize;

/// The initial state of every synthesized candidate transducer
pub const INITIAL_STATE: StateId = 0;

/// The classifier state summarizing an empty right context
pub const LOOKAHEAD_INITIAL: StateId = 0;
