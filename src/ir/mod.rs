//! Intermediate representation: alphabets, automata and transducers

pub mod alphabet;
pub mod automaton;
pub mod transducer;
pub mod types;

// Re-export commonly used types
pub use alphabet::{Alphabet, Minterm};
pub use automaton::Automaton;
pub use transducer::{Transducer, Transition};
pub use types::{StateId, SymbolId};
