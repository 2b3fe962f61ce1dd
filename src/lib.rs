//! Grammar-FA turns right-regular grammars into finite automata.
//!
//! Rules have the shape `A -> aB | b | ε`: each alternative is the empty
//! string, a lone terminal, or a terminal followed by the non-terminal it
//! moves to. Non-terminals become states, and every lone terminal leads into
//! a single shared accepting state named `accept`.
//!
//! # Example
//!
//! ```rust
//! use grammar_fa::compile;
//!
//! let automaton = compile(&["S -> aA", "A -> b"], "S").unwrap();
//!
//! assert!(automaton.accepts("ab"));
//! assert!(!automaton.accepts("a"));
//! assert!(!automaton.accepts(""));
//! ```

pub mod automaton;
pub mod batch;
pub mod export;
pub mod generator;
pub mod grammar;
pub mod utils;

pub use automaton::{Automaton, ComputationResult, Determinism};
pub use grammar::{compile, compile_with_config, Grammar, GrammarBuilder, GrammarConfig};
pub use utils::{GrammarError, Result};

// Re-export the parsed rule types
pub use grammar::{Alternative, Rule};
