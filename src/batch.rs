//! Comma-separated batches of test words, as typed into a single input field.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::automaton::{Automaton, ComputationResult};

static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").unwrap());

/// The outcome for one word of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub word: String,
    pub result: ComputationResult,
}

impl Verdict {
    pub fn accepted(&self) -> bool {
        self.result == ComputationResult::Accept
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' -> {}", self.word, self.result)
    }
}

/// Split a batch on commas, trimming whitespace around every word.
///
/// Empty entries stay in the batch as the empty word.
pub fn split_test_strings(text: &str) -> Vec<String> {
    SEPARATOR
        .split(text.trim())
        .map(|word| word.to_string())
        .collect()
}

/// Run every word of a batch through the automaton, in order
pub fn run_batch<S: AsRef<str>>(automaton: &Automaton, words: &[S]) -> Vec<Verdict> {
    words
        .iter()
        .map(|word| Verdict {
            word: word.as_ref().to_string(),
            result: automaton.run(word.as_ref()),
        })
        .collect()
}
