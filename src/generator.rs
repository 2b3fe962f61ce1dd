use std::collections::BTreeSet;

use log::trace;
use rand::Rng;

use crate::automaton::Automaton;

/// Produces random words accepted by an automaton.
///
/// Each walk starts at the initial state; at every step it picks uniformly
/// between stopping (only offered in accepting states) and each outgoing
/// transition.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    automaton: &'a Automaton,
    max_length: usize,
}

impl<'a> Generator<'a> {
    pub fn new(automaton: &'a Automaton, max_length: usize) -> Self {
        Generator {
            automaton,
            max_length,
        }
    }

    /// Generate one word using the thread-local RNG
    pub fn generate(&self) -> Option<String> {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate one word.
    ///
    /// Returns `None` when the walk reaches a dead end or grows past the
    /// maximum length; any returned word is accepted by the automaton.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        let mut state = self.automaton.initial_state()?;
        let mut word = String::new();

        for _ in 0..=self.max_length {
            let can_stop = self.automaton.is_accepting(state);

            // Sorted so that seeded RNGs give reproducible walks
            let mut moves: Vec<(char, &str)> = self
                .automaton
                .outgoing(state)
                .map(|targets| targets.iter().map(|(c, to)| (*c, to.as_str())).collect())
                .unwrap_or_default();
            moves.sort();

            let choices = moves.len() + usize::from(can_stop);
            if choices == 0 {
                trace!("Walk died in `{}` after {:?}", state, word);
                return None;
            }

            let pick = rng.gen_range(0..choices);
            if can_stop && pick == moves.len() {
                return Some(word);
            }

            let (symbol, next) = moves[pick];
            word.push(symbol);
            state = next;
        }

        trace!("Walk exceeded {} symbols", self.max_length);
        None
    }

    /// Collect up to `count` distinct words, sorted
    pub fn samples(&self, count: usize) -> Vec<String> {
        self.samples_with(count, &mut rand::thread_rng())
    }

    /// Collect up to `count` distinct words using `rng`
    pub fn samples_with<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        let mut words = BTreeSet::new();
        let attempts = count.saturating_mul(20);

        for _ in 0..attempts {
            if words.len() >= count {
                break;
            }
            if let Some(word) = self.generate_with(rng) {
                words.insert(word);
            }
        }

        words.into_iter().collect()
    }
}
