use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use log::{debug, trace};

/// Outcome of running an automaton over one input word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputationResult {
    Accept,
    Reject,
}

impl From<bool> for ComputationResult {
    fn from(accepted: bool) -> Self {
        if accepted {
            ComputationResult::Accept
        } else {
            ComputationResult::Reject
        }
    }
}

impl fmt::Display for ComputationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputationResult::Accept => write!(f, "Accepted"),
            ComputationResult::Reject => write!(f, "Rejected"),
        }
    }
}

/// Tracks whether any (state, symbol) pair was ever assigned twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Determinism {
    /// No transition has been added yet
    #[default]
    Unknown,
    /// Every transition so far landed on a free (state, symbol) pair
    Deterministic,
    /// At least one transition collided with an existing one
    NonDeterministic,
}

impl fmt::Display for Determinism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Determinism::Unknown => write!(f, "unknown"),
            Determinism::Deterministic => write!(f, "true"),
            Determinism::NonDeterministic => write!(f, "false"),
        }
    }
}

/// A finite automaton with single-valued transitions.
///
/// States are identified by the non-terminal names they were built from.
/// Each (state, symbol) pair maps to at most one target: the first write
/// wins, and any later write to the same pair is dropped and marks the
/// automaton as non-deterministic.
#[derive(Debug, Clone, Default)]
pub struct Automaton {
    states: HashSet<String>,
    alphabet: HashSet<char>,
    /// Per-state maps from symbol to target state
    transitions: HashMap<String, HashMap<char, String>>,
    initial_state: Option<String>,
    accept_states: HashSet<String>,
    determinism: Determinism,
}

impl Automaton {
    /// Create an empty automaton with no states
    pub fn new() -> Self {
        Automaton::default()
    }

    /// Register a state, optionally marking it initial and/or accepting.
    ///
    /// Registering an existing state never clears flags set earlier, and
    /// marking a second state initial replaces the previous initial state.
    pub fn add_state(&mut self, state: &str, is_initial: bool, is_accept: bool) {
        if !self.states.contains(state) {
            debug!("Registering state `{}`", state);
            self.states.insert(state.to_string());
        }
        if is_initial {
            self.initial_state = Some(state.to_string());
        }
        if is_accept {
            self.accept_states.insert(state.to_string());
        }
    }

    /// Add a symbol to the alphabet
    pub fn add_symbol(&mut self, symbol: char) {
        self.alphabet.insert(symbol);
    }

    /// Add `from --symbol--> to`, registering both endpoints as states.
    ///
    /// Returns `false` when the pair already had a target; the existing
    /// target is kept and the automaton becomes non-deterministic.
    pub fn add_transition(&mut self, from: &str, symbol: char, to: &str) -> bool {
        self.add_state(from, false, false);
        self.add_state(to, false, false);

        let targets = self.transitions.entry(from.to_string()).or_default();
        if targets.contains_key(&symbol) {
            self.determinism = Determinism::NonDeterministic;
            return false;
        }

        targets.insert(symbol, to.to_string());
        if self.determinism == Determinism::Unknown {
            self.determinism = Determinism::Deterministic;
        }
        true
    }

    /// Check whether the automaton accepts `input`.
    ///
    /// An automaton without an initial state rejects everything.
    pub fn accepts(&self, input: &str) -> bool {
        let mut frontier = self.initial_frontier();

        for symbol in input.chars() {
            frontier = self.step(&frontier, symbol);
            if frontier.is_empty() {
                trace!("Frontier died on `{}` while reading {:?}", symbol, input);
                return false;
            }
        }

        frontier.iter().any(|state| self.accept_states.contains(*state))
    }

    /// Same as [`Automaton::accepts`], as a [`ComputationResult`]
    pub fn run(&self, input: &str) -> ComputationResult {
        self.accepts(input).into()
    }

    /// Frontier after each consumed prefix of `input`.
    ///
    /// Index 0 holds the initial frontier; the trace stops early once the
    /// frontier becomes empty.
    pub fn trace(&self, input: &str) -> Vec<BTreeSet<String>> {
        let mut frontier = self.initial_frontier();
        let mut steps = vec![Self::owned(&frontier)];

        for symbol in input.chars() {
            if frontier.is_empty() {
                break;
            }
            frontier = self.step(&frontier, symbol);
            steps.push(Self::owned(&frontier));
        }

        steps
    }

    fn initial_frontier(&self) -> HashSet<&str> {
        self.initial_state.iter().map(String::as_str).collect()
    }

    fn step<'a>(&'a self, frontier: &HashSet<&'a str>, symbol: char) -> HashSet<&'a str> {
        frontier
            .iter()
            .filter_map(|state| self.transition(state, symbol))
            .collect()
    }

    fn owned(frontier: &HashSet<&str>) -> BTreeSet<String> {
        frontier.iter().map(|s| s.to_string()).collect()
    }

    /// Target of the transition from `state` on `symbol`, if any
    pub fn transition(&self, state: &str, symbol: char) -> Option<&str> {
        self.transitions
            .get(state)
            .and_then(|targets| targets.get(&symbol))
            .map(String::as_str)
    }

    /// Iterate over all transitions as `(source, symbol, target)`
    pub fn transitions(&self) -> impl Iterator<Item = (&str, char, &str)> {
        self.transitions.iter().flat_map(|(from, targets)| {
            targets
                .iter()
                .map(move |(symbol, to)| (from.as_str(), *symbol, to.as_str()))
        })
    }

    /// Transitions leaving `state`
    pub fn outgoing(&self, state: &str) -> Option<&HashMap<char, String>> {
        self.transitions.get(state)
    }

    /// Number of transitions kept after collisions
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(HashMap::len).sum()
    }

    /// All registered states
    pub fn states(&self) -> &HashSet<String> {
        &self.states
    }

    /// Terminals seen during construction
    pub fn alphabet(&self) -> &HashSet<char> {
        &self.alphabet
    }

    /// The initial state, if one was marked
    pub fn initial_state(&self) -> Option<&str> {
        self.initial_state.as_deref()
    }

    /// States that end an accepted word
    pub fn accept_states(&self) -> &HashSet<String> {
        &self.accept_states
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept_states.contains(state)
    }

    /// Collision status of the transition table
    pub fn determinism(&self) -> Determinism {
        self.determinism
    }

    /// `false` only once a transition collision has happened
    pub fn is_deterministic(&self) -> bool {
        self.determinism != Determinism::NonDeterministic
    }

    /// Human-readable summary of the automaton.
    ///
    /// Sets and transitions are printed sorted so that the output is stable,
    /// one transition per line as `source -- symbol --> target`.
    pub fn describe(&self) -> String {
        let states: BTreeSet<&str> = self.states.iter().map(String::as_str).collect();
        let alphabet: BTreeSet<char> = self.alphabet.iter().copied().collect();
        let accepting: BTreeSet<&str> = self.accept_states.iter().map(String::as_str).collect();
        let mut transitions: Vec<(&str, char, &str)> = self.transitions().collect();
        transitions.sort();

        let mut out = String::new();
        out.push_str(&format!("States: {{{}}}\n", join(states)));
        out.push_str(&format!("Alphabet: {{{}}}\n", join(alphabet)));
        out.push_str(&format!(
            "Initial state: {}\n",
            self.initial_state.as_deref().unwrap_or("(none)")
        ));
        out.push_str(&format!("Accept states: {{{}}}\n", join(accepting)));
        out.push_str(&format!("Deterministic: {}\n", self.determinism));
        out.push_str("Transitions:\n");
        for (from, symbol, to) in transitions {
            out.push_str(&format!("{} -- {} --> {}\n", from, symbol, to));
        }
        out
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab_automaton() -> Automaton {
        let mut fa = Automaton::new();
        fa.add_state("S", true, false);
        fa.add_transition("S", 'a', "A");
        fa.add_state("accept", false, true);
        fa.add_transition("A", 'b', "accept");
        fa
    }

    #[test]
    fn test_accepts() {
        let fa = ab_automaton();

        assert!(fa.accepts("ab"));
        assert!(!fa.accepts("a"));
        assert!(!fa.accepts("ba"));
        assert!(!fa.accepts(""));
        assert!(!fa.accepts("abb"));
        assert_eq!(fa.run("ab"), ComputationResult::Accept);
        assert_eq!(fa.run("x"), ComputationResult::Reject);
    }

    #[test]
    fn test_empty_automaton_rejects() {
        let fa = Automaton::new();
        assert!(!fa.accepts(""));
        assert!(!fa.accepts("a"));

        // States but no initial state
        let mut fa = Automaton::new();
        fa.add_state("S", false, true);
        assert!(!fa.accepts(""));
    }

    #[test]
    fn test_first_write_wins() {
        let mut fa = Automaton::new();
        assert_eq!(fa.determinism(), Determinism::Unknown);

        assert!(fa.add_transition("S", 'a', "A"));
        assert_eq!(fa.determinism(), Determinism::Deterministic);

        assert!(!fa.add_transition("S", 'a', "B"));
        assert_eq!(fa.determinism(), Determinism::NonDeterministic);
        assert_eq!(fa.transition("S", 'a'), Some("A"));
        assert_eq!(fa.transition_count(), 1);

        // The discarded target is still a registered state
        assert!(fa.states().contains("B"));

        // Later clean writes never restore the flag
        assert!(fa.add_transition("S", 'b', "B"));
        assert!(!fa.is_deterministic());
    }

    #[test]
    fn test_add_state_keeps_flags() {
        let mut fa = Automaton::new();
        fa.add_state("S", true, true);
        fa.add_state("S", false, false);

        assert_eq!(fa.initial_state(), Some("S"));
        assert!(fa.is_accepting("S"));
        assert_eq!(fa.states().len(), 1);
    }

    #[test]
    fn test_trace() {
        let fa = ab_automaton();
        let steps = fa.trace("abx");

        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], BTreeSet::from(["S".to_string()]));
        assert_eq!(steps[1], BTreeSet::from(["A".to_string()]));
        assert_eq!(steps[2], BTreeSet::from(["accept".to_string()]));
        assert!(steps[3].is_empty());

        // Stops after the frontier dies
        assert_eq!(fa.trace("bbb").len(), 2);
    }

    #[test]
    fn test_describe() {
        let fa = ab_automaton();
        let text = fa.describe();

        assert!(text.contains("States: {A, S, accept}"));
        assert!(text.contains("Initial state: S"));
        assert!(text.contains("Accept states: {accept}"));
        assert!(text.contains("Deterministic: true"));
        assert!(text.contains("S -- a --> A\n"));
        assert!(text.contains("A -- b --> accept\n"));
        assert_eq!(text.matches(" --> ").count(), fa.transition_count());
    }
}
