use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::automaton::Automaton;
use crate::utils::{GrammarError, Result};

/// Separator between the left-hand side and the alternatives of a rule
pub const ARROW: &str = "->";

/// Separator between alternatives
pub const ALTERNATIVE: char = '|';

/// One alternative on the right-hand side of a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alternative {
    /// The empty string; makes the left-hand state accepting
    Epsilon,
    /// A lone terminal, which leads into the shared sink state
    Terminal(char),
    /// A terminal followed by the non-terminal it moves to
    Step(char, String),
}

/// A parsed production rule `LHS -> alt | alt | ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The left-hand non-terminal
    pub lhs: String,
    /// Alternatives in source order
    pub alternatives: Vec<Alternative>,
}

impl Rule {
    /// Parse one rule line.
    ///
    /// `line` is the 1-based position reported in syntax errors.
    pub fn parse(line: usize, text: &str, config: &GrammarConfig) -> Result<Self> {
        let Some((lhs, rhs)) = text.split_once(ARROW) else {
            return Err(GrammarError::syntax(line, text, "missing `->` separator"));
        };
        if rhs.contains(ARROW) {
            return Err(GrammarError::syntax(line, text, "more than one `->` separator"));
        }

        let lhs = lhs.trim();
        if lhs.is_empty() {
            return Err(GrammarError::syntax(line, text, "empty left-hand side"));
        }

        let mut alternatives = Vec::new();
        for alternative in rhs.split(ALTERNATIVE) {
            let alternative = alternative.trim();
            if alternative.is_empty() {
                return Err(GrammarError::syntax(line, text, "empty alternative"));
            }

            if alternative == config.epsilon_marker {
                alternatives.push(Alternative::Epsilon);
                continue;
            }

            let mut chars = alternative.chars();
            let Some(terminal) = chars.next() else {
                return Err(GrammarError::syntax(line, text, "empty alternative"));
            };
            let rest = chars.as_str();

            if rest.is_empty() {
                alternatives.push(Alternative::Terminal(terminal));
            } else {
                alternatives.push(Alternative::Step(terminal, rest.to_string()));
            }
        }

        Ok(Rule {
            lhs: lhs.to_string(),
            alternatives,
        })
    }
}

/// Configuration options for grammar compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Alternative text that stands for the empty string
    pub epsilon_marker: String,
    /// Name of the accepting state shared by every lone-terminal alternative
    pub sink_state: String,
    /// Longest word the generator will produce before giving up on a walk
    pub max_word_length: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        GrammarConfig {
            epsilon_marker: "ε".to_string(),
            sink_state: "accept".to_string(),
            max_word_length: 32,
        }
    }
}

impl GrammarConfig {
    /// Load a configuration from a JSON file; missing fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from JSON text and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GrammarConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that could never match a trimmed alternative or name a state
    pub fn validate(&self) -> Result<()> {
        if self.epsilon_marker.is_empty() || self.epsilon_marker.trim() != self.epsilon_marker {
            return Err(GrammarError::InvalidConfig(format!(
                "epsilon marker {:?} must be non-empty without surrounding whitespace",
                self.epsilon_marker
            )));
        }
        if self.epsilon_marker.contains(ALTERNATIVE) || self.epsilon_marker.contains(ARROW) {
            return Err(GrammarError::InvalidConfig(format!(
                "epsilon marker {:?} must not contain `|` or `->`",
                self.epsilon_marker
            )));
        }
        if self.sink_state.trim().is_empty() {
            return Err(GrammarError::InvalidConfig(
                "sink state name must not be empty".to_string(),
            ));
        }
        if self.max_word_length == 0 {
            return Err(GrammarError::InvalidConfig(
                "max_word_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A right-regular grammar: parsed rules plus a start symbol
#[derive(Debug, Clone)]
pub struct Grammar {
    /// Rules in source order
    rules: Vec<Rule>,
    /// The non-terminal whose state becomes initial
    start_symbol: String,
    config: GrammarConfig,
}

impl Grammar {
    /// Create a new empty grammar with a specified start symbol
    pub fn new(start_symbol: &str) -> Self {
        Grammar {
            rules: Vec::new(),
            start_symbol: start_symbol.to_string(),
            config: GrammarConfig::default(),
        }
    }

    /// Create a new grammar with custom configuration, rejecting invalid settings
    pub fn with_config(start_symbol: &str, config: GrammarConfig) -> Result<Self> {
        config.validate()?;
        Ok(Grammar {
            config,
            ..Grammar::new(start_symbol)
        })
    }

    /// Parse and append a rule line
    pub fn add_rule(&mut self, text: &str) -> Result<&mut Self> {
        let line = self.rules.len() + 1;
        let rule = Rule::parse(line, text, &self.config)?;
        self.rules.push(rule);
        Ok(self)
    }

    /// Build a grammar from rule lines; every line must be a rule.
    ///
    /// Fails on the first malformed line without keeping any of the others.
    pub fn from_lines<S: AsRef<str>>(
        lines: &[S],
        start_symbol: &str,
        config: GrammarConfig,
    ) -> Result<Self> {
        let mut grammar = Grammar::with_config(start_symbol, config)?;
        for (index, text) in lines.iter().enumerate() {
            let rule = Rule::parse(index + 1, text.as_ref(), &grammar.config)?;
            grammar.rules.push(rule);
        }
        Ok(grammar)
    }

    /// Parse newline-separated grammar text, skipping blank lines.
    ///
    /// Errors report the line number within `text`.
    pub fn parse(text: &str, start_symbol: &str, config: GrammarConfig) -> Result<Self> {
        let mut grammar = Grammar::with_config(start_symbol, config)?;
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let rule = Rule::parse(index + 1, line, &grammar.config)?;
            grammar.rules.push(rule);
        }
        Ok(grammar)
    }

    /// Parse a grammar from a file
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        start_symbol: &str,
        config: GrammarConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading grammar from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::parse(&text, start_symbol, config)
    }

    /// Translate the rules into an automaton.
    ///
    /// This is a direct construction: no epsilon closure and no state
    /// merging. Every lone-terminal alternative, whatever its left-hand
    /// side, leads into the same sink state.
    pub fn compile(&self) -> Automaton {
        let sink = self.config.sink_state.as_str();
        let mut fa = Automaton::new();

        for rule in &self.rules {
            let lhs = rule.lhs.as_str();
            if lhs == sink {
                warn!("Non-terminal `{}` shares its name with the sink state", lhs);
            }
            fa.add_state(lhs, lhs == self.start_symbol, false);

            for alternative in &rule.alternatives {
                match alternative {
                    Alternative::Epsilon => fa.add_state(lhs, false, true),
                    Alternative::Terminal(terminal) => {
                        fa.add_state(sink, false, true);
                        fa.add_symbol(*terminal);
                        if !fa.add_transition(lhs, *terminal, sink) {
                            warn_collision(lhs, *terminal, sink);
                        }
                    }
                    Alternative::Step(terminal, target) => {
                        if target == sink {
                            warn!(
                                "Non-terminal `{}` shares its name with the sink state",
                                target
                            );
                        }
                        fa.add_symbol(*terminal);
                        if !fa.add_transition(lhs, *terminal, target) {
                            warn_collision(lhs, *terminal, target);
                        }
                    }
                }
            }
        }

        debug!(
            "Compiled {} rules into {} states and {} transitions",
            self.rules.len(),
            fa.states().len(),
            fa.transition_count()
        );
        fa
    }

    /// Get a reference to the grammar's rules
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Get the start symbol
    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    /// Check if any rule has `name` on its left-hand side
    pub fn has_non_terminal(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.lhs == name)
    }

    /// Get a reference to the grammar's configuration
    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }
}

fn warn_collision(from: &str, symbol: char, dropped: &str) {
    warn!(
        "Transition {} -- {} --> {} dropped: pair already has a target",
        from, symbol, dropped
    );
}

/// Compile rule lines into an automaton with the default configuration
pub fn compile<S: AsRef<str>>(rule_lines: &[S], start_symbol: &str) -> Result<Automaton> {
    compile_with_config(rule_lines, start_symbol, GrammarConfig::default())
}

/// Compile rule lines into an automaton.
///
/// Compilation is all-or-nothing: a malformed line fails the whole call.
pub fn compile_with_config<S: AsRef<str>>(
    rule_lines: &[S],
    start_symbol: &str,
    config: GrammarConfig,
) -> Result<Automaton> {
    Ok(Grammar::from_lines(rule_lines, start_symbol, config)?.compile())
}

/// Builder for constructing Grammar instances
pub struct GrammarBuilder {
    start_symbol: String,
    config: GrammarConfig,
    lines: Vec<String>,
}

impl GrammarBuilder {
    /// Create a new grammar builder with default config
    pub fn new(start_symbol: &str) -> Self {
        GrammarBuilder {
            start_symbol: start_symbol.to_string(),
            config: GrammarConfig::default(),
            lines: Vec::new(),
        }
    }

    /// Set the configuration
    pub fn config(mut self, config: GrammarConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a rule line to the grammar
    pub fn rule(mut self, text: &str) -> Self {
        self.lines.push(text.to_string());
        self
    }

    /// Add a rule from a left-hand side and its alternatives
    pub fn alternatives(mut self, lhs: &str, alternatives: &[&str]) -> Self {
        let joined = alternatives.join(" | ");
        self.lines.push(format!("{} {} {}", lhs, ARROW, joined));
        self
    }

    /// Build the grammar, parsing every collected line
    pub fn build(self) -> Result<Grammar> {
        Grammar::from_lines(&self.lines, &self.start_symbol, self.config)
    }
}
