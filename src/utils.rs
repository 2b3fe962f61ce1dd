use std::io;
use thiserror::Error;

/// Custom error types for grammar compilation and loading
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Syntax error in rule {line} `{rule}`: {reason}")]
    Syntax {
        /// 1-based position of the rule in the input sequence
        line: usize,
        /// The offending rule text, verbatim
        rule: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GrammarError {
    pub(crate) fn syntax(line: usize, rule: &str, reason: impl Into<String>) -> Self {
        GrammarError::Syntax {
            line,
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the rule text that caused a syntax error, if any
    pub fn rule(&self) -> Option<&str> {
        match self {
            GrammarError::Syntax { rule, .. } => Some(rule),
            _ => None,
        }
    }
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;
