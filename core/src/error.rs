//! Error types for usage-doc compilation and argv matching.
//!
//! Two kinds of failure never mix:
//!
//! - [`FormatError`]: the usage doc itself is malformed. This is the doc
//!   author's mistake and is raised once, at compile time.
//! - [`SyntaxError`]: the argv handed in at runtime does not fit the usage.
//!   This is the end user's mistake and is displayed with the usage text.
//!
//! [`OptionError`] is shared by both sides: the same option-token resolver
//! runs over usage patterns and over argv.

use thiserror::Error;

/// Failure to resolve an option token against the option registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// An abbreviated long option matches several registered options.
    #[error("{prefix} is not a unique prefix: {candidates}?")]
    NotUniquePrefix {
        prefix: String,
        candidates: String,
    },
    /// A short option is registered more than once.
    #[error("{short} is specified ambiguously {count} times")]
    AmbiguousShort {
        short: String,
        count: usize,
    },
    /// `--flag=value` given for a flag that takes no argument.
    #[error("{0} must not have an argument")]
    UnexpectedArgument(String),
    /// An option that takes an argument is the last token (or before `--`).
    #[error("{0} requires argument")]
    MissingArgument(String),
}

/// The usage doc is not valid usage-pattern grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("\"usage:\" (case-insensitive) not found")]
    MissingUsage,
    #[error("more than one \"usage:\" (case-insensitive)")]
    MultipleUsage,
    /// `(` or `[` without its closing bracket.
    #[error("unmatched '{0}'")]
    UnmatchedBracket(char),
    /// Tokens left over after the top-level expression.
    #[error("unexpected ending: {0:?}")]
    UnexpectedEnding(String),
    /// Two option descriptions share a short or long spelling.
    #[error("duplicate option spelling: {0}")]
    DuplicateOption(String),
    #[error("invalid option in usage pattern: {0}")]
    Option(#[from] OptionError),
}

/// Convenience alias for results with [`FormatError`].
pub type Result<T> = std::result::Result<T, FormatError>;

/// The argv did not match the usage; rendered as an optional message
/// followed by the usage section.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::SyntaxError;
///
/// let err = SyntaxError::new("Usage: prog <x>");
/// assert_eq!(err.to_string(), "Usage: prog <x>");
///
/// let err = SyntaxError::with_message("--out requires argument", "Usage: prog --out=<f>");
/// assert_eq!(err.to_string(), "--out requires argument\nUsage: prog --out=<f>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.render())]
pub struct SyntaxError {
    message: Option<String>,
    usage: String,
}

impl SyntaxError {
    pub fn new(usage: &str) -> Self {
        Self {
            message: None,
            usage: usage.to_string(),
        }
    }

    pub fn with_message(message: impl Into<String>, usage: &str) -> Self {
        Self {
            message: Some(message.into()),
            usage: usage.to_string(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    fn render(&self) -> String {
        let text = match &self.message {
            Some(message) => format!("{message}\n{}", self.usage),
            None => self.usage.clone(),
        };
        text.trim().to_string()
    }
}
