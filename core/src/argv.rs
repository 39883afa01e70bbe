//! Runtime argv tokenizing.
//!
//! Turns `["-vo", "out", "add", "--", "-x"]` into a flat list of option
//! and positional tokens. Whether a positional is a command literal or an
//! argument is left to the matcher.

use std::fmt;

use tracing::trace;

use crate::resolve::{parse_long, parse_shorts};
use crate::{Leaf, OptionError, OptionRegistry, TokenContext, TokenStream};

/// One tokenized argv element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgvToken {
    /// A positional word (argument or command literal, decided at match time).
    Positional(String),
    /// An option with its bound value.
    Option(Leaf),
}

impl ArgvToken {
    pub fn positional(&self) -> Option<&str> {
        match self {
            ArgvToken::Positional(word) => Some(word),
            ArgvToken::Option(_) => None,
        }
    }

    pub fn option(&self) -> Option<&Leaf> {
        match self {
            ArgvToken::Option(leaf) => Some(leaf),
            ArgvToken::Positional(_) => None,
        }
    }

    /// `true` when this is an option reported as `name` with a truthy value.
    pub fn is_set_option(&self, name: &str) -> bool {
        self.option()
            .is_some_and(|leaf| leaf.name() == name && leaf.value.is_truthy())
    }
}

impl fmt::Display for ArgvToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgvToken::Positional(word) => write!(f, "Argument(None, {word:?})"),
            ArgvToken::Option(leaf) => write!(f, "{leaf}"),
        }
    }
}

/// Splits an argv into [`ArgvToken`]s using the known options.
///
/// Unknown options are registered into the (borrowed) registry so they
/// can be reported; they will never match the usage pattern.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::{ArgvToken, ArgvTokenizer, Leaf, OptionRegistry, OptionSpec};
///
/// let mut registry = OptionRegistry::from_options(vec![Leaf::option_default(
///     OptionSpec::new(Some("-o"), Some("--output"), 1),
/// )])
/// .unwrap();
///
/// let tokens = ArgvTokenizer::new(&mut registry)
///     .tokenize(["-oout.txt", "input.txt"])
///     .unwrap();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[1], ArgvToken::Positional("input.txt".into()));
/// ```
pub struct ArgvTokenizer<'r> {
    registry: &'r mut OptionRegistry,
    options_first: bool,
}

impl<'r> ArgvTokenizer<'r> {
    pub fn new(registry: &'r mut OptionRegistry) -> Self {
        Self {
            registry,
            options_first: false,
        }
    }

    /// Stops option parsing at the first positional word.
    pub fn options_first(mut self, enabled: bool) -> Self {
        self.options_first = enabled;
        self
    }

    /// Tokenizes `argv` (program name excluded).
    ///
    /// A bare `--` ends option parsing; the marker itself is kept as a
    /// positional so that a `[--]` in the usage pattern can consume it.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionError`] for ambiguous abbreviations and options
    /// with a missing or unexpected argument.
    pub fn tokenize<I, S>(self, argv: I) -> Result<Vec<ArgvToken>, OptionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = TokenStream::new(argv, TokenContext::Argv);
        let mut parsed = Vec::new();

        while let Some(current) = tokens.current() {
            if current == "--" {
                trace!("end-of-options marker");
                parsed.extend(tokens.drain().into_iter().map(ArgvToken::Positional));
                break;
            } else if current.starts_with("--") {
                let leaf = parse_long(&mut tokens, self.registry)?;
                parsed.push(ArgvToken::Option(leaf));
            } else if current.starts_with('-') && current != "-" {
                let leaves = parse_shorts(&mut tokens, self.registry)?;
                parsed.extend(leaves.into_iter().map(ArgvToken::Option));
            } else if self.options_first {
                parsed.extend(tokens.drain().into_iter().map(ArgvToken::Positional));
                break;
            } else if let Some(word) = tokens.advance() {
                parsed.push(ArgvToken::Positional(word));
            }
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OptionSpec, Value};

    fn registry() -> OptionRegistry {
        OptionRegistry::from_options(vec![
            Leaf::option_default(OptionSpec::new(Some("-h"), None, 0)),
            Leaf::option_default(OptionSpec::new(Some("-v"), Some("--verbose"), 0)),
            Leaf::option_default(OptionSpec::new(Some("-f"), Some("--file"), 1)),
        ])
        .unwrap()
    }

    fn positional(word: &str) -> ArgvToken {
        ArgvToken::Positional(word.to_string())
    }

    fn option(short: Option<&str>, long: Option<&str>, argcount: u8, value: Value) -> ArgvToken {
        ArgvToken::Option(Leaf::option(OptionSpec::new(short, long, argcount), value))
    }

    #[test]
    fn test_mixed_argv() {
        let mut reg = registry();
        let tokens = ArgvTokenizer::new(&mut reg)
            .tokenize(["-h", "arg", "--file", "f.txt", "-v"])
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                option(Some("-h"), None, 0, Value::Bool(true)),
                positional("arg"),
                option(Some("-f"), Some("--file"), 1, Value::from("f.txt")),
                option(Some("-v"), Some("--verbose"), 0, Value::Bool(true)),
            ]
        );
    }

    #[test]
    fn test_double_dash_ends_options() {
        let mut reg = registry();
        let tokens = ArgvTokenizer::new(&mut reg)
            .tokenize(["-v", "--", "-h", "--file"])
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                option(Some("-v"), Some("--verbose"), 0, Value::Bool(true)),
                positional("--"),
                positional("-h"),
                positional("--file"),
            ]
        );
    }

    #[test]
    fn test_options_first() {
        let mut reg = registry();
        let tokens = ArgvTokenizer::new(&mut reg)
            .options_first(true)
            .tokenize(["-v", "run", "-h"])
            .unwrap();
        assert_eq!(tokens[1], positional("run"));
        assert_eq!(tokens[2], positional("-h"));
    }

    #[test]
    fn test_single_dash_is_positional() {
        let mut reg = registry();
        let tokens = ArgvTokenizer::new(&mut reg).tokenize(["-"]).unwrap();
        assert_eq!(tokens, vec![positional("-")]);
    }

    #[test]
    fn test_is_set_option() {
        let token = option(Some("-v"), Some("--verbose"), 0, Value::Bool(true));
        assert!(token.is_set_option("--verbose"));
        assert!(!token.is_set_option("-v"));
        assert!(!positional("--verbose").is_set_option("--verbose"));
    }
}
