//! Leaf pattern kinds: positional arguments, command literals and options.
//!
//! Two leaves share an *identity* when their kind, name and value are all
//! equal; that is exactly the derived `Eq`/`Hash` on [`Leaf`].

use std::fmt;

use serde::Serialize;

use crate::Value;

/// Spelling and arity of an option.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::OptionSpec;
///
/// let spec = OptionSpec::new(Some("-v"), Some("--verbose"), 0);
/// assert_eq!(spec.name(), "--verbose");
/// assert!(spec.matches("-v"));
///
/// let short_only = OptionSpec::new(Some("-q"), None, 0);
/// assert_eq!(short_only.name(), "-q");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OptionSpec {
    /// Short form (e.g., "-o")
    pub short: Option<String>,
    /// Long form (e.g., "--output")
    pub long: Option<String>,
    /// Number of arguments the option takes: 0 or 1.
    pub argcount: u8,
}

impl OptionSpec {
    pub fn new(short: Option<&str>, long: Option<&str>, argcount: u8) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            argcount: argcount.min(1),
        }
    }

    /// Returns the canonical name (long form preferred, falls back to short).
    pub fn name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or_default()
    }

    /// Checks if this option is spelled `s` (short or long form).
    pub fn matches(&self, s: &str) -> bool {
        self.short.as_deref() == Some(s) || self.long.as_deref() == Some(s)
    }

    pub fn takes_argument(&self) -> bool {
        self.argcount > 0
    }
}

/// What a leaf binds to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum LeafKind {
    /// Positional parameter, `<name>` or `NAME`.
    Argument(String),
    /// Fixed literal word such as `add`, or the `--` separator.
    Command(String),
    /// Short and/or long option.
    Option(OptionSpec),
}

/// A leaf pattern together with its default (or accumulator) value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Leaf {
    pub kind: LeafKind,
    pub value: Value,
}

impl Leaf {
    /// A positional argument with no bound value.
    pub fn argument(name: &str) -> Self {
        Self {
            kind: LeafKind::Argument(name.to_string()),
            value: Value::Null,
        }
    }

    /// A command literal, not yet seen.
    pub fn command(name: &str) -> Self {
        Self {
            kind: LeafKind::Command(name.to_string()),
            value: Value::Bool(false),
        }
    }

    /// An option with an explicit value.
    pub fn option(spec: OptionSpec, value: Value) -> Self {
        Self {
            kind: LeafKind::Option(spec),
            value,
        }
    }

    /// An option carrying its natural default: `false` for flags and
    /// `null` for options taking an argument.
    ///
    /// ```
    /// use usage_pattern_core::{Leaf, OptionSpec, Value};
    ///
    /// let flag = Leaf::option_default(OptionSpec::new(Some("-v"), None, 0));
    /// assert_eq!(flag.value, Value::Bool(false));
    ///
    /// let valued = Leaf::option_default(OptionSpec::new(None, Some("--out"), 1));
    /// assert_eq!(valued.value, Value::Null);
    /// ```
    pub fn option_default(spec: OptionSpec) -> Self {
        let value = if spec.takes_argument() {
            Value::Null
        } else {
            Value::Bool(false)
        };
        Self::option(spec, value)
    }

    /// The name under which this leaf's value is reported.
    pub fn name(&self) -> &str {
        match &self.kind {
            LeafKind::Argument(name) | LeafKind::Command(name) => name,
            LeafKind::Option(spec) => spec.name(),
        }
    }

    pub fn option_spec(&self) -> Option<&OptionSpec> {
        match &self.kind {
            LeafKind::Option(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn is_option(&self) -> bool {
        matches!(self.kind, LeafKind::Option(_))
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LeafKind::Argument(name) => write!(f, "Argument({name}, {})", self.value),
            LeafKind::Command(name) => write!(f, "Command({name}, {})", self.value),
            LeafKind::Option(spec) => write!(
                f,
                "Option({}, {}, {}, {})",
                spec.short.as_deref().unwrap_or("-"),
                spec.long.as_deref().unwrap_or("-"),
                spec.argcount,
                self.value
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_includes_value() {
        let a = Leaf::argument("<file>");
        let mut b = Leaf::argument("<file>");
        assert_eq!(a, b);
        b.value = Value::List(Vec::new());
        assert_ne!(a, b);
    }

    #[test]
    fn test_kind_distinguishes_same_name() {
        assert_ne!(Leaf::argument("add"), Leaf::command("add"));
    }

    #[test]
    fn test_argcount_is_clamped() {
        assert_eq!(OptionSpec::new(None, Some("--x"), 3).argcount, 1);
    }

    #[test]
    fn test_display() {
        let leaf = Leaf::option_default(OptionSpec::new(Some("-v"), Some("--verbose"), 0));
        assert_eq!(leaf.to_string(), "Option(-v, --verbose, 0, false)");
        assert_eq!(Leaf::argument("<x>").to_string(), "Argument(<x>, null)");
    }
}
