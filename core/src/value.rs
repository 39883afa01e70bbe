//! Bound values carried by leaf patterns and reported in a [`Response`].
//!
//! A leaf starts with a parse-time default (`false`, `null`, a declared
//! `[default: ...]` string) and, when its identity repeats inside one
//! alternative, an accumulator shape (a counter or a list).
//!
//! [`Response`]: crate::Response

use std::fmt;

use serde::Serialize;

/// The value bound to a pattern name.
///
/// Serialized untagged, so JSON output reads naturally:
/// `null`, `true`, `3`, `"file.txt"`, `["a", "b"]`.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::Value;
///
/// let flag = Value::Bool(true);
/// assert!(flag.is_truthy());
///
/// let files = Value::List(vec!["a.txt".into(), "b.txt".into()]);
/// assert_eq!(files.as_list().map(<[String]>::len), Some(2));
/// assert!(files.is_accumulator());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Nothing bound (an unmatched positional or valued option).
    #[default]
    Null,
    /// Presence of a flag or command.
    Bool(bool),
    /// Number of occurrences of a repeated flag or command.
    Count(u64),
    /// A single positional or option argument.
    Str(String),
    /// Every argument given to a repeated positional or valued option.
    List(Vec<String>),
}

impl Value {
    /// Returns `true` for counter and list shapes.
    pub fn is_accumulator(&self) -> bool {
        matches!(self, Value::Count(_) | Value::List(_))
    }

    /// Truthiness as used by the help/version short-circuit.
    ///
    /// ```
    /// use usage_pattern_core::Value;
    ///
    /// assert!(!Value::Null.is_truthy());
    /// assert!(!Value::Count(0).is_truthy());
    /// assert!(Value::Str("x".into()).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Count(n) => *n > 0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            Value::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts a scalar default into the accumulator shape used when a
    /// valued leaf repeats: `null` becomes `[]`, a string default is split
    /// on whitespace.
    pub(crate) fn into_list_shape(self) -> Value {
        match self {
            Value::Null => Value::List(Vec::new()),
            Value::Str(s) => Value::List(s.split_whitespace().map(String::from).collect()),
            other => other,
        }
    }

    /// Merges `increment` into an accumulator. Returns `false` when the two
    /// shapes are incompatible and nothing was merged.
    pub(crate) fn accumulate(&mut self, increment: Value) -> bool {
        match (self, increment) {
            (Value::Count(total), Value::Count(n)) => {
                *total += n;
                true
            }
            (Value::List(items), Value::List(more)) => {
                items.extend(more);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Count(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => write!(f, "{items:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Count(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(value)
    }
}
