//! The registry of known options.
//!
//! Built from the option descriptions of a usage doc, then extended with
//! options that only appear inside usage patterns. Argv tokenizing works on
//! a private copy, since unknown argv options are registered ad hoc.

use std::collections::HashSet;

use crate::{FormatError, Leaf, OptionSpec};

/// Known option templates in declaration order.
///
/// Every entry is a [`Leaf`] of option kind carrying its default value.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::{Leaf, OptionRegistry, OptionSpec, Value};
///
/// let registry = OptionRegistry::from_options(vec![
///     Leaf::option_default(OptionSpec::new(Some("-v"), Some("--verbose"), 0)),
///     Leaf::option(OptionSpec::new(None, Some("--speed"), 1), Value::from("10")),
/// ])
/// .unwrap();
///
/// assert_eq!(registry.by_short("-v").len(), 1);
/// assert_eq!(registry.by_long_prefix("--sp").len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionRegistry {
    options: Vec<Leaf>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from option templates, rejecting spelling
    /// collisions.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::DuplicateOption`] when two templates share a
    /// short or long form.
    pub fn from_options(options: Vec<Leaf>) -> crate::Result<Self> {
        validate_options(&options)?;
        Ok(Self { options })
    }

    /// Registers an option discovered outside the option descriptions.
    pub fn register(&mut self, option: Leaf) {
        self.options.push(option);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Leaf> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn by_short(&self, short: &str) -> Vec<&Leaf> {
        self.filter(|spec| spec.short.as_deref() == Some(short))
    }

    pub fn by_long(&self, long: &str) -> Vec<&Leaf> {
        self.filter(|spec| spec.long.as_deref() == Some(long))
    }

    /// Options whose long form starts with `prefix` (unambiguous
    /// abbreviation support).
    pub fn by_long_prefix(&self, prefix: &str) -> Vec<&Leaf> {
        self.filter(|spec| spec.long.as_deref().is_some_and(|l| l.starts_with(prefix)))
    }

    fn filter(&self, pred: impl Fn(&OptionSpec) -> bool) -> Vec<&Leaf> {
        self.options
            .iter()
            .filter(|leaf| leaf.option_spec().is_some_and(&pred))
            .collect()
    }
}

/// Checks that no two option templates share a spelling.
pub fn validate_options(options: &[Leaf]) -> crate::Result<()> {
    let mut seen = HashSet::new();

    for spec in options.iter().filter_map(Leaf::option_spec) {
        if let Some(short) = &spec.short {
            if !seen.insert(short.as_str()) {
                return Err(FormatError::DuplicateOption(short.clone()));
            }
        }
        if let Some(long) = &spec.long {
            if !seen.insert(long.as_str()) {
                return Err(FormatError::DuplicateOption(long.clone()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(short: Option<&str>, long: Option<&str>) -> Leaf {
        Leaf::option_default(OptionSpec::new(short, long, 0))
    }

    #[test]
    fn test_rejects_duplicate_long() {
        let err = OptionRegistry::from_options(vec![
            flag(Some("-a"), Some("--all")),
            flag(Some("-b"), Some("--all")),
        ])
        .unwrap_err();
        assert_eq!(err, FormatError::DuplicateOption("--all".to_string()));
    }

    #[test]
    fn test_rejects_duplicate_short() {
        let err = OptionRegistry::from_options(vec![
            flag(Some("-a"), None),
            flag(Some("-a"), Some("--x")),
        ])
        .unwrap_err();
        assert_eq!(err, FormatError::DuplicateOption("-a".to_string()));
    }

    #[test]
    fn test_prefix_lookup() {
        let registry = OptionRegistry::from_options(vec![
            flag(None, Some("--verbose")),
            flag(None, Some("--version")),
            flag(None, Some("--quiet")),
        ])
        .unwrap();
        assert_eq!(registry.by_long_prefix("--ver").len(), 2);
        assert_eq!(registry.by_long_prefix("--q").len(), 1);
        assert!(registry.by_long("--ver").is_empty());
    }

    #[test]
    fn test_register_skips_validation() {
        let mut registry = OptionRegistry::new();
        registry.register(flag(Some("-x"), None));
        registry.register(flag(Some("-x"), None));
        assert_eq!(registry.by_short("-x").len(), 2);
    }
}
