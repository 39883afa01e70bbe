//! Section extraction from a usage doc.
//!
//! A section starts at any line containing its marker (`usage:` or
//! `options:`, case-insensitive) and runs over every following line that
//! starts with a space or tab.

use std::sync::LazyLock;

use regex::Regex;

/// A named section of a usage doc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Usage,
    Options,
}

// SAFETY: These regexes are compile-time constants and are validated by tests.
static USAGE_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^([^\n]*usage:[^\n]*\n?(?:[ \t].*?(?:\n|$))*)")
        .expect("static regex must compile")
});
static OPTIONS_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^([^\n]*options:[^\n]*\n?(?:[ \t].*?(?:\n|$))*)")
        .expect("static regex must compile")
});

impl Section {
    fn regex(self) -> &'static Regex {
        match self {
            Section::Usage => &USAGE_SECTION_RE,
            Section::Options => &OPTIONS_SECTION_RE,
        }
    }
}

/// Returns every occurrence of `section` in `doc`, trimmed.
///
/// # Examples
///
/// ```
/// use usage_pattern_parser::{Section, parse_section};
///
/// let doc = "Usage:\n  prog ship\n  prog mine\n\nOptions:\n  -h  Help.\n";
/// assert_eq!(
///     parse_section(Section::Usage, doc),
///     vec!["Usage:\n  prog ship\n  prog mine".to_string()]
/// );
/// assert_eq!(parse_section(Section::Options, doc).len(), 1);
/// ```
pub fn parse_section(section: Section, doc: &str) -> Vec<String> {
    section
        .regex()
        .captures_iter(doc)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}
