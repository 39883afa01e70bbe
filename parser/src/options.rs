//! Option descriptions: the `-x, --xxx=ARG  description [default: V]` lines
//! of every `options:` section.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use usage_pattern_core::{Leaf, OptionRegistry, OptionSpec, Value};

use crate::section::{Section, parse_section};

// SAFETY: These regexes are compile-time constants and are validated by tests.
static OPTION_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(-\S+?)").expect("static regex must compile"));
static DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[default: (.*)\]").expect("static regex must compile"));

/// Parses one option description into an option template.
///
/// The spelling part ends at the first double space. `,` and `=` separate
/// words; any word not starting with `-` marks the option as taking an
/// argument, whose default is read from a `[default: V]` annotation.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::{OptionSpec, Value};
/// use usage_pattern_parser::parse_option_description;
///
/// let leaf = parse_option_description("-o FILE --output=FILE  Write here [default: out.txt]");
/// assert_eq!(leaf.option_spec(), Some(&OptionSpec::new(Some("-o"), Some("--output"), 1)));
/// assert_eq!(leaf.value, Value::from("out.txt"));
/// ```
pub fn parse_option_description(description: &str) -> Leaf {
    let trimmed = description.trim();
    let (spelling, text) = trimmed.split_once("  ").unwrap_or((trimmed, ""));
    let spelling = spelling.replace([',', '='], " ");

    let mut short = None;
    let mut long = None;
    let mut argcount = 0;
    for word in spelling.split_whitespace() {
        if word.starts_with("--") {
            long = Some(word);
        } else if word.starts_with('-') {
            short = Some(word);
        } else {
            argcount = 1;
        }
    }

    let spec = OptionSpec::new(short, long, argcount);
    if !spec.takes_argument() {
        return Leaf::option(spec, Value::Bool(false));
    }
    let value = DEFAULT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(Value::Null, |m| Value::from(m.as_str()));
    Leaf::option(spec, value)
}

/// Collects the option templates described in every `options:` section of
/// `doc`, in order.
///
/// # Errors
///
/// Returns [`FormatError::DuplicateOption`] when two descriptions share a
/// spelling.
///
/// [`FormatError::DuplicateOption`]: usage_pattern_core::FormatError::DuplicateOption
pub fn parse_defaults(doc: &str) -> usage_pattern_core::Result<OptionRegistry> {
    let mut options = Vec::new();

    for section in parse_section(Section::Options, doc) {
        let body = section.split_once(':').map_or("", |(_, body)| body);
        let text = format!("\n{body}");
        let starts: Vec<(usize, usize)> = OPTION_START_RE
            .captures_iter(&text)
            .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.start())))
            .collect();

        for (i, &(_, start)) in starts.iter().enumerate() {
            let end = starts.get(i + 1).map_or(text.len(), |&(next, _)| next);
            options.push(parse_option_description(&text[start..end]));
        }
    }

    debug!(count = options.len(), "Parsed option descriptions");
    OptionRegistry::from_options(options)
}
