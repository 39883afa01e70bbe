//! Splits a formal usage expression into grammar tokens.

use std::sync::LazyLock;

use regex::Regex;

// SAFETY: These regexes are compile-time constants and are validated by tests.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\[\]()|]|\.\.\.)").expect("static regex must compile"));
static SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+|(\S*<.*?>)").expect("static regex must compile"));

/// Tokenizes a usage expression.
///
/// Brackets, `|` and `...` always stand alone. A word containing an
/// `<angle-bracket>` placeholder is kept whole even if the placeholder has
/// spaces in it.
///
/// ```
/// use usage_pattern_parser::pattern_tokens;
///
/// assert_eq!(
///     pattern_tokens("( [-v] <input file>... | --out=<a b> )"),
///     vec!["(", "[", "-v", "]", "<input file>", "...", "|", "--out=<a b>", ")"]
/// );
/// ```
pub fn pattern_tokens(source: &str) -> Vec<String> {
    let spaced = PUNCTUATION_RE.replace_all(source, " $1 ");
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in SPLIT_RE.captures_iter(&spaced) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        tokens.push(&spaced[last..whole.start()]);
        if let Some(placeholder) = caps.get(1) {
            tokens.push(placeholder.as_str());
        }
        last = whole.end();
    }
    tokens.push(&spaced[last..]);

    tokens
        .into_iter()
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}
