//! Formal usage: the `Usage:` section rewritten as one grammar expression.

use std::fmt;

/// The alternatives of a usage section, program name stripped.
///
/// Every word equal to the program name (the first word after `usage:`)
/// starts a new alternative. The expression form joins them with `|`:
///
/// ```
/// use usage_pattern_parser::FormalUsage;
///
/// let usage = FormalUsage::from_section("Usage: prog ship new <name>\n       prog mine [-q]");
/// assert_eq!(usage.program(), Some("prog"));
/// assert_eq!(usage.alternatives().len(), 2);
/// assert_eq!(usage.to_string(), "( ship new <name> ) | ( mine [-q] )");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalUsage {
    program: Option<String>,
    alternatives: Vec<Vec<String>>,
}

impl FormalUsage {
    pub fn from_section(section: &str) -> Self {
        let body = section.split_once(':').map_or("", |(_, body)| body);
        let mut words = body.split_whitespace();
        let program = words.next().map(String::from);

        let mut alternatives = vec![Vec::new()];
        for word in words {
            if Some(word) == program.as_deref() {
                alternatives.push(Vec::new());
            } else if let Some(current) = alternatives.last_mut() {
                current.push(word.to_string());
            }
        }

        Self {
            program,
            alternatives,
        }
    }

    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    pub fn alternatives(&self) -> &[Vec<String>] {
        &self.alternatives
    }
}

impl fmt::Display for FormalUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self
            .alternatives
            .iter()
            .map(|words| words.join(" "))
            .collect::<Vec<_>>()
            .join(" ) | ( ");
        write!(f, "( {body} )")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_alternative() {
        let usage = FormalUsage::from_section("usage: prog [-hv] ARG");
        assert_eq!(usage.to_string(), "( [-hv] ARG )");
    }

    #[test]
    fn test_three_alternatives() {
        let usage = FormalUsage::from_section(
            "Usage: prog [-hv] ARG\n           prog N M\n           prog is a program.",
        );
        assert_eq!(
            usage.to_string(),
            "( [-hv] ARG ) | ( N M ) | ( is a program. )"
        );
    }

    #[test]
    fn test_program_only() {
        let usage = FormalUsage::from_section("usage: prog");
        assert_eq!(usage.to_string(), "(  )");
        assert_eq!(usage.alternatives(), &[Vec::<String>::new()]);
    }

    #[test]
    fn test_empty_section() {
        let usage = FormalUsage::from_section("usage:");
        assert_eq!(usage.program(), None);
        assert_eq!(usage.to_string(), "(  )");
    }
}
