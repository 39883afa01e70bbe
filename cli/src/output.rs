//! Output formatting for responses and compiled docs.

use serde::Serialize;
use usage_pattern_core::{Leaf, Response, ResponseKind};
use usage_pattern_parser::UsageDoc;

/// Supported output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// What `inspect` reports about a compiled doc.
#[derive(Debug, Serialize)]
pub struct DocSummary<'a> {
    pub usage: &'a str,
    pub options: Vec<&'a Leaf>,
    pub pattern: String,
    pub identities: Vec<&'a Leaf>,
}

impl<'a> DocSummary<'a> {
    pub fn new(doc: &'a UsageDoc) -> Self {
        let pattern = doc.pattern();
        Self {
            usage: doc.usage(),
            options: doc.options().iter().collect(),
            pattern: pattern.to_string(),
            identities: pattern
                .identities()
                .into_iter()
                .map(|id| pattern.leaf(id))
                .collect(),
        }
    }
}

/// Formats a response in the requested output format.
pub fn format_response(response: &Response, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(response)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(response).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(response_to_table(response)),
    }
}

/// Formats a compiled doc summary in the requested output format.
pub fn format_summary(summary: &DocSummary<'_>, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(summary)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(summary).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Table => Ok(summary_to_table(summary)),
    }
}

fn response_to_table(response: &Response) -> String {
    if response.kind() != ResponseKind::Matched {
        return format!("{}\n", response.output());
    }

    let width = response.args().keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (name, value) in response.args() {
        out.push_str(&format!("{name:<width$}  {value}\n"));
    }
    out
}

fn summary_to_table(summary: &DocSummary<'_>) -> String {
    let mut out = String::new();

    out.push_str(summary.usage);
    out.push_str("\n\n");

    if !summary.options.is_empty() {
        out.push_str("OPTION            ARGS  DEFAULT\n");
        for leaf in &summary.options {
            let Some(spec) = leaf.option_spec() else {
                continue;
            };
            let spelling = match (&spec.short, &spec.long) {
                (Some(s), Some(l)) => format!("{s}, {l}"),
                (Some(s), None) => s.clone(),
                (None, Some(l)) => l.clone(),
                (None, None) => "?".to_string(),
            };
            out.push_str(&format!(
                "{spelling:<16}  {:<4}  {}\n",
                spec.argcount, leaf.value
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!("pattern: {}\n", summary.pattern));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use usage_pattern_parser::HandlerConfig;

    #[test]
    fn test_table_aligns_names() {
        let doc = UsageDoc::compile("Usage: prog [--verbose] <x>").unwrap();
        let response = doc.parse_argv(["a"], &HandlerConfig::default());
        assert_eq!(
            format_response(&response, OutputFormat::Table).unwrap(),
            "--verbose  false\n<x>        \"a\"\n"
        );
    }

    #[test]
    fn test_table_shows_error_text() {
        let doc = UsageDoc::compile("Usage: prog <x>").unwrap();
        let response = doc.parse_argv(Vec::<String>::new(), &HandlerConfig::default());
        assert_eq!(
            format_response(&response, OutputFormat::Table).unwrap(),
            "Usage: prog <x>\n"
        );
    }

    #[test]
    fn test_summary_json() {
        let doc = UsageDoc::compile("Usage: prog [-v]\n\nOptions:\n  -v --verbose  Talk.").unwrap();
        let raw = format_summary(&DocSummary::new(&doc), OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["usage"], "Usage: prog [-v]");
        assert_eq!(json["options"][0]["kind"]["Option"]["long"], "--verbose");
        assert_eq!(
            json["pattern"],
            "Required(Required(Optional(Option(-v, --verbose, 0, false))))"
        );
    }
}
