//! The outcome of handling one argv: bound values, or the text to show.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::Serialize;

use crate::{Binding, Pattern, SyntaxError, Value};

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// The argv matched; `args` holds every bound name.
    Matched,
    /// `-h`/`--help` was given; `output` is the usage doc.
    Help,
    /// `--version` was given; `output` is the version string.
    Version,
    /// The argv did not fit; `output` is the message and usage text.
    SyntaxError,
}

/// Name-to-value map plus exit status and display text.
///
/// Matched, help and version responses are successful (status 0); only a
/// matched response carries bound values.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::{Response, ResponseKind, SyntaxError};
///
/// let response = Response::syntax_error(SyntaxError::new("Usage: prog <x>"));
/// assert_eq!(response.kind(), ResponseKind::SyntaxError);
/// assert_eq!(response.exit_status(), 1);
/// assert!(!response.is_success());
/// assert!(response["<x>"].as_str().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    kind: ResponseKind,
    status: i32,
    args: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "String::is_empty")]
    output: String,
    #[serde(skip)]
    usage: String,
}

impl Response {
    /// Builds the value map of a successful match: every leaf identity
    /// starts at its default, then collected bindings override it.
    pub fn from_match(pattern: &Pattern, collected: Vec<Binding>, usage: &str) -> Self {
        let mut args: BTreeMap<String, Value> = pattern
            .identities()
            .into_iter()
            .map(|id| {
                let leaf = pattern.leaf(id);
                (leaf.name().to_string(), leaf.value.clone())
            })
            .collect();
        for binding in collected {
            args.insert(binding.name, binding.value);
        }

        Self {
            kind: ResponseKind::Matched,
            status: 0,
            args,
            output: String::new(),
            usage: usage.to_string(),
        }
    }

    pub fn help(doc: &str, usage: &str) -> Self {
        Self::notice(ResponseKind::Help, doc.trim_matches('\n'), usage)
    }

    pub fn version(version: &str, usage: &str) -> Self {
        Self::notice(ResponseKind::Version, version, usage)
    }

    pub fn syntax_error(err: SyntaxError) -> Self {
        Self {
            kind: ResponseKind::SyntaxError,
            status: 1,
            args: BTreeMap::new(),
            output: err.to_string(),
            usage: err.usage().to_string(),
        }
    }

    fn notice(kind: ResponseKind, output: &str, usage: &str) -> Self {
        Self {
            kind,
            status: 0,
            args: BTreeMap::new(),
            output: output.to_string(),
            usage: usage.to_string(),
        }
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// `true` for a matched argv and for answered help or version
    /// requests (status 0). Use [`Response::kind`] to tell them apart.
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    pub fn exit_status(&self) -> i32 {
        self.status
    }

    pub fn args(&self) -> &BTreeMap<String, Value> {
        &self.args
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Help text, version string or syntax-error text. Empty when matched.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// The usage section of the doc this response was produced from.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Calls [`Response::exit`] for help, version and syntax-error
    /// responses. Returns normally for a matched argv.
    pub fn exit_unless_matched(&self) {
        if self.kind != ResponseKind::Matched {
            self.exit();
        }
    }

    /// Prints `output` (stdout for status 0, stderr otherwise) and
    /// terminates the process with the response status.
    pub fn exit(&self) -> ! {
        if !self.output.is_empty() {
            if self.status == 0 {
                println!("{}", self.output);
            } else {
                eprintln!("{}", self.output);
            }
        }
        std::process::exit(self.status)
    }
}

impl Index<&str> for Response {
    type Output = Value;

    /// Missing names read as `null`.
    fn index(&self, name: &str) -> &Value {
        self.args.get(name).unwrap_or(&NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Leaf, Node, OptionSpec};

    fn pattern() -> Pattern {
        let mut builder = Pattern::builder();
        let add = builder.alloc(Leaf::command("add"));
        let item = builder.alloc(Leaf::argument("<item>"));
        let speed = builder.alloc(Leaf::option(
            OptionSpec::new(None, Some("--speed"), 1),
            Value::from("10"),
        ));
        builder.finish(Node::Required(vec![
            Node::Leaf(add),
            Node::Leaf(item),
            Node::Optional(vec![Node::Leaf(speed)]),
        ]))
    }

    #[test]
    fn test_defaults_then_overrides() {
        let response = Response::from_match(
            &pattern(),
            vec![
                Binding {
                    name: "add".into(),
                    value: Value::Bool(true),
                },
                Binding {
                    name: "<item>".into(),
                    value: Value::from("x"),
                },
            ],
            "Usage: prog add <item> [--speed=<kn>]",
        );

        assert!(response.is_success());
        assert_eq!(response["add"], Value::Bool(true));
        assert_eq!(response["<item>"], Value::from("x"));
        assert_eq!(response["--speed"], Value::from("10"));
        assert_eq!(response["--missing"], Value::Null);
        assert_eq!(
            response.args().keys().collect::<Vec<_>>(),
            vec!["--speed", "<item>", "add"]
        );
    }

    #[test]
    fn test_help_trims_newlines() {
        let response = Response::help("\nUsage: prog\n\n", "Usage: prog");
        assert_eq!(response.kind(), ResponseKind::Help);
        assert_eq!(response.exit_status(), 0);
        assert_eq!(response.output(), "Usage: prog");
        assert!(response.is_success());
        assert!(response.args().is_empty());
    }

    #[test]
    fn test_exit_unless_matched_returns_for_match() {
        let response = Response::from_match(&pattern(), Vec::new(), "Usage: prog");
        response.exit_unless_matched();
        assert_eq!(response["add"], Value::Bool(false));
    }

    #[test]
    fn test_serializes_kind_and_args() {
        let response = Response::version("1.2.0", "Usage: prog");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "version");
        assert_eq!(json["status"], 0);
        assert_eq!(json["output"], "1.2.0");
    }
}
