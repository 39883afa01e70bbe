//! A compiled usage doc.

use tracing::debug;
use usage_pattern_core::{
    ArgvToken, ArgvTokenizer, FormatError, Matcher, OptionError, OptionRegistry, Pattern,
    Response, SyntaxError,
};

use crate::HandlerConfig;
use crate::options::parse_defaults;
use crate::pattern_parser::parse_pattern;
use crate::section::{Section, parse_section};
use crate::usage::FormalUsage;

/// A usage doc compiled once and matched against any number of argvs.
///
/// Immutable after [`UsageDoc::compile`]: matching never writes into the
/// pattern, so a `UsageDoc` can be shared between threads.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::Value;
/// use usage_pattern_parser::{HandlerConfig, UsageDoc};
///
/// let doc = UsageDoc::compile("Usage: prog [--verbose] <file>").unwrap();
/// let response = doc.parse_argv(["--verbose", "a.txt"], &HandlerConfig::default());
///
/// assert!(response.is_success());
/// assert_eq!(response["--verbose"], Value::Bool(true));
/// assert_eq!(response["<file>"], Value::from("a.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageDoc {
    doc: String,
    usage: String,
    options: OptionRegistry,
    pattern: Pattern,
}

impl UsageDoc {
    /// Compiles `doc`: extracts the usage section, reads the option
    /// descriptions, parses the usage pattern, expands `[options]` and
    /// runs the fix-up passes.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] when the doc has no usage section or more
    /// than one, when two option descriptions share a spelling, or when
    /// the usage pattern is malformed.
    pub fn compile(doc: &str) -> Result<Self, FormatError> {
        let mut sections = parse_section(Section::Usage, doc);
        let usage = match sections.len() {
            0 => return Err(FormatError::MissingUsage),
            1 => sections.remove(0),
            _ => return Err(FormatError::MultipleUsage),
        };

        let mut options = parse_defaults(doc)?;
        let described: Vec<_> = options.iter().cloned().collect();
        let formal = FormalUsage::from_section(&usage);
        let mut pattern = parse_pattern(&formal.to_string(), &mut options)?;
        pattern.expand_options_shortcuts(&described);
        pattern.fix();

        debug!(
            alternatives = formal.alternatives().len(),
            identities = pattern.leaves().len(),
            options = options.len(),
            "Compiled usage doc"
        );

        Ok(Self {
            doc: doc.to_string(),
            usage,
            options,
            pattern,
        })
    }

    /// The full doc text as given to [`UsageDoc::compile`].
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// The trimmed usage section, shown with syntax errors.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Described options plus options first seen in the usage pattern.
    pub fn options(&self) -> &OptionRegistry {
        &self.options
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Tokenizes `argv` against a private copy of the option registry.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionError`] for ambiguous or malformed options.
    pub fn tokenize<I, S>(
        &self,
        argv: I,
        options_first: bool,
    ) -> Result<Vec<ArgvToken>, OptionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = self.options.clone();
        ArgvTokenizer::new(&mut registry)
            .options_first(options_first)
            .tokenize(argv)
    }

    /// Matches `argv` (program name excluded) and builds the response.
    ///
    /// Help and version requests are answered from the tokens before any
    /// matching happens. Malformed options and non-matching argvs produce
    /// a syntax-error response carrying the usage section.
    ///
    /// `config.exit` is not acted on here; the response is always
    /// returned. [`crate::Handler::handle`] exits through
    /// [`Response::exit_unless_matched`] when it is set.
    pub fn parse_argv<I, S>(&self, argv: I, config: &HandlerConfig) -> Response
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = match self.tokenize(argv, config.options_first) {
            Ok(tokens) => tokens,
            Err(err) => {
                debug!(error = %err, "Argv tokenizing failed");
                return Response::syntax_error(SyntaxError::with_message(
                    err.to_string(),
                    &self.usage,
                ));
            }
        };

        if config.help
            && tokens
                .iter()
                .any(|token| token.is_set_option("-h") || token.is_set_option("--help"))
        {
            return Response::help(&self.doc, &self.usage);
        }
        if let Some(version) = &config.version {
            if tokens.iter().any(|token| token.is_set_option("--version")) {
                return Response::version(version, &self.usage);
            }
        }

        match Matcher::new(&self.pattern).run(tokens) {
            Ok(state) => Response::from_match(&self.pattern, state.collected, &self.usage),
            Err(_) => Response::syntax_error(SyntaxError::new(&self.usage)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usage_pattern_core::{ResponseKind, Value};

    const DOC: &str = "\
Usage: prog [options] <file>
       prog --version

Options:
  -h --help      Show this screen.
  --version      Show version.
  -o FILE        Output [default: out.txt].
";

    #[test]
    fn test_missing_and_multiple_usage() {
        assert_eq!(
            UsageDoc::compile("no usage here").unwrap_err(),
            FormatError::MissingUsage
        );
        assert_eq!(
            UsageDoc::compile("Usage: a\n\nusage: b").unwrap_err(),
            FormatError::MultipleUsage
        );
    }

    #[test]
    fn test_options_shortcut_expanded() {
        let doc = UsageDoc::compile(DOC).unwrap();
        let response = doc.parse_argv(["-o", "x", "f"], &HandlerConfig::default());
        assert!(response.is_success());
        assert_eq!(response["-o"], Value::from("x"));
        assert_eq!(response["--help"], Value::Bool(false));
        assert_eq!(response["<file>"], Value::from("f"));
    }

    #[test]
    fn test_defaults_fill_unmatched() {
        let doc = UsageDoc::compile(DOC).unwrap();
        let response = doc.parse_argv(["f"], &HandlerConfig::default());
        assert_eq!(response["-o"], Value::from("out.txt"));
        assert_eq!(response["--version"], Value::Bool(false));
    }

    #[test]
    fn test_help_short_circuits() {
        let doc = UsageDoc::compile(DOC).unwrap();
        let response = doc.parse_argv(["-h", "unexpected", "extra"], &HandlerConfig::default());
        assert_eq!(response.kind(), ResponseKind::Help);
        assert_eq!(response.exit_status(), 0);
        assert_eq!(response.output(), DOC.trim_matches('\n'));
    }

    #[test]
    fn test_help_disabled_matches_normally() {
        let doc = UsageDoc::compile(DOC).unwrap();
        let config = HandlerConfig::default().with_help(false);
        let response = doc.parse_argv(["-h", "f"], &config);
        assert!(response.is_success());
        assert_eq!(response["--help"], Value::Bool(true));
    }

    #[test]
    fn test_version_needs_version_string() {
        let doc = UsageDoc::compile(DOC).unwrap();

        let response = doc.parse_argv(["--version"], &HandlerConfig::default());
        assert!(response.is_success());
        assert_eq!(response["--version"], Value::Bool(true));

        let config = HandlerConfig::default().with_version("prog 0.1");
        let response = doc.parse_argv(["--version"], &config);
        assert_eq!(response.kind(), ResponseKind::Version);
        assert_eq!(response.output(), "prog 0.1");
    }

    #[test]
    fn test_option_error_becomes_syntax_error() {
        let doc = UsageDoc::compile(DOC).unwrap();
        let response = doc.parse_argv(["f", "-o"], &HandlerConfig::default());
        assert_eq!(response.kind(), ResponseKind::SyntaxError);
        assert_eq!(response.exit_status(), 1);
        assert!(response.output().starts_with("-o requires argument\nUsage: prog"));
    }

    #[test]
    fn test_leftover_is_syntax_error() {
        let doc = UsageDoc::compile("Usage: prog <x>").unwrap();
        let response = doc.parse_argv(["a", "b"], &HandlerConfig::default());
        assert_eq!(response.kind(), ResponseKind::SyntaxError);
        assert_eq!(response.output(), "Usage: prog <x>");
        assert_eq!(response.usage(), "Usage: prog <x>");
    }

    #[test]
    fn test_doc_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UsageDoc>();
    }
}
