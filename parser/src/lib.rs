//! Compile usage docs into matchable pattern trees.
//!
//! A usage doc is free text with a `Usage:` section and any number of
//! `Options:` sections:
//!
//! - [`parse_section`] finds the sections.
//! - [`parse_defaults`] reads option descriptions into an
//!   [`OptionRegistry`](usage_pattern_core::OptionRegistry).
//! - [`FormalUsage`] turns the usage lines into one `( .. ) | ( .. )`
//!   expression, which [`pattern_tokens`] and [`parse_pattern`] turn into a
//!   [`Pattern`](usage_pattern_core::Pattern).
//! - [`UsageDoc`] ties these together and matches argvs.
//! - [`Handler`] adds a [`UsageCache`] and a [`HandlerConfig`].
//!
//! # Example
//!
//! ```
//! use usage_pattern_core::Value;
//! use usage_pattern_parser::handle;
//!
//! let doc = "\
//! Naval Fate.
//!
//! Usage:
//!   naval_fate ship new <name>...
//!   naval_fate ship <name> move <x> <y> [--speed=<kn>]
//!   naval_fate -h | --help
//!
//! Options:
//!   -h --help     Show this screen.
//!   --speed=<kn>  Speed in knots [default: 10].
//! ";
//!
//! let response = handle(doc, ["ship", "Guardian", "move", "10", "50"]).unwrap();
//! assert!(response.is_success());
//! assert_eq!(response["<name>"], Value::List(vec!["Guardian".into()]));
//! assert_eq!(response["--speed"], Value::from("10"));
//! assert_eq!(response["move"], Value::Bool(true));
//! ```

mod cache;
mod config;
mod doc;
mod error;
mod lexer;
mod options;
mod pattern_parser;
mod section;
mod usage;

use tracing::debug;
use usage_pattern_core::{FormatError, Response};

pub use cache::{UsageCache, fingerprint};
pub use config::HandlerConfig;
pub use doc::UsageDoc;
pub use error::ConfigError;
pub use lexer::pattern_tokens;
pub use options::{parse_defaults, parse_option_description};
pub use pattern_parser::parse_pattern;
pub use section::{Section, parse_section};
pub use usage::FormalUsage;

/// Handles argvs against usage docs with one configuration, compiling each
/// distinct doc once.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::ResponseKind;
/// use usage_pattern_parser::{Handler, HandlerConfig};
///
/// let handler = Handler::new(HandlerConfig::default().with_version("prog 1.0"));
/// let response = handler.handle("Usage: prog [--version]", ["--version"]).unwrap();
/// assert_eq!(response.kind(), ResponseKind::Version);
/// ```
#[derive(Debug, Default)]
pub struct Handler {
    config: HandlerConfig,
    cache: UsageCache,
}

impl Handler {
    pub fn new(config: HandlerConfig) -> Self {
        Self {
            config,
            cache: UsageCache::new(),
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn cache(&self) -> &UsageCache {
        &self.cache
    }

    /// Compiles `doc` (or reuses its cached compilation) and matches
    /// `argv` against it.
    ///
    /// With [`HandlerConfig::exit`] set, any response other than a match
    /// prints its output and terminates the process.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] when `doc` is not a valid usage doc.
    pub fn handle<I, S>(&self, doc: &str, argv: I) -> Result<Response, FormatError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let compiled = self.cache.get_or_compile(doc)?;
        let response = compiled.parse_argv(argv, &self.config);
        debug!(kind = ?response.kind(), status = response.exit_status(), "Handled argv");

        if self.config.exit {
            response.exit_unless_matched();
        }
        Ok(response)
    }
}

/// Compiles `doc` and matches `argv` with the default configuration.
///
/// # Errors
///
/// Returns a [`FormatError`] when `doc` is not a valid usage doc.
pub fn handle<I, S>(doc: &str, argv: I) -> Result<Response, FormatError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(UsageDoc::compile(doc)?.parse_argv(argv, &HandlerConfig::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use usage_pattern_core::ResponseKind;

    #[test]
    fn test_handler_reuses_compiled_doc() {
        let handler = Handler::default();
        let doc = "Usage: prog <x>";
        assert!(handler.handle(doc, ["a"]).unwrap().is_success());
        assert!(!handler.handle(doc, ["a", "b"]).unwrap().is_success());
        assert_eq!(handler.cache().len(), 1);
    }

    #[test]
    fn test_handler_returns_notices_without_exit() {
        let handler = Handler::new(HandlerConfig::default().with_version("1.0"));
        let doc = "Usage: prog [--version] <x>";

        let response = handler.handle(doc, ["--version"]).unwrap();
        assert_eq!(response.kind(), ResponseKind::Version);
        assert!(response.is_success());

        let response = handler.handle(doc, ["-h"]).unwrap();
        assert_eq!(response.kind(), ResponseKind::Help);
        assert!(response.is_success());

        let response = handler.handle(doc, Vec::<String>::new()).unwrap();
        assert_eq!(response.kind(), ResponseKind::SyntaxError);
        assert!(!response.is_success());
    }

    #[test]
    fn test_handler_propagates_format_error() {
        let handler = Handler::default();
        assert_eq!(
            handler.handle("Usage: prog (x", Vec::<String>::new()).unwrap_err(),
            FormatError::UnmatchedBracket('(')
        );
    }
}
