//! Pattern tree, argv tokenizer and matcher for usage-string driven
//! argument parsing.
//!
//! This crate holds the runtime half of the engine:
//!
//! - [`Value`], [`Leaf`] and [`OptionSpec`]: bound values and the leaf kinds
//!   (positional argument, command literal, option).
//! - [`Pattern`]: a leaf-identity arena plus a [`Node`] tree, with the
//!   fix-up passes ([`Pattern::fix_identities`],
//!   [`Pattern::fix_repeating_arguments`]) and `[options]` expansion.
//! - [`OptionRegistry`]: known option templates, validated for duplicate
//!   spellings ([`validate_options`]).
//! - [`resolve`]: the option-token resolver shared by usage-pattern parsing
//!   and argv tokenizing.
//! - [`ArgvTokenizer`]: splits an argv into [`ArgvToken`]s.
//! - [`Matcher`]: backtracking match of tokens against a pattern.
//! - [`Response`]: the bound values, or help / version / error text.
//!
//! Turning usage text into a [`Pattern`] lives in `usage-pattern-parser`.
//!
//! # Example
//!
//! ```
//! use usage_pattern_core::*;
//!
//! // prog [-v] <file>
//! let verbose = Leaf::option_default(OptionSpec::new(Some("-v"), Some("--verbose"), 0));
//! let mut registry = OptionRegistry::from_options(vec![verbose.clone()]).unwrap();
//!
//! let mut builder = Pattern::builder();
//! let v = builder.alloc(verbose);
//! let file = builder.alloc(Leaf::argument("<file>"));
//! let mut pattern = builder.finish(Node::Required(vec![
//!     Node::Optional(vec![Node::Leaf(v)]),
//!     Node::Leaf(file),
//! ]));
//! pattern.fix();
//!
//! let tokens = ArgvTokenizer::new(&mut registry).tokenize(["-v", "a.txt"]).unwrap();
//! let state = Matcher::new(&pattern).run(tokens).unwrap();
//! let response = Response::from_match(&pattern, state.collected, "Usage: prog [-v] <file>");
//!
//! assert_eq!(response["--verbose"], Value::Bool(true));
//! assert_eq!(response["<file>"], Value::from("a.txt"));
//! ```

mod argv;
mod error;
mod leaf;
mod matcher;
mod pattern;
mod registry;
pub mod resolve;
mod response;
mod tokens;
mod value;

pub use argv::{ArgvToken, ArgvTokenizer};
pub use error::{FormatError, OptionError, Result, SyntaxError};
pub use leaf::{Leaf, LeafKind, OptionSpec};
pub use matcher::{Binding, MatchOutcome, MatchState, Matcher, NoMatch};
pub use pattern::{LeafId, Node, Pattern, PatternBuilder};
pub use registry::{OptionRegistry, validate_options};
pub use response::{Response, ResponseKind};
pub use tokens::{TokenContext, TokenStream};
pub use value::Value;
