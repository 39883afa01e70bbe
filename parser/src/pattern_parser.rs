//! Recursive-descent parser for formal usage expressions.
//!
//! ```text
//! expr  := seq ( "|" seq )*
//! seq   := ( atom [ "..." ] )*
//! atom  := "(" expr ")" | "[" expr "]" | "options"
//!        | long | shorts | argument | command
//! ```

use tracing::debug;
use usage_pattern_core::resolve::{parse_long, parse_shorts};
use usage_pattern_core::{
    FormatError, Leaf, Node, OptionRegistry, Pattern, PatternBuilder, TokenContext, TokenStream,
};

use crate::lexer::pattern_tokens;

/// Parses a formal usage expression into an unfixed [`Pattern`] rooted at
/// a `Required` node.
///
/// Options the registry does not know are registered, so the argv
/// tokenizer recognizes them later.
///
/// # Errors
///
/// [`FormatError::UnmatchedBracket`], [`FormatError::UnexpectedEnding`], or
/// [`FormatError::Option`] for an option misused inside the pattern.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::OptionRegistry;
/// use usage_pattern_parser::parse_pattern;
///
/// let mut registry = OptionRegistry::new();
/// let pattern = parse_pattern("( add <x> [-v] )", &mut registry).unwrap();
/// assert_eq!(
///     pattern.to_string(),
///     "Required(Required(Command(add, false), Argument(<x>, null), Optional(Option(-v, -, 0, false))))"
/// );
/// assert_eq!(registry.len(), 1);
/// ```
pub fn parse_pattern(source: &str, registry: &mut OptionRegistry) -> Result<Pattern, FormatError> {
    let tokens = TokenStream::new(pattern_tokens(source), TokenContext::Pattern);
    let mut parser = PatternParser {
        tokens,
        registry,
        builder: Pattern::builder(),
    };

    let result = parser.parse_expr()?;
    if !parser.tokens.is_empty() {
        return Err(FormatError::UnexpectedEnding(parser.tokens.drain().join(" ")));
    }

    let pattern = parser.builder.finish(Node::Required(result));
    debug!(leaves = pattern.leaves().len(), "Parsed usage pattern");
    Ok(pattern)
}

struct PatternParser<'r> {
    tokens: TokenStream,
    registry: &'r mut OptionRegistry,
    builder: PatternBuilder,
}

impl PatternParser<'_> {
    fn parse_expr(&mut self) -> Result<Vec<Node>, FormatError> {
        let seq = self.parse_seq()?;
        if self.tokens.current() != Some("|") {
            return Ok(seq);
        }

        let mut branches = Vec::new();
        push_branch(&mut branches, seq);
        while self.tokens.current() == Some("|") {
            self.tokens.advance();
            let seq = self.parse_seq()?;
            push_branch(&mut branches, seq);
        }

        Ok(if branches.len() > 1 {
            vec![Node::Either(branches)]
        } else {
            branches
        })
    }

    fn parse_seq(&mut self) -> Result<Vec<Node>, FormatError> {
        let mut result = Vec::new();

        while !matches!(self.tokens.current(), None | Some("]" | ")" | "|")) {
            let mut atom = self.parse_atom()?;
            if self.tokens.current() == Some("...") {
                self.tokens.advance();
                let child = if atom.len() == 1 {
                    atom.remove(0)
                } else {
                    Node::Required(atom)
                };
                atom = vec![Node::OneOrMore(Box::new(child))];
            }
            result.extend(atom);
        }

        Ok(result)
    }

    fn parse_atom(&mut self) -> Result<Vec<Node>, FormatError> {
        let Some(token) = self.tokens.current() else {
            return Ok(Vec::new());
        };

        match token {
            "(" | "[" => {
                let open = if token == "(" { '(' } else { '[' };
                self.tokens.advance();
                let children = self.parse_expr()?;
                let close = if open == '(' { ")" } else { "]" };
                if self.tokens.advance().as_deref() != Some(close) {
                    return Err(FormatError::UnmatchedBracket(open));
                }
                Ok(vec![if open == '(' {
                    Node::Required(children)
                } else {
                    Node::Optional(children)
                }])
            }
            "options" => {
                self.tokens.advance();
                Ok(vec![Node::OptionsShortcut(Vec::new())])
            }
            t if t.starts_with("--") && t != "--" => {
                let leaf = parse_long(&mut self.tokens, self.registry)?;
                Ok(vec![self.leaf(leaf)])
            }
            t if t.starts_with('-') && t != "-" && t != "--" => {
                let leaves = parse_shorts(&mut self.tokens, self.registry)?;
                Ok(leaves.into_iter().map(|leaf| self.leaf(leaf)).collect())
            }
            t if is_argument_name(t) => {
                let leaf = Leaf::argument(t);
                self.tokens.advance();
                Ok(vec![self.leaf(leaf)])
            }
            t => {
                let leaf = Leaf::command(t);
                self.tokens.advance();
                Ok(vec![self.leaf(leaf)])
            }
        }
    }

    fn leaf(&mut self, leaf: Leaf) -> Node {
        Node::Leaf(self.builder.alloc(leaf))
    }
}

fn push_branch(branches: &mut Vec<Node>, mut seq: Vec<Node>) {
    if seq.len() > 1 {
        branches.push(Node::Required(seq));
    } else {
        branches.append(&mut seq);
    }
}

/// `<name>` placeholders and all-caps words (`FILE`, `N_2`) are arguments.
fn is_argument_name(token: &str) -> bool {
    (token.starts_with('<') && token.ends_with('>'))
        || (token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase))
}
