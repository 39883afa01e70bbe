//! A consumable stream of string tokens, either from a usage pattern or
//! from a runtime argv.

use std::collections::VecDeque;

/// Where a token stream came from. Option resolution behaves differently
/// in each context: argv tokens get bound values and may abbreviate long
/// options, pattern tokens keep their template defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenContext {
    Pattern,
    Argv,
}

#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: VecDeque<String>,
    context: TokenContext,
}

impl TokenStream {
    pub fn new<I, S>(tokens: I, context: TokenContext) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            context,
        }
    }

    pub fn context(&self) -> TokenContext {
        self.context
    }

    pub fn current(&self) -> Option<&str> {
        self.tokens.front().map(String::as_str)
    }

    pub fn advance(&mut self) -> Option<String> {
        self.tokens.pop_front()
    }

    /// Removes and returns every remaining token.
    pub fn drain(&mut self) -> Vec<String> {
        self.tokens.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `true` when the next token cannot serve as an option argument.
    pub(crate) fn at_argument_boundary(&self) -> bool {
        matches!(self.current(), None | Some("--"))
    }
}
