//! Backtracking matcher over a compiled [`Pattern`].
//!
//! Every node maps a [`MatchState`] (leftover tokens plus collected
//! bindings) to a new state or to [`NoMatch`]. A failing node never
//! changes the caller's state, since states are passed by reference and
//! only replaced on success.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{ArgvToken, Leaf, LeafKind, Node, Pattern, Value};

/// A value bound to a pattern name during one match attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

/// Leftover argv tokens and the bindings collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchState {
    pub left: Vec<ArgvToken>,
    pub collected: Vec<Binding>,
}

impl MatchState {
    pub fn new(left: Vec<ArgvToken>) -> Self {
        Self {
            left,
            collected: Vec::new(),
        }
    }
}

/// A node did not match the leftover tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("argv does not match the usage pattern")]
pub struct NoMatch;

pub type MatchOutcome = Result<MatchState, NoMatch>;

/// Matches argv tokens against one pattern.
///
/// The pattern is only read, so one compiled pattern can serve any number
/// of matchers at once.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::{ArgvToken, Leaf, Matcher, Node, Pattern};
///
/// let mut builder = Pattern::builder();
/// let file = builder.alloc(Leaf::argument("<file>"));
/// let pattern = builder.finish(Node::Required(vec![Node::Leaf(file)]));
///
/// let state = Matcher::new(&pattern)
///     .run(vec![ArgvToken::Positional("a.txt".into())])
///     .unwrap();
/// assert_eq!(state.collected[0].name, "<file>");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'p> {
    pattern: &'p Pattern,
}

impl<'p> Matcher<'p> {
    pub fn new(pattern: &'p Pattern) -> Self {
        Self { pattern }
    }

    /// Matches the whole token list. Succeeds only when the root matches
    /// and no token is left over.
    pub fn run(&self, tokens: Vec<ArgvToken>) -> MatchOutcome {
        let start = MatchState::new(tokens);
        let outcome = self.match_node(self.pattern.root(), &start);

        match outcome {
            Ok(state) if state.left.is_empty() => {
                debug!(bindings = state.collected.len(), "Argv matched");
                Ok(state)
            }
            Ok(state) => {
                debug!(leftover = state.left.len(), "Argv matched with leftover tokens");
                Err(NoMatch)
            }
            Err(err) => {
                debug!("Argv did not match");
                Err(err)
            }
        }
    }

    /// Matches one node against `state`.
    pub fn match_node(&self, node: &Node, state: &MatchState) -> MatchOutcome {
        match node {
            Node::Leaf(id) => self.match_leaf(self.pattern.leaf(*id), state),
            Node::Required(children) => {
                let mut current = state.clone();
                for child in children {
                    current = self.match_node(child, &current)?;
                }
                Ok(current)
            }
            Node::Optional(children) | Node::OptionsShortcut(children) => {
                let mut current = state.clone();
                for child in children {
                    if let Ok(next) = self.match_node(child, &current) {
                        current = next;
                    }
                }
                Ok(current)
            }
            Node::Either(children) => children
                .iter()
                .enumerate()
                .filter_map(|(index, child)| {
                    let outcome = self.match_node(child, state);
                    trace!(
                        alternative = index,
                        matched = outcome.is_ok(),
                        left = outcome.as_ref().map_or(0, |s| s.left.len()),
                        "Either alternative"
                    );
                    outcome.ok()
                })
                .min_by_key(|candidate| candidate.left.len())
                .ok_or(NoMatch),
            Node::OneOrMore(child) => {
                let mut current = state.clone();
                let mut times = 0usize;
                loop {
                    let Ok(next) = self.match_node(child, &current) else {
                        break;
                    };
                    times += 1;
                    let progressed = next.left != current.left;
                    current = next;
                    if !progressed {
                        break;
                    }
                }
                if times >= 1 { Ok(current) } else { Err(NoMatch) }
            }
        }
    }

    fn match_leaf(&self, leaf: &Leaf, state: &MatchState) -> MatchOutcome {
        let (pos, matched) = single_match(leaf, &state.left).ok_or(NoMatch)?;
        let name = leaf.name();

        let mut next = state.clone();
        next.left.remove(pos);

        let value = if leaf.value.is_accumulator() {
            let increment = match (&leaf.value, matched) {
                (Value::Count(_), _) => Value::Count(1),
                (Value::List(_), Value::Str(s)) => Value::List(vec![s]),
                (_, other) => other,
            };
            if let Some(existing) = next.collected.iter_mut().find(|b| b.name == name) {
                if existing.value.accumulate(increment.clone()) {
                    return Ok(next);
                }
            }
            increment
        } else {
            matched
        };

        next.collected.push(Binding {
            name: name.to_string(),
            value,
        });
        Ok(next)
    }
}

/// Finds the token `leaf` would consume: its position and the value it
/// binds.
fn single_match(leaf: &Leaf, left: &[ArgvToken]) -> Option<(usize, Value)> {
    match &leaf.kind {
        LeafKind::Argument(_) => left
            .iter()
            .enumerate()
            .find_map(|(pos, token)| token.positional().map(|word| (pos, Value::from(word)))),
        LeafKind::Command(name) => {
            let (pos, word) = left
                .iter()
                .enumerate()
                .find_map(|(pos, token)| token.positional().map(|word| (pos, word)))?;
            (word == name).then_some((pos, Value::Bool(true)))
        }
        LeafKind::Option(spec) => left.iter().enumerate().find_map(|(pos, token)| {
            token
                .option()
                .filter(|option| option.name() == spec.name())
                .map(|option| (pos, option.value.clone()))
        }),
    }
}
