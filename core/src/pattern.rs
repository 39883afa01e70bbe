//! The compiled pattern tree.
//!
//! Leaves live in an arena indexed by [`LeafId`]; branch nodes refer to
//! leaves by id. After [`Pattern::fix_identities`] every structurally equal
//! leaf is one arena entry, so "same identity, same binding" holds without
//! shared mutable references.
//!
//! The tree is immutable while matching. Values bound for one argv live in
//! the matcher's collected list, which makes a compiled pattern safe to
//! reuse and to share across threads.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use tracing::debug;

use crate::{Leaf, LeafKind, Value};

/// Index of a leaf identity in a [`Pattern`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(usize);

impl LeafId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the pattern tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Argument, command or option, by arena id.
    Leaf(LeafId),
    /// All children, in order.
    Required(Vec<Node>),
    /// Each child at most once, best effort.
    Optional(Vec<Node>),
    /// Exactly one child; the one leaving the fewest tokens wins.
    Either(Vec<Node>),
    /// The child, one or more times.
    OneOrMore(Box<Node>),
    /// `[options]`: every described option not spelled out elsewhere.
    /// Behaves like [`Node::Optional`] once expanded.
    OptionsShortcut(Vec<Node>),
}

impl Node {
    pub fn is_branch(&self) -> bool {
        !matches!(self, Node::Leaf(_))
    }

    fn children(&self) -> &[Node] {
        match self {
            Node::Leaf(_) => &[],
            Node::Required(children)
            | Node::Optional(children)
            | Node::Either(children)
            | Node::OptionsShortcut(children) => children,
            Node::OneOrMore(child) => std::slice::from_ref(child.as_ref()),
        }
    }

    fn children_mut(&mut self) -> &mut [Node] {
        match self {
            Node::Leaf(_) => &mut [],
            Node::Required(children)
            | Node::Optional(children)
            | Node::Either(children)
            | Node::OptionsShortcut(children) => children,
            Node::OneOrMore(child) => std::slice::from_mut(child.as_mut()),
        }
    }

    fn collect_leaf_ids(&self, out: &mut Vec<LeafId>) {
        match self {
            Node::Leaf(id) => out.push(*id),
            _ => {
                for child in self.children() {
                    child.collect_leaf_ids(out);
                }
            }
        }
    }
}

/// A usage pattern: leaf arena plus the `Required` root node.
///
/// # Examples
///
/// ```
/// use usage_pattern_core::{Leaf, Node, Pattern, Value};
///
/// // prog <x> <x>
/// let mut pattern = Pattern::builder();
/// let a = pattern.alloc(Leaf::argument("<x>"));
/// let b = pattern.alloc(Leaf::argument("<x>"));
/// let mut pattern = pattern.finish(Node::Required(vec![Node::Leaf(a), Node::Leaf(b)]));
///
/// pattern.fix();
/// assert_eq!(pattern.identities().len(), 1);
/// assert_eq!(pattern.leaves()[0].value, Value::List(vec![]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    leaves: Vec<Leaf>,
    root: Node,
}

/// Allocates leaves while a pattern tree is being built.
#[derive(Debug, Default)]
pub struct PatternBuilder {
    leaves: Vec<Leaf>,
}

impl PatternBuilder {
    pub fn alloc(&mut self, leaf: Leaf) -> LeafId {
        self.leaves.push(leaf);
        LeafId(self.leaves.len() - 1)
    }

    pub fn finish(self, root: Node) -> Pattern {
        Pattern {
            leaves: self.leaves,
            root,
        }
    }
}

impl Pattern {
    pub fn builder() -> PatternBuilder {
        PatternBuilder::default()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn leaf(&self, id: LeafId) -> &Leaf {
        &self.leaves[id.0]
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Every leaf occurrence in tree order (repeats included).
    pub fn flat_leaf_ids(&self) -> Vec<LeafId> {
        let mut out = Vec::new();
        self.root.collect_leaf_ids(&mut out);
        out
    }

    /// Distinct leaf ids in order of first occurrence.
    pub fn identities(&self) -> Vec<LeafId> {
        let mut seen = HashSet::new();
        self.flat_leaf_ids()
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Runs both fix-up passes: identity merging, then accumulator shaping.
    pub fn fix(&mut self) -> &mut Self {
        self.fix_identities();
        self.fix_repeating_arguments();
        self
    }

    /// Fills every unexpanded `[options]` node with the described options
    /// that do not already appear in the tree. Already expanded nodes are
    /// left alone.
    pub fn expand_options_shortcuts(&mut self, described: &[Leaf]) {
        let explicit: HashSet<Leaf> = self
            .flat_leaf_ids()
            .into_iter()
            .map(|id| self.leaf(id))
            .filter(|leaf| leaf.is_option())
            .cloned()
            .collect();
        let missing: Vec<Leaf> = described
            .iter()
            .filter(|leaf| leaf.is_option() && !explicit.contains(*leaf))
            .cloned()
            .collect();

        let mut leaves = std::mem::take(&mut self.leaves);
        expand_shortcuts_in(&mut self.root, &missing, &mut leaves);
        self.leaves = leaves;
    }

    /// Merges structurally equal leaves into one arena entry and renumbers
    /// ids by first occurrence. Leaves no longer referenced are dropped.
    /// Idempotent.
    pub fn fix_identities(&mut self) {
        let mut uniq: Vec<Leaf> = Vec::new();
        let mut index: HashMap<Leaf, LeafId> = HashMap::new();
        let old = std::mem::take(&mut self.leaves);

        remap_leaves(&mut self.root, &mut |id| {
            let leaf = &old[id.0];
            *index.entry(leaf.clone()).or_insert_with(|| {
                uniq.push(leaf.clone());
                LeafId(uniq.len() - 1)
            })
        });

        debug!(
            occurrences = old.len(),
            identities = uniq.len(),
            "Merged leaf identities"
        );
        self.leaves = uniq;
    }

    /// Gives an accumulator shape to every identity that occurs more than
    /// once within one alternative of the expanded (single-`Either`) form:
    /// commands and flags count, arguments and valued options collect a list.
    pub fn fix_repeating_arguments(&mut self) {
        let mut repeating = HashSet::new();
        for case in self.either_cases() {
            let mut counts: HashMap<LeafId, usize> = HashMap::new();
            for id in case {
                *counts.entry(id).or_default() += 1;
            }
            repeating.extend(counts.into_iter().filter(|(_, n)| *n > 1).map(|(id, _)| id));
        }

        for id in &repeating {
            let leaf = &mut self.leaves[id.0];
            let takes_list = match &leaf.kind {
                LeafKind::Argument(_) => true,
                LeafKind::Option(spec) => spec.takes_argument(),
                LeafKind::Command(_) => false,
            };
            leaf.value = if takes_list {
                std::mem::take(&mut leaf.value).into_list_shape()
            } else {
                Value::Count(0)
            };
        }

        if !repeating.is_empty() {
            debug!(count = repeating.len(), "Marked repeating leaf identities");
        }
    }

    /// Expands the tree into an equivalent list of alternatives, each a flat
    /// sequence of leaf ids: `((-a | -b) (-c | -d))` gives
    /// `[-a -c], [-a -d], [-b -c], [-b -d]`. Optional groups are flattened
    /// in, and a repeated child is listed twice.
    pub fn either_cases(&self) -> Vec<Vec<LeafId>> {
        let mut result = Vec::new();
        let mut groups: VecDeque<Vec<&Node>> = VecDeque::from([vec![&self.root]]);

        while let Some(mut children) = groups.pop_front() {
            let Some(pos) = children.iter().position(|node| node.is_branch()) else {
                result.push(
                    children
                        .iter()
                        .filter_map(|node| match node {
                            Node::Leaf(id) => Some(*id),
                            _ => None,
                        })
                        .collect(),
                );
                continue;
            };

            let branch = children.remove(pos);
            match branch {
                Node::Either(alternatives) => {
                    for alternative in alternatives {
                        let mut group = vec![alternative];
                        group.extend(children.iter().copied());
                        groups.push_back(group);
                    }
                }
                Node::OneOrMore(child) => {
                    let mut group = vec![child.as_ref(), child.as_ref()];
                    group.extend(children.iter().copied());
                    groups.push_back(group);
                }
                Node::Required(inner) | Node::Optional(inner) | Node::OptionsShortcut(inner) => {
                    let mut group: Vec<&Node> = inner.iter().collect();
                    group.extend(children.iter().copied());
                    groups.push_back(group);
                }
                Node::Leaf(_) => {}
            }
        }

        result
    }

    fn fmt_node(&self, node: &Node, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, children) = match node {
            Node::Leaf(id) => return write!(f, "{}", self.leaf(*id)),
            Node::Required(children) => ("Required", children.as_slice()),
            Node::Optional(children) => ("Optional", children.as_slice()),
            Node::Either(children) => ("Either", children.as_slice()),
            Node::OptionsShortcut(children) => ("OptionsShortcut", children.as_slice()),
            Node::OneOrMore(child) => ("OneOrMore", std::slice::from_ref(child.as_ref())),
        };
        write!(f, "{label}(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.fmt_node(child, f)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(&self.root, f)
    }
}

fn remap_leaves(node: &mut Node, remap: &mut impl FnMut(LeafId) -> LeafId) {
    match node {
        Node::Leaf(id) => *id = remap(*id),
        _ => {
            for child in node.children_mut() {
                remap_leaves(child, remap);
            }
        }
    }
}

fn expand_shortcuts_in(node: &mut Node, missing: &[Leaf], leaves: &mut Vec<Leaf>) {
    match node {
        Node::OptionsShortcut(children) if children.is_empty() => {
            debug!(options = missing.len(), "Expanding [options] shortcut");
            for leaf in missing {
                leaves.push(leaf.clone());
                children.push(Node::Leaf(LeafId(leaves.len() - 1)));
            }
        }
        _ => {
            for child in node.children_mut() {
                expand_shortcuts_in(child, missing, leaves);
            }
        }
    }
}
