//! The seam between recognition and forest construction.
//!
//! The engine knows nothing about parse forests. Whenever it moves a dot it
//! reports the event to a `ForestHook`, which may hand back an opaque
//! `ForestNode` to be carried by the advanced state. The engine passes nodes
//! along but never looks inside them.
//!
//! Hooks see every advance, including those whose resulting state turns out
//! to be a duplicate; that is how distinct derivations of the same item stay
//! visible to the forest builder even though the chart keeps only one copy.
//! A Leo jump is reported once, as a `Child::Transitive` event, and the
//! builder expands the skipped chain from the chart when it needs it.

use derive_more::{Display, From};

use crate::dotted_rule::DottedRule;
use crate::grammar::NonTerminal;
use crate::token::Token;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display, From)]
#[display(fmt = "#{}", _0)]
pub struct ForestNode(pub usize);

/// What the dot moved over.
#[derive(Copy, Clone, Debug)]
pub enum Child<'a> {
    Token(&'a Token),
    /// A completed non-terminal spanning `origin..location`.
    Completed { symbol: &'a NonTerminal, origin: usize, node: Option<ForestNode> },
    /// A nullable non-terminal skipped without consuming input.
    Empty(&'a NonTerminal),
    /// A Leo jump. `symbol` completed over `origin..location` (its node is
    /// `node`), and the transitive item for `symbol` in set `origin` carried
    /// that completion straight up to the event's rule. The advances in
    /// between were never performed; each of them is found by following
    /// `EarleySet::unique_waiting(symbol)` from set `origin` and repeating
    /// with the waiting item's left-hand side and origin, until the origin
    /// of the event is reached.
    Transitive { symbol: &'a NonTerminal, origin: usize, node: Option<ForestNode> },
}

/// One dot advance, or with `Child::Transitive` a whole memoized chain of
/// them. A transitive event has no `parent`: the topmost item of the chain
/// is rebuilt from the chart rather than from a state carrying a node.
#[derive(Copy, Clone, Debug)]
pub struct AttachEvent<'a> {
    /// The rule after the dot has moved.
    pub rule: &'a DottedRule,
    pub origin: usize,
    pub location: usize,
    /// Node carried by the state before the move.
    pub parent: Option<ForestNode>,
    pub child: Child<'a>,
}

pub trait ForestHook {
    fn attach(&mut self, event: AttachEvent<'_>) -> Option<ForestNode>;
}

/// Builds nothing.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoForest;

impl ForestHook for NoForest {
    fn attach(&mut self, _event: AttachEvent<'_>) -> Option<ForestNode> { None }
}
