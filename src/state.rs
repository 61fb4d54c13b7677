use crate::dotted_rule::{DottedRule, DottedRuleId, DottedRuleRegistry};
use crate::forest::ForestNode;
use crate::grammar::{Grammar, NonTerminal, ProductionId};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum StateKind {
    Normal,
    /// Leo item: completing `recognized` at this state's set is known to
    /// finish the chain ending in the state's (complete) rule.
    Transitive { recognized: NonTerminal },
}

/// An Earley item: a dotted rule, the location where its recognition began,
/// and its kind. The forest node rides along and is ignored by equality and
/// hashing, so the chart deduplicates items regardless of derivation.
#[derive(Clone, Debug)]
pub struct State {
    rule: DottedRuleId,
    origin: usize,
    kind: StateKind,
    node: Option<ForestNode>,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.rule == other.rule && self.origin == other.origin && self.kind == other.kind
    }
}

impl Eq for State {}

impl std::hash::Hash for State {
    fn hash<H: std::hash::Hasher>(&self, h: &mut H) {
        self.rule.hash(h);
        self.origin.hash(h);
        self.kind.hash(h);
    }
}

impl State {
    pub(crate) fn normal(rule: DottedRuleId, origin: usize, node: Option<ForestNode>) -> Self {
        State { rule, origin, kind: StateKind::Normal, node }
    }

    pub fn rule(&self) -> DottedRuleId { self.rule }
    pub fn origin(&self) -> usize { self.origin }
    pub fn kind(&self) -> &StateKind { &self.kind }
    pub fn node(&self) -> Option<ForestNode> { self.node }

    pub fn is_transitive(&self) -> bool {
        matches!(self.kind, StateKind::Transitive { .. })
    }

    pub fn recognized(&self) -> Option<&NonTerminal> {
        match &self.kind {
            StateKind::Transitive { recognized } => Some(recognized),
            StateKind::Normal => None,
        }
    }
}

pub struct StateFactory<'g> {
    registry: DottedRuleRegistry<'g>,
}

impl<'g> StateFactory<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        StateFactory { registry: DottedRuleRegistry::new(grammar) }
    }

    pub fn registry(&self) -> &DottedRuleRegistry<'g> { &self.registry }
    pub fn registry_mut(&mut self) -> &mut DottedRuleRegistry<'g> { &mut self.registry }

    pub fn rule(&self, id: DottedRuleId) -> &DottedRule { self.registry.rule(id) }

    pub fn new_state(&mut self, production: ProductionId, position: usize, origin: usize) -> State {
        State::normal(self.registry.get(production, position), origin, None)
    }

    /// `state` with its dot advanced by one, same origin, carrying `node`.
    /// `None` if the state's rule is already complete.
    pub fn next_state(&mut self, state: &State, node: Option<ForestNode>) -> Option<State> {
        let rule = self.registry.next(state.rule)?;
        Some(State::normal(rule, state.origin, node))
    }

    pub fn transition_state(&self, recognized: NonTerminal, rule: DottedRuleId, origin: usize) -> State {
        State { rule, origin, kind: StateKind::Transitive { recognized }, node: None }
    }
}

#[cfg(test)]
#[path = "tests/state.rs"]
mod tests_for_state;
