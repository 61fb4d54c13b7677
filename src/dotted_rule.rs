//! Dotted rules `A ::= X_1 ... X_i . X_i+1 ... X_n` and the registry that
//! interns them.
//!
//! Every `(production, position)` pair is materialized at most once per
//! registry; afterwards it is referred to by a `DottedRuleId`, an index into
//! the registry's dense table. Comparing or hashing two rules is therefore
//! comparing two integers.

use std::collections::HashMap;

use derive_more::Display;

use crate::grammar::{Grammar, LexerRuleId, NonTerminal, ProductionId, Symbol};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
#[display(fmt = "r{}", _0)]
pub struct DottedRuleId(pub(crate) usize);

#[derive(Debug)]
pub struct DottedRule {
    production: ProductionId,
    position: usize,
    lhs: NonTerminal,
    post_dot: Option<Symbol>,
    post_dot_rule: Option<LexerRuleId>,
}

impl DottedRule {
    pub fn production(&self) -> ProductionId { self.production }
    pub fn position(&self) -> usize { self.position }
    pub fn lhs(&self) -> &NonTerminal { &self.lhs }
    pub fn is_complete(&self) -> bool { self.post_dot.is_none() }
    pub fn post_dot_symbol(&self) -> Option<&Symbol> { self.post_dot.as_ref() }

    pub fn post_dot_nonterminal(&self) -> Option<&NonTerminal> {
        self.post_dot.as_ref().and_then(Symbol::as_nonterminal)
    }

    /// Index of the post-dot lexer rule within the grammar, when the post-dot
    /// symbol is a terminal.
    pub fn post_dot_lexer_rule(&self) -> Option<LexerRuleId> { self.post_dot_rule }
}

pub struct DottedRuleRegistry<'g> {
    grammar: &'g Grammar,
    rules: Vec<DottedRule>,
    index: HashMap<(ProductionId, usize), DottedRuleId>,
}

impl<'g> DottedRuleRegistry<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        DottedRuleRegistry { grammar, rules: Vec::new(), index: HashMap::new() }
    }

    pub fn grammar(&self) -> &'g Grammar { self.grammar }

    /// Panics if `position` lies beyond the end of the production.
    pub fn get(&mut self, production: ProductionId, position: usize) -> DottedRuleId {
        if let Some(&id) = self.index.get(&(production, position)) {
            return id;
        }
        let p = self.grammar.production(production);
        assert!(position <= p.rhs().len(),
                "dot position {} out of range for production {} of length {}",
                position, production, p.rhs().len());
        let post_dot = p.rhs().get(position).cloned();
        let post_dot_rule = post_dot.as_ref()
            .and_then(Symbol::as_lexer_rule)
            .and_then(|rule| self.grammar.lexer_rule_id(rule));
        let id = DottedRuleId(self.rules.len());
        self.rules.push(DottedRule {
            production,
            position,
            lhs: p.lhs().clone(),
            post_dot,
            post_dot_rule,
        });
        self.index.insert((production, position), id);
        id
    }

    pub fn rule(&self, id: DottedRuleId) -> &DottedRule {
        &self.rules[id.0]
    }

    /// The rule with its dot moved one symbol to the right; `None` when the
    /// rule is already complete.
    pub fn next(&mut self, id: DottedRuleId) -> Option<DottedRuleId> {
        let rule = self.rule(id);
        if rule.is_complete() {
            return None;
        }
        let (production, position) = (rule.production, rule.position);
        Some(self.get(production, position + 1))
    }

    /// Like `next`, for callers that have already established the rule is
    /// incomplete. Advancing a complete rule is a bug in the caller.
    #[track_caller]
    pub fn advance(&mut self, id: DottedRuleId) -> DottedRuleId {
        match self.next(id) {
            Some(next) => next,
            None => panic!("cannot advance complete dotted rule {}", self.display(id)),
        }
    }

    pub fn len(&self) -> usize { self.rules.len() }
    pub fn is_empty(&self) -> bool { self.rules.is_empty() }
}

#[cfg(test)]
#[path = "tests/dotted_rule.rs"]
mod tests_for_dotted_rule;
