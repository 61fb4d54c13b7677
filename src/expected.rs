use std::collections::HashMap;
use std::rc::Rc;

use crate::grammar::{Grammar, LexerRule, LexerRuleId};

/// Deduplicates the lexer rules viable at a location and hands out a shared
/// slice for each distinct set, so asking again at the same location (or at
/// any location with the same expectations) does not allocate.
pub(crate) struct ExpectedRules<'g> {
    grammar: &'g Grammar,
    marked: Vec<bool>,
    scratch: Vec<LexerRuleId>,
    cache: HashMap<Box<[LexerRuleId]>, Rc<[&'g LexerRule]>>,
}

impl<'g> ExpectedRules<'g> {
    pub(crate) fn new(grammar: &'g Grammar) -> Self {
        ExpectedRules {
            grammar,
            marked: vec![false; grammar.lexer_rules().len()],
            scratch: Vec::new(),
            cache: HashMap::new(),
        }
    }

    /// The distinct rules among `ids`, ordered by their index in the grammar.
    pub(crate) fn collect(&mut self, ids: impl IntoIterator<Item = LexerRuleId>) -> Rc<[&'g LexerRule]> {
        self.scratch.clear();
        for id in ids {
            if !self.marked[id.0] {
                self.marked[id.0] = true;
                self.scratch.push(id);
            }
        }
        for id in &self.scratch {
            self.marked[id.0] = false;
        }
        self.scratch.sort_unstable();

        if let Some(rules) = self.cache.get(&self.scratch[..]) {
            return Rc::clone(rules);
        }

        let grammar = self.grammar;
        let rules: Rc<[&'g LexerRule]> = self.scratch.iter().map(|&id| grammar.lexer_rule(id)).collect();
        self.cache.insert(self.scratch.clone().into_boxed_slice(), Rc::clone(&rules));
        rules
    }

    #[cfg(test)]
    pub(crate) fn cached_sets(&self) -> usize { self.cache.len() }
}
