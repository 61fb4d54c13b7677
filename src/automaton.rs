//! Precompiled frame graph for the deterministic engine.
//!
//! A frame is a set of dotted rules that the incremental engine would always
//! find together at one chart position with one origin. Compiling the grammar
//! into frames ahead of time moves prediction and nullable completion out of
//! the per-token loop: at runtime a frame is advanced by a single table
//! lookup.
//!
//! Every frame is closed under nullable advances (an item `A -> a . B c` with
//! `B` nullable brings `A -> a B . c` along). A frame whose items expect
//! non-terminals has a null transition to a "predicted" frame holding the
//! dot-zero rules of everything those non-terminals can start with; the
//! predicted frame is itself closed, so it has no null transition of its own.

use std::collections::{HashMap, HashSet, VecDeque};

use derive_more::Display;
use linear_map::LinearMap;
use tracing::debug;

use crate::dotted_rule::{DottedRuleId, DottedRuleRegistry};
use crate::grammar::{Grammar, LexerRuleId, NonTerminal, Symbol, TokenType};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
#[display(fmt = "f{}", _0)]
pub struct FrameId(pub(crate) usize);

#[derive(Clone, Default, Debug)]
pub struct Frame {
    rules: Vec<DottedRuleId>,
    predicted: bool,
    token_transitions: LinearMap<TokenType, FrameId>,
    reductions: LinearMap<NonTerminal, FrameId>,
    null_transition: Option<FrameId>,
    scan_keys: Vec<LexerRuleId>,
    completed: Vec<NonTerminal>,
}

impl Frame {
    /// Sorted, without duplicates.
    pub fn rules(&self) -> &[DottedRuleId] { &self.rules }

    /// Whether this frame is the prediction closure of some other frame.
    pub fn is_predicted(&self) -> bool { self.predicted }

    pub fn token_transition(&self, token_type: &TokenType) -> Option<FrameId> {
        self.token_transitions.get(token_type).copied()
    }

    pub fn token_transitions(&self) -> impl Iterator<Item = (&TokenType, FrameId)> {
        self.token_transitions.iter().map(|(t, &f)| (t, f))
    }

    pub fn reduction(&self, symbol: &NonTerminal) -> Option<FrameId> {
        self.reductions.get(symbol).copied()
    }

    pub fn reductions(&self) -> impl Iterator<Item = (&NonTerminal, FrameId)> {
        self.reductions.iter().map(|(nt, &f)| (nt, f))
    }

    pub fn null_transition(&self) -> Option<FrameId> { self.null_transition }

    /// Lexer rules of the items expecting a terminal.
    pub fn scan_keys(&self) -> &[LexerRuleId] { &self.scan_keys }

    /// Left-hand sides of the complete items, each listed once.
    pub fn completed(&self) -> &[NonTerminal] { &self.completed }
}

/// A grammar compiled into frames. Built once; any number of deterministic
/// engines can share it.
pub struct PrecomputedGrammar<'g> {
    grammar: &'g Grammar,
    registry: DottedRuleRegistry<'g>,
    frames: Vec<Frame>,
    start: FrameId,
}

impl<'g> PrecomputedGrammar<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        let mut compiler = Compiler {
            registry: DottedRuleRegistry::new(grammar),
            frames: Vec::new(),
            index: HashMap::new(),
            pending: VecDeque::new(),
        };

        let kernel = grammar.start_productions()
            .iter()
            .map(|&p| compiler.registry.get(p, 0))
            .collect();
        let start = compiler.goto(kernel);
        while let Some(id) = compiler.pending.pop_front() {
            compiler.process(id);
        }

        debug!(frames = compiler.frames.len(), rules = compiler.registry.len(), "precomputed grammar");
        PrecomputedGrammar {
            grammar,
            registry: compiler.registry,
            frames: compiler.frames,
            start,
        }
    }

    pub fn grammar(&self) -> &'g Grammar { self.grammar }
    pub fn registry(&self) -> &DottedRuleRegistry<'g> { &self.registry }
    pub fn start(&self) -> FrameId { self.start }
    pub fn frame(&self, id: FrameId) -> &Frame { &self.frames[id.0] }
    pub fn frames(&self) -> &[Frame] { &self.frames }
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum Edge {
    Token(TokenType),
    Reduce(NonTerminal),
}

struct Compiler<'g> {
    registry: DottedRuleRegistry<'g>,
    frames: Vec<Frame>,
    index: HashMap<(Vec<DottedRuleId>, bool), FrameId>,
    pending: VecDeque<FrameId>,
}

impl<'g> Compiler<'g> {
    fn intern(&mut self, mut rules: Vec<DottedRuleId>, predicted: bool) -> FrameId {
        rules.sort_unstable();
        rules.dedup();
        let key = (rules, predicted);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = FrameId(self.frames.len());
        self.frames.push(FrameBuilder::new(key.0.clone(), predicted).build());
        self.index.insert(key, id);
        self.pending.push_back(id);
        id
    }

    /// The frame reached once the dots have moved to `kernel`.
    fn goto(&mut self, kernel: Vec<DottedRuleId>) -> FrameId {
        let rules = self.nullable_closure(kernel);
        self.intern(rules, false)
    }

    fn nullable_closure(&mut self, mut rules: Vec<DottedRuleId>) -> Vec<DottedRuleId> {
        let grammar = self.registry.grammar();
        let mut i = 0;
        while i < rules.len() {
            let rule = rules[i];
            i += 1;
            let nullable = self.registry.rule(rule)
                .post_dot_nonterminal()
                .map_or(false, |nt| grammar.is_nullable(nt));
            if nullable {
                let next = self.registry.advance(rule);
                if !rules.contains(&next) {
                    rules.push(next);
                }
            }
        }
        rules
    }

    /// Every rule predicted, directly or through other predictions, by the
    /// post-dot non-terminals of `rules`, closed under nullable advances.
    fn predictions(&mut self, rules: &[DottedRuleId]) -> Vec<DottedRuleId> {
        let grammar = self.registry.grammar();
        let mut pending: Vec<NonTerminal> = rules.iter()
            .filter_map(|&r| self.registry.rule(r).post_dot_nonterminal().cloned())
            .collect();
        let mut expanded = HashSet::new();
        let mut predicted = Vec::new();
        while let Some(nonterminal) = pending.pop() {
            if !expanded.insert(nonterminal.clone()) {
                continue;
            }
            for &production in grammar.rules_for(&nonterminal) {
                let mut rule = self.registry.get(production, 0);
                loop {
                    predicted.push(rule);
                    let next = match self.registry.rule(rule).post_dot_nonterminal() {
                        Some(nt) => nt.clone(),
                        None => break,
                    };
                    let nullable = grammar.is_nullable(&next);
                    pending.push(next);
                    if !nullable {
                        break;
                    }
                    rule = self.registry.advance(rule);
                }
            }
        }
        predicted
    }

    fn process(&mut self, id: FrameId) {
        let frame = std::mem::take(&mut self.frames[id.0]);

        let mut edges: LinearMap<Edge, Vec<DottedRuleId>> = LinearMap::new();
        let mut scan_keys = Vec::new();
        let mut completed = Vec::new();
        for &rule_id in frame.rules() {
            let rule = self.registry.rule(rule_id);
            let edge = match rule.post_dot_symbol() {
                None => {
                    if !completed.contains(rule.lhs()) {
                        completed.push(rule.lhs().clone());
                    }
                    continue;
                }
                Some(Symbol::Terminal(lexer_rule)) => {
                    if let Some(key) = rule.post_dot_lexer_rule() {
                        if !scan_keys.contains(&key) {
                            scan_keys.push(key);
                        }
                    }
                    Edge::Token(lexer_rule.token_type().clone())
                }
                Some(Symbol::NonTerminal(nt)) => Edge::Reduce(nt.clone()),
            };
            let next = self.registry.advance(rule_id);
            match edges.get_mut(&edge) {
                Some(kernel) => kernel.push(next),
                None => { edges.insert(edge, vec![next]); }
            }
        }
        scan_keys.sort_unstable();

        let null_transition = if frame.predicted {
            None
        } else {
            let predicted = self.predictions(frame.rules());
            if predicted.is_empty() { None } else { Some(self.intern(predicted, true)) }
        };

        let mut builder = FrameBuilder::new(frame.rules, frame.predicted)
            .scan_keys(scan_keys)
            .completed(completed)
            .null_transition(null_transition);
        for (edge, kernel) in edges {
            let target = self.goto(kernel);
            builder = match edge {
                Edge::Token(token_type) => builder.token(token_type, target),
                Edge::Reduce(nt) => builder.reduction(nt, target),
            };
        }
        self.frames[id.0] = builder.build();
    }
}

struct FrameBuilder(Frame);

impl FrameBuilder {
    fn new(rules: Vec<DottedRuleId>, predicted: bool) -> Self {
        Self(Frame { rules, predicted, ..Frame::default() })
    }

    fn token(mut self, token_type: TokenType, next: FrameId) -> Self {
        self.0.token_transitions.insert(token_type, next);
        self
    }

    fn reduction(mut self, nt: NonTerminal, next: FrameId) -> Self {
        self.0.reductions.insert(nt, next);
        self
    }

    fn null_transition(mut self, next: Option<FrameId>) -> Self {
        self.0.null_transition = next;
        self
    }

    fn scan_keys(mut self, keys: Vec<LexerRuleId>) -> Self {
        self.0.scan_keys = keys;
        self
    }

    fn completed(mut self, completed: Vec<NonTerminal>) -> Self {
        self.0.completed = completed;
        self
    }

    fn build(self) -> Frame {
        self.0
    }
}

// This is a trick: we have the source code for our tests under a single
// `src/tests/` subdirectory, but we declare it as a module *here*, under this
// module. That way, it has access to private constructors and state that a
// sibling (or in this case, nibling) module would not have access to.
#[cfg(test)]
#[path = "tests/automaton.rs"]
mod tests_for_automaton;
