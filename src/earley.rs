//! Traditional earley: gradually build, from left-to-right, set of "Earley
//! items" for each position in input.
//!
//! The Earley sets memoize: rather than reparse portions of input, it reuses
//! the information from the Earley sets.
//!
//! This engine is driven one token at a time (`pulse`), so after every token
//! the chart holds every item consistent with the input so far. Two
//! refinements on top of the textbook algorithm:
//!
//! * Aycock and Horspool's nullable shortcut: predicting a nullable
//!   non-terminal immediately advances the predicting item past it, so empty
//!   derivations need no second pass.
//!
//! * Leo's optimization: when a completion would only ever advance a single
//!   item into a complete item (as happens throughout right recursion), the
//!   whole chain of such completions is memoized as one transitive item in
//!   the origin set. Later completions of the same non-terminal at that set
//!   jump straight to the top of the chain, so right-recursive input costs
//!   linear rather than quadratic work.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::chart::Chart;
use crate::dotted_rule::DottedRuleId;
use crate::expected::ExpectedRules;
use crate::forest::{AttachEvent, Child, ForestHook, ForestNode, NoForest};
use crate::grammar::{Grammar, LexerRule, NonTerminal, Symbol};
use crate::options::ParseEngineOptions;
use crate::recognizer::Recognizer;
use crate::state::{State, StateFactory};
use crate::token::Token;

pub struct ParseEngine<'g> {
    grammar: &'g Grammar,
    options: ParseEngineOptions,
    factory: StateFactory<'g>,
    chart: Chart,
    location: usize,
    forest: Box<dyn ForestHook + 'g>,
    expected: ExpectedRules<'g>,
    transitive_states_created: usize,
}

impl<'g> ParseEngine<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_options(grammar, ParseEngineOptions::default())
    }

    pub fn with_options(grammar: &'g Grammar, options: ParseEngineOptions) -> Self {
        Self::with_forest_hook(grammar, options, NoForest)
    }

    pub fn with_forest_hook(grammar: &'g Grammar, options: ParseEngineOptions, hook: impl ForestHook + 'g) -> Self {
        let mut engine = ParseEngine {
            grammar,
            options,
            factory: StateFactory::new(grammar),
            chart: Chart::new(),
            location: 0,
            forest: Box::new(hook),
            expected: ExpectedRules::new(grammar),
            transitive_states_created: 0,
        };
        engine.initialize();
        engine
    }

    pub fn grammar(&self) -> &'g Grammar { self.grammar }
    pub fn options(&self) -> ParseEngineOptions { self.options }
    pub fn chart(&self) -> &Chart { &self.chart }
    pub fn location(&self) -> usize { self.location }
    pub fn factory(&self) -> &StateFactory<'g> { &self.factory }

    /// Transitive (Leo) items materialized since the last reset.
    pub fn transitive_states_created(&self) -> usize { self.transitive_states_created }

    fn initialize(&mut self) {
        self.location = 0;
        self.chart = Chart::new();
        self.transitive_states_created = 0;
        let grammar = self.grammar;
        for &production in grammar.start_productions() {
            let state = self.factory.new_state(production, 0, 0);
            self.enqueue(0, state, "start");
        }
        self.reduce(0);
    }

    fn enqueue(&mut self, location: usize, state: State, operation: &'static str) -> bool {
        let inserted = self.chart.enqueue(location, state.clone(), self.factory.registry());
        if inserted {
            trace!(location, state = %self.factory.registry().display_state(&state), "{}", operation);
        }
        inserted
    }

    pub fn pulse(&mut self, token: &Token) -> bool {
        self.pulse_all(std::slice::from_ref(token))
    }

    pub fn pulse_all(&mut self, tokens: &[Token]) -> bool {
        let location = self.location;
        for token in tokens {
            self.scan(location, token);
        }

        let next = location + 1;
        if self.chart.len() <= next {
            debug!(location, tokens = tokens.len(), "no scan matched; token rejected");
            return false;
        }

        self.location = next;
        self.reduce(next);
        debug!(location = next, states = self.chart[next].len(), "pulse");
        true
    }

    fn scan(&mut self, location: usize, token: &Token) {
        let mut s = 0;
        while let Some(state) = self.chart[location].scans().get(s).cloned() {
            s += 1;
            let matches = match self.factory.rule(state.rule()).post_dot_symbol() {
                Some(Symbol::Terminal(rule)) => rule.token_type() == token.token_type(),
                _ => false,
            };
            if !matches {
                continue;
            }
            if let Some(next) = self.advance(&state, location + 1, Child::Token(token)) {
                self.enqueue(location + 1, next, "scan");
            }
        }
    }

    /// Drains completions and predictions at `location` until neither queue
    /// has anything left behind its cursor. Transitions are only ever looked
    /// up, never iterated.
    fn reduce(&mut self, location: usize) {
        let mut c = 0;
        let mut p = 0;
        loop {
            let set = &self.chart[location];
            if let Some(state) = set.completions().get(c).cloned() {
                c += 1;
                self.complete(&state, location);
            } else if let Some(state) = set.predictions().get(p).cloned() {
                p += 1;
                self.predict(&state, location);
            } else {
                break;
            }
        }
    }

    fn predict(&mut self, source: &State, location: usize) {
        let nonterminal = match self.factory.rule(source.rule()).post_dot_nonterminal() {
            Some(nt) => nt.clone(),
            None => return,
        };
        let grammar = self.grammar;
        for &production in grammar.rules_for(&nonterminal) {
            let state = self.factory.new_state(production, 0, location);
            self.enqueue(location, state, "predict");
        }
        if grammar.is_nullable(&nonterminal) {
            if let Some(next) = self.advance(source, location, Child::Empty(&nonterminal)) {
                self.enqueue(location, next, "predict");
            }
        }
    }

    fn complete(&mut self, completed: &State, location: usize) {
        let symbol = self.factory.rule(completed.rule()).lhs().clone();
        let origin = completed.origin();

        // An origin equal to `location` means an empty completion; that set is
        // still growing, so it cannot host a Leo item yet.
        if self.options.optimize_right_recursion && origin < location {
            self.optimize_reduction_path(&symbol, origin);
            if let Some(transition) = self.chart[origin].find_transition(&symbol).cloned() {
                let child = Child::Transitive { symbol: &symbol, origin, node: completed.node() };
                let rule = self.factory.rule(transition.rule());
                let node = self.forest.attach(AttachEvent {
                    rule,
                    origin: transition.origin(),
                    location,
                    parent: None,
                    child,
                });
                let topmost = State::normal(transition.rule(), transition.origin(), node);
                self.enqueue(location, topmost, "complete");
                return;
            }
        }

        let mut s = 0;
        while let Some(source) = self.chart[origin].waiting_for(&symbol, s).cloned() {
            s += 1;
            let child = Child::Completed { symbol: &symbol, origin, node: completed.node() };
            if let Some(next) = self.advance(&source, location, child) {
                self.enqueue(location, next, "complete");
            }
        }
    }

    /// Walks back from `symbol` completed into set `location` along the
    /// deterministic reduction path, memoizing it as a transitive item in
    /// every set it passes through. Returns the topmost item of the path.
    fn optimize_reduction_path(&mut self, symbol: &NonTerminal, location: usize) -> Option<(DottedRuleId, usize)> {
        let set = &self.chart[location];
        if let Some(transition) = set.find_transition(symbol) {
            return Some((transition.rule(), transition.origin()));
        }

        let source = set.unique_waiting(symbol)?.clone();
        let next = self.factory.registry_mut().next(source.rule())?;
        let next_rule = self.factory.rule(next);
        if !next_rule.is_complete() {
            return None;
        }

        // The path must not swallow a complete start item at origin zero:
        // acceptance looks for exactly that item.
        let lhs = next_rule.lhs().clone();
        let reaches_start = source.origin() == 0 && &lhs == self.grammar.start();
        let topmost = if source.origin() < location && !reaches_start {
            self.optimize_reduction_path(&lhs, source.origin())
        } else {
            None
        };
        let (rule, origin) = topmost.unwrap_or((next, source.origin()));

        let transition = self.factory.transition_state(symbol.clone(), rule, origin);
        if self.enqueue(location, transition, "transition") {
            self.transitive_states_created += 1;
        }
        Some((rule, origin))
    }

    /// Moves the dot of `state` over `child`, letting the forest hook see the
    /// move first.
    fn advance(&mut self, state: &State, location: usize, child: Child<'_>) -> Option<State> {
        let next = self.factory.registry_mut().next(state.rule())?;
        let node = self.forest.attach(AttachEvent {
            rule: self.factory.rule(next),
            origin: state.origin(),
            location,
            parent: state.node(),
            child,
        });
        self.factory.next_state(state, node)
    }

    pub fn is_accepted(&self) -> bool {
        self.accepting_state().is_some()
    }

    fn accepting_state(&self) -> Option<&State> {
        let start = self.grammar.start();
        self.chart.get(self.location)?
            .completions()
            .iter()
            .find(|s| s.origin() == 0 && self.factory.rule(s.rule()).lhs() == start)
    }

    /// Node the forest hook attached to the accepting item, if the input so
    /// far is accepted and the hook built one.
    pub fn parse_forest_root(&self) -> Option<ForestNode> {
        self.accepting_state()?.node()
    }

    pub fn expected_lexer_rules(&mut self) -> Rc<[&'g LexerRule]> {
        let factory = &self.factory;
        let scans = self.chart.get(self.location).into_iter().flat_map(|set| set.scans().iter());
        self.expected.collect(scans.filter_map(|s| factory.rule(s.rule()).post_dot_lexer_rule()))
    }

    pub fn reset(&mut self) {
        debug!(location = self.location, "reset");
        self.initialize();
    }
}

impl<'g> Recognizer<'g> for ParseEngine<'g> {
    fn grammar(&self) -> &'g Grammar { self.grammar }
    fn location(&self) -> usize { self.location }
    fn pulse(&mut self, token: &Token) -> bool { ParseEngine::pulse(self, token) }
    fn pulse_all(&mut self, tokens: &[Token]) -> bool { ParseEngine::pulse_all(self, tokens) }
    fn is_accepted(&self) -> bool { ParseEngine::is_accepted(self) }
    fn expected_lexer_rules(&mut self) -> Rc<[&'g LexerRule]> { ParseEngine::expected_lexer_rules(self) }
    fn reset(&mut self) { ParseEngine::reset(self) }
}

#[cfg(test)]
#[path = "tests/earley.rs"]
mod tests_for_earley;
