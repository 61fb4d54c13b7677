//! Table-driven recognition over a `PrecomputedGrammar`.
//!
//! Same chart discipline as the incremental engine, but each chart entry is a
//! whole frame with one origin rather than a single dotted rule. Prediction
//! and empty completions were resolved when the frames were built; what is
//! left at runtime is following token transitions on scan and reduction
//! transitions on completion.

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::automaton::{FrameId, PrecomputedGrammar};
use crate::expected::ExpectedRules;
use crate::forest::ForestNode;
use crate::grammar::{Grammar, LexerRule};
use crate::recognizer::Recognizer;
use crate::token::Token;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct StateFrame {
    frame: FrameId,
    origin: usize,
}

impl StateFrame {
    pub fn new(frame: FrameId, origin: usize) -> Self { StateFrame { frame, origin } }
    pub fn frame(&self) -> FrameId { self.frame }
    pub fn origin(&self) -> usize { self.origin }
}

impl std::fmt::Display for StateFrame {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "({}, {})", self.frame, self.origin)
    }
}

/// Insertion-ordered set of state frames at one location.
#[derive(Default, Debug)]
pub struct StateFrameSet {
    frames: Vec<StateFrame>,
    seen: HashSet<StateFrame>,
}

impl StateFrameSet {
    pub fn enqueue(&mut self, state: StateFrame) -> bool {
        if !self.seen.insert(state) {
            return false;
        }
        self.frames.push(state);
        true
    }

    pub fn contains(&self, state: &StateFrame) -> bool { self.seen.contains(state) }
    pub fn len(&self) -> usize { self.frames.len() }
    pub fn is_empty(&self) -> bool { self.frames.is_empty() }
    pub fn get(&self, index: usize) -> Option<StateFrame> { self.frames.get(index).copied() }
    pub fn iter(&self) -> std::slice::Iter<'_, StateFrame> { self.frames.iter() }
}

#[derive(Default, Debug)]
pub struct StateFrameChart {
    sets: Vec<StateFrameSet>,
}

impl StateFrameChart {
    pub fn new() -> Self { Self::default() }

    pub fn enqueue(&mut self, location: usize, state: StateFrame) -> bool {
        assert!(location <= self.sets.len(), "{location} <= len {}", self.sets.len());
        if location == self.sets.len() {
            self.sets.push(StateFrameSet::default());
        }
        self.sets[location].enqueue(state)
    }

    pub fn len(&self) -> usize { self.sets.len() }
    pub fn is_empty(&self) -> bool { self.sets.is_empty() }
    pub fn get(&self, location: usize) -> Option<&StateFrameSet> { self.sets.get(location) }
    pub fn sets(&self) -> &[StateFrameSet] { &self.sets }

    pub fn total_states(&self) -> usize {
        self.sets.iter().map(StateFrameSet::len).sum()
    }
}

impl std::ops::Index<usize> for StateFrameChart {
    type Output = StateFrameSet;
    fn index(&self, location: usize) -> &StateFrameSet { &self.sets[location] }
}

pub struct DeterministicParseEngine<'g> {
    precomputed: &'g PrecomputedGrammar<'g>,
    chart: StateFrameChart,
    location: usize,
    expected: ExpectedRules<'g>,
}

impl<'g> DeterministicParseEngine<'g> {
    pub fn new(precomputed: &'g PrecomputedGrammar<'g>) -> Self {
        let mut engine = DeterministicParseEngine {
            precomputed,
            chart: StateFrameChart::new(),
            location: 0,
            expected: ExpectedRules::new(precomputed.grammar()),
        };
        engine.initialize();
        engine
    }

    pub fn grammar(&self) -> &'g Grammar { self.precomputed.grammar() }
    pub fn precomputed(&self) -> &'g PrecomputedGrammar<'g> { self.precomputed }
    pub fn chart(&self) -> &StateFrameChart { &self.chart }
    pub fn location(&self) -> usize { self.location }

    fn initialize(&mut self) {
        self.location = 0;
        self.chart = StateFrameChart::new();
        let start = StateFrame::new(self.precomputed.start(), 0);
        self.enqueue(0, start, "start");
        self.reduce(0);
    }

    /// Inserts `state` and, if it is new, the prediction frame hanging off
    /// its null transition.
    fn enqueue(&mut self, location: usize, state: StateFrame, operation: &'static str) {
        if !self.chart.enqueue(location, state) {
            return;
        }
        trace!(location, state = %state, "{}", operation);
        if let Some(null) = self.precomputed.frame(state.frame).null_transition() {
            self.enqueue(location, StateFrame::new(null, location), "predict");
        }
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
        let precomputed = self.precomputed;
        let mut i = 0;
        while let Some(state) = self.chart[location].get(i) {
            i += 1;
            if let Some(target) = precomputed.frame(state.frame).token_transition(token.token_type()) {
                self.enqueue(location + 1, StateFrame::new(target, state.origin), "scan");
            }
        }
    }

    /// Propagates every frame that started before `location` back to the
    /// frames at its origin that were waiting on what it completed.
    fn reduce(&mut self, location: usize) {
        let precomputed = self.precomputed;
        let mut i = 0;
        while let Some(state) = self.chart[location].get(i) {
            i += 1;
            if state.origin == location {
                continue;
            }
            for symbol in precomputed.frame(state.frame).completed() {
                let mut p = 0;
                while let Some(parent) = self.chart[state.origin].get(p) {
                    p += 1;
                    if let Some(target) = precomputed.frame(parent.frame).reduction(symbol) {
                        self.enqueue(location, StateFrame::new(target, parent.origin), "complete");
                    }
                }
            }
        }
    }

    pub fn is_accepted(&self) -> bool {
        let precomputed = self.precomputed;
        let start = precomputed.grammar().start();
        self.chart.get(self.location).map_or(false, |set| {
            set.iter().any(|s| s.origin == 0 && precomputed.frame(s.frame).completed().contains(start))
        })
    }

    /// Frames summarize derivations away, so there is nothing to hand a
    /// forest builder. Calling this is a bug in the caller.
    #[track_caller]
    pub fn parse_forest_root(&self) -> Option<ForestNode> {
        panic!("the deterministic engine is a recognizer only and builds no parse forest; use ParseEngine")
    }

    pub fn expected_lexer_rules(&mut self) -> Rc<[&'g LexerRule]> {
        let precomputed = self.precomputed;
        let keys = self.chart.get(self.location)
            .into_iter()
            .flat_map(|set| set.iter())
            .flat_map(|s| precomputed.frame(s.frame).scan_keys().iter().copied());
        self.expected.collect(keys)
    }

    pub fn reset(&mut self) {
        debug!(location = self.location, "reset");
        self.initialize();
    }
}

impl<'g> Recognizer<'g> for DeterministicParseEngine<'g> {
    fn grammar(&self) -> &'g Grammar { self.precomputed.grammar() }
    fn location(&self) -> usize { self.location }
    fn pulse(&mut self, token: &Token) -> bool { DeterministicParseEngine::pulse(self, token) }
    fn pulse_all(&mut self, tokens: &[Token]) -> bool { DeterministicParseEngine::pulse_all(self, tokens) }
    fn is_accepted(&self) -> bool { DeterministicParseEngine::is_accepted(self) }
    fn expected_lexer_rules(&mut self) -> Rc<[&'g LexerRule]> { DeterministicParseEngine::expected_lexer_rules(self) }
    fn reset(&mut self) { DeterministicParseEngine::reset(self) }
}

#[cfg(test)]
#[path = "tests/deterministic.rs"]
mod tests_for_deterministic;
