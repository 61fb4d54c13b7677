//! Earley sets and the chart that strings them together.
//!
//! Each set splits its states into four queues, chosen when a state is
//! inserted:
//!
//! * predictions: incomplete, post-dot symbol is a non-terminal
//! * scans: incomplete, post-dot symbol is a terminal
//! * completions: complete, normal
//! * transitions: complete, transitive (Leo items)
//!
//! Queues only grow. The reduction loop walks them with cursors and keeps
//! going as long as new entries show up behind those cursors.

use std::collections::{HashMap, HashSet};

use crate::dotted_rule::DottedRuleRegistry;
use crate::grammar::{NonTerminal, Symbol};
use crate::state::State;

/// Insertion-ordered set of states.
#[derive(Default, Debug)]
pub struct StateQueue {
    states: Vec<State>,
    seen: HashSet<State>,
}

impl StateQueue {
    pub fn new() -> Self { Self::default() }

    /// Returns false, leaving the queue as it was, when an equal state is
    /// already present.
    pub fn enqueue(&mut self, state: State) -> bool {
        if self.seen.contains(&state) {
            return false;
        }
        self.seen.insert(state.clone());
        self.states.push(state);
        true
    }

    pub fn contains(&self, state: &State) -> bool { self.seen.contains(state) }
    pub fn len(&self) -> usize { self.states.len() }
    pub fn is_empty(&self) -> bool { self.states.is_empty() }
    pub fn get(&self, index: usize) -> Option<&State> { self.states.get(index) }
    pub fn iter(&self) -> std::slice::Iter<'_, State> { self.states.iter() }
}

impl std::ops::Index<usize> for StateQueue {
    type Output = State;
    fn index(&self, index: usize) -> &State { &self.states[index] }
}

impl<'a> IntoIterator for &'a StateQueue {
    type Item = &'a State;
    type IntoIter = std::slice::Iter<'a, State>;
    fn into_iter(self) -> Self::IntoIter { self.states.iter() }
}

#[derive(Debug)]
pub struct EarleySet {
    location: usize,
    predictions: StateQueue,
    scans: StateQueue,
    completions: StateQueue,
    transitions: StateQueue,
    // indices into `predictions`, keyed by post-dot non-terminal
    waiting: HashMap<NonTerminal, Vec<usize>>,
    // index into `transitions`, keyed by recognized non-terminal
    transition_index: HashMap<NonTerminal, usize>,
}

impl EarleySet {
    pub fn new(location: usize) -> Self {
        EarleySet {
            location,
            predictions: StateQueue::new(),
            scans: StateQueue::new(),
            completions: StateQueue::new(),
            transitions: StateQueue::new(),
            waiting: HashMap::new(),
            transition_index: HashMap::new(),
        }
    }

    /// The dotted rule of `state`, looked up in `registry`, decides which
    /// queue the state lands in.
    pub fn enqueue(&mut self, state: State, registry: &DottedRuleRegistry<'_>) -> bool {
        let rule = registry.rule(state.rule());
        debug_assert!(!state.is_transitive() || rule.is_complete(),
                      "transitive state over incomplete rule {}", registry.display(state.rule()));
        match rule.post_dot_symbol() {
            Some(Symbol::NonTerminal(nt)) => {
                let index = self.predictions.len();
                if !self.predictions.enqueue(state) {
                    return false;
                }
                self.waiting.entry(nt.clone()).or_default().push(index);
                true
            }
            Some(Symbol::Terminal(_)) => self.scans.enqueue(state),
            None => match state.recognized().cloned() {
                Some(recognized) => {
                    let index = self.transitions.len();
                    if !self.transitions.enqueue(state) {
                        return false;
                    }
                    self.transition_index.entry(recognized).or_insert(index);
                    true
                }
                None => self.completions.enqueue(state),
            },
        }
    }

    pub fn location(&self) -> usize { self.location }
    pub fn predictions(&self) -> &StateQueue { &self.predictions }
    pub fn scans(&self) -> &StateQueue { &self.scans }
    pub fn completions(&self) -> &StateQueue { &self.completions }
    pub fn transitions(&self) -> &StateQueue { &self.transitions }

    pub fn len(&self) -> usize {
        self.predictions.len() + self.scans.len() + self.completions.len() + self.transitions.len()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// All states, queue by queue.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.predictions.iter()
            .chain(self.scans.iter())
            .chain(self.completions.iter())
            .chain(self.transitions.iter())
    }

    pub fn find_transition(&self, recognized: &NonTerminal) -> Option<&State> {
        self.transition_index.get(recognized).map(|&i| &self.transitions[i])
    }

    /// The `index`th incomplete state whose post-dot symbol is `symbol`.
    pub fn waiting_for(&self, symbol: &NonTerminal, index: usize) -> Option<&State> {
        let indices = self.waiting.get(symbol)?;
        indices.get(index).map(|&i| &self.predictions[i])
    }

    pub fn waiting_count(&self, symbol: &NonTerminal) -> usize {
        self.waiting.get(symbol).map_or(0, Vec::len)
    }

    /// The one state waiting on `symbol`, if there is exactly one.
    pub fn unique_waiting(&self, symbol: &NonTerminal) -> Option<&State> {
        match self.waiting.get(symbol).map(|v| &v[..]) {
            Some(&[i]) => Some(&self.predictions[i]),
            _ => None,
        }
    }
}

/// One Earley set per consumed token, plus the initial set.
#[derive(Default, Debug)]
pub struct Chart {
    sets: Vec<EarleySet>,
}

impl Chart {
    pub fn new() -> Self { Self::default() }

    /// Creates the set at `location` on first use. Sets are only ever added
    /// at the end, so `location` may not skip past `len()`.
    pub fn enqueue(&mut self, location: usize, state: State, registry: &DottedRuleRegistry<'_>) -> bool {
        assert!(location <= self.sets.len(), "{location} <= len {}", self.sets.len());
        if location == self.sets.len() {
            self.sets.push(EarleySet::new(location));
        }
        self.sets[location].enqueue(state, registry)
    }

    pub fn len(&self) -> usize { self.sets.len() }
    pub fn is_empty(&self) -> bool { self.sets.is_empty() }
    pub fn get(&self, location: usize) -> Option<&EarleySet> { self.sets.get(location) }
    pub fn sets(&self) -> &[EarleySet] { &self.sets }

    pub fn total_states(&self) -> usize {
        self.sets.iter().map(EarleySet::len).sum()
    }
}

impl std::ops::Index<usize> for Chart {
    type Output = EarleySet;
    fn index(&self, location: usize) -> &EarleySet { &self.sets[location] }
}

#[cfg(test)]
#[path = "tests/chart.rs"]
mod tests_for_chart;
