// This is actually defined at `crate::chart::tests_for_chart`

use std::collections::HashSet;

use proptest::prelude::*;

use super::*;
use crate::grammar::ProductionId;
use crate::state::StateFactory;
use crate::tests::*;

#[test]
fn states_land_in_the_queue_matching_their_shape() {
    let g = right_recursive();
    let mut factory = StateFactory::new(&g);
    let mut set = EarleySet::new(0);

    let scan = factory.new_state(ProductionId(0), 0, 0);
    let predict = factory.new_state(ProductionId(0), 1, 0);
    let complete = factory.new_state(ProductionId(0), 2, 0);
    let transition = factory.transition_state("A".into(), complete.rule(), 0);

    for state in [&scan, &predict, &complete, &transition] {
        assert!(set.enqueue(state.clone(), factory.registry()));
    }

    assert_eq!(set.scans().iter().collect::<Vec<_>>(), [&scan]);
    assert_eq!(set.predictions().iter().collect::<Vec<_>>(), [&predict]);
    assert_eq!(set.completions().iter().collect::<Vec<_>>(), [&complete]);
    assert_eq!(set.transitions().iter().collect::<Vec<_>>(), [&transition]);
    assert_eq!(set.len(), 4);
    assert_eq!(set.states().count(), 4);
}

#[test]
fn enqueue_is_idempotent() {
    let g = two_terminals();
    let mut factory = StateFactory::new(&g);
    let mut set = EarleySet::new(0);
    let state = factory.new_state(ProductionId(0), 0, 0);
    assert!(set.enqueue(state.clone(), factory.registry()));
    assert!(!set.enqueue(state.clone(), factory.registry()));
    assert_eq!(set.len(), 1);
    assert!(set.scans().contains(&state));
}

#[test]
fn waiting_index() {
    let g = grammar("S", &[("S", "aA"), ("S", "Ab"), ("S", "B"), ("A", "a"), ("B", "b")]);
    let mut factory = StateFactory::new(&g);
    let mut set = EarleySet::new(1);

    let first = factory.new_state(ProductionId(0), 1, 0);
    let second = factory.new_state(ProductionId(1), 0, 1);
    let other = factory.new_state(ProductionId(2), 0, 1);
    for state in [&first, &second, &other] {
        set.enqueue(state.clone(), factory.registry());
    }

    let a = NonTerminal::new("A");
    let b = NonTerminal::new("B");
    assert_eq!(set.waiting_for(&a, 0), Some(&first));
    assert_eq!(set.waiting_for(&a, 1), Some(&second));
    assert_eq!(set.waiting_for(&a, 2), None);
    assert_eq!(set.waiting_count(&a), 2);
    assert_eq!(set.unique_waiting(&a), None);
    assert_eq!(set.unique_waiting(&b), Some(&other));
    assert_eq!(set.unique_waiting(&NonTerminal::new("S")), None);
}

#[test]
fn queue_follows_the_registry_not_the_caller() {
    let g = right_recursive();
    let mut factory = StateFactory::new(&g);
    let mut set = EarleySet::new(0);
    let complete = factory.new_state(ProductionId(1), 1, 0);
    let transition = factory.transition_state("A".into(), complete.rule(), 0);
    assert!(set.enqueue(transition.clone(), factory.registry()));
    assert!(set.predictions().is_empty());
    assert_eq!(set.transitions().iter().collect::<Vec<_>>(), [&transition]);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "transitive state over incomplete rule A -> 'a' . A")]
fn transitive_state_must_be_complete() {
    let g = right_recursive();
    let mut factory = StateFactory::new(&g);
    let mut set = EarleySet::new(0);
    let incomplete = factory.new_state(ProductionId(0), 1, 0);
    let transition = factory.transition_state("A".into(), incomplete.rule(), 0);
    set.enqueue(transition, factory.registry());
}

#[test]
fn first_transition_per_symbol_is_indexed() {
    let g = right_recursive();
    let mut factory = StateFactory::new(&g);
    let mut set = EarleySet::new(0);
    let long = factory.new_state(ProductionId(0), 2, 0);
    let short = factory.new_state(ProductionId(1), 1, 0);
    let first = factory.transition_state("A".into(), long.rule(), 0);
    let second = factory.transition_state("A".into(), short.rule(), 0);
    set.enqueue(first.clone(), factory.registry());
    set.enqueue(second.clone(), factory.registry());
    assert_eq!(set.find_transition(&NonTerminal::new("A")), Some(&first));
    assert_eq!(set.find_transition(&NonTerminal::new("B")), None);
}

#[test]
fn chart_creates_sets_on_demand() {
    let g = two_terminals();
    let mut factory = StateFactory::new(&g);
    let mut chart = Chart::new();
    assert!(chart.is_empty());
    let state = factory.new_state(ProductionId(0), 0, 0);
    assert!(chart.enqueue(0, state.clone(), factory.registry()));
    assert!(chart.enqueue(1, state.clone(), factory.registry()));
    assert!(!chart.enqueue(1, state, factory.registry()));
    assert_eq!(chart.len(), 2);
    assert_eq!(chart[1].location(), 1);
    assert_eq!(chart.total_states(), 2);
}

#[test]
#[should_panic(expected = "<= len")]
fn chart_cannot_skip_a_location() {
    let g = two_terminals();
    let mut factory = StateFactory::new(&g);
    let mut chart = Chart::new();
    let state = factory.new_state(ProductionId(0), 0, 0);
    chart.enqueue(1, state, factory.registry());
}

proptest! {
    #[test]
    fn enqueue_twice_adds_at_most_once(
        picks in proptest::collection::vec((0usize..4, 0usize..3, 0usize..3), 0..40)
    ) {
        let g = arithmetic();
        let mut factory = StateFactory::new(&g);
        let mut set = EarleySet::new(3);
        let mut distinct = HashSet::new();
        for (production, position, origin) in picks {
            let len = g.production(ProductionId(production)).rhs().len();
            let state = factory.new_state(ProductionId(production), position.min(len), origin);
            let fresh = distinct.insert(state.clone());
            let before = set.len();
            prop_assert_eq!(set.enqueue(state.clone(), factory.registry()), fresh);
            prop_assert!(!set.enqueue(state, factory.registry()));
            prop_assert_eq!(set.len(), before + usize::from(fresh));
        }
        prop_assert_eq!(set.len(), distinct.len());
    }
}
