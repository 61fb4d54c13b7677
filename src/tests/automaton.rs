// This is actually defined at `crate::automaton::tests_for_automaton`

use expect_test::expect;

use super::*;
use crate::rendering::Rendered;
use crate::tests::*;

#[test]
fn straight_line_grammar() {
    let g = two_terminals();
    let pre = PrecomputedGrammar::new(&g);
    expect![[r#"
        f0:
            S -> . 'a' 'b'
            scan a => f1
        f1:
            S -> 'a' . 'b'
            scan b => f2
        f2:
            S -> 'a' 'b' .
    "#]].assert_eq(&pre.rendered());

    assert_eq!(pre.start(), FrameId(0));
    assert_eq!(pre.frame(FrameId(0)).scan_keys(), &[LexerRuleId(0)]);
    assert_eq!(pre.frame(FrameId(1)).scan_keys(), &[LexerRuleId(1)]);
    assert_eq!(pre.frame(FrameId(2)).completed(), &[NonTerminal::new("S")]);
    assert!(pre.frames().iter().all(|f| f.null_transition().is_none()));
}

#[test]
fn nullable_symbols_are_closed_over() {
    let g = nullable();
    let pre = PrecomputedGrammar::new(&g);
    expect![[r#"
        f0:
            S -> . A S
            S -> . A
            S -> A . S
            S -> A .
            S -> A S .
            reduce A => f2
            reduce S => f3
            predict => f1
        f1 (predicted):
            S -> . A S
            S -> . A
            S -> A . S
            S -> A .
            S -> A S .
            A -> .
            reduce A => f2
            reduce S => f3
        f2:
            S -> A . S
            S -> A .
            S -> A S .
            reduce S => f3
            predict => f1
        f3:
            S -> A S .
    "#]].assert_eq(&pre.rendered());

    let predicted = pre.frame(FrameId(1));
    assert!(predicted.is_predicted());
    assert_eq!(predicted.completed(), &[NonTerminal::new("S"), NonTerminal::new("A")]);
}

#[test]
fn transitions_are_keyed_by_token_type() {
    let g = grammar("S", &[("S", "aA"), ("S", "aB"), ("A", "x"), ("B", "y")]);
    let pre = PrecomputedGrammar::new(&g);
    let start = pre.frame(pre.start());
    assert_eq!(start.token_transitions().count(), 1);

    // both alternatives move together on 'a'
    let after_a = start.token_transition(&TokenType::new("a")).unwrap();
    let frame = pre.frame(after_a);
    assert_eq!(frame.rules().len(), 2);
    assert!(frame.reduction(&NonTerminal::new("A")).is_some());
    assert!(frame.reduction(&NonTerminal::new("B")).is_some());
    assert!(frame.token_transition(&TokenType::new("x")).is_none());

    let predicted = pre.frame(frame.null_transition().unwrap());
    assert!(predicted.token_transition(&TokenType::new("x")).is_some());
    assert!(predicted.token_transition(&TokenType::new("y")).is_some());
    assert_eq!(predicted.scan_keys().len(), 2);
}

#[test]
fn equal_kernels_share_a_frame() {
    let g = right_recursive();
    let pre = PrecomputedGrammar::new(&g);
    let start = pre.frame(pre.start());
    let after_a = start.token_transition(&TokenType::new("a")).unwrap();
    let predicted = pre.frame(pre.frame(after_a).null_transition().unwrap());
    assert_eq!(predicted.token_transition(&TokenType::new("a")), Some(after_a));
    assert_eq!(pre.frames().len(), 4);
}

#[test]
fn precomputed_grammar_can_be_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PrecomputedGrammar<'static>>();
    assert_send_sync::<Grammar>();
}
