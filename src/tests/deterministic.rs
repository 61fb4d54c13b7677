// This is actually defined at `crate::deterministic::tests_for_deterministic`

use expect_test::expect;
use proptest::prelude::*;

use super::*;
use crate::earley::ParseEngine;
use crate::grammar::{Production, LexerRule};
use crate::options::ParseEngineOptions;
use crate::rendering::Rendered;
use crate::tests::*;

fn feed(engine: &mut DeterministicParseEngine<'_>, s: &str) -> bool {
    input(s).iter().all(|t| engine.pulse(t))
}

#[test]
fn two_terminals_accepts_after_second_pulse() {
    let g = two_terminals();
    let pre = PrecomputedGrammar::new(&g);
    let mut engine = DeterministicParseEngine::new(&pre);
    assert!(feed(&mut engine, "a"));
    assert!(!engine.is_accepted());
    assert!(feed(&mut engine, "b"));
    assert!(engine.is_accepted());
    assert!(!engine.pulse(&Token::from_char('a', 2)));
    assert_eq!(engine.location(), 2);

    expect![[r#"
        == 0 ==
        (f0, 0)
        == 1 ==
        (f1, 0)
        == 2 ==
        (f2, 0)
    "#]].assert_eq(&engine.rendered());
}

#[test]
fn right_recursion_accepts_every_prefix() {
    let g = grammar("S", &[("S", "aS"), ("S", "a")]);
    let pre = PrecomputedGrammar::new(&g);
    let mut engine = DeterministicParseEngine::new(&pre);
    for token in input("aaaa") {
        assert!(engine.pulse(&token));
        assert!(engine.is_accepted());
    }
}

#[test]
fn rejected_token_leaves_location_alone() {
    let g = alternation();
    let pre = PrecomputedGrammar::new(&g);
    let mut engine = DeterministicParseEngine::new(&pre);
    assert!(!engine.pulse(&Token::from_char('c', 0)));
    assert_eq!(engine.location(), 0);
    assert_eq!(engine.chart().len(), 1);
}

#[test]
fn nullable_grammar_accepts_empty_input() {
    let g = nullable();
    let pre = PrecomputedGrammar::new(&g);
    let engine = DeterministicParseEngine::new(&pre);
    assert!(engine.is_accepted());
    // start frame and its prediction frame
    assert_eq!(engine.chart()[0].len(), 2);
}

#[test]
fn arithmetic_expressions() {
    let g = arithmetic();
    let pre = PrecomputedGrammar::new(&g);
    let mut engine = DeterministicParseEngine::new(&pre);
    assert!(feed(&mut engine, "(-n+n)*n"));
    assert!(engine.is_accepted());
    engine.reset();
    assert_eq!(engine.location(), 0);
    assert!(feed(&mut engine, "(n+"));
    assert!(!engine.is_accepted());
    assert!(!feed(&mut engine, ")"));
    assert_eq!(engine.location(), 3);
}

#[test]
fn one_precomputed_grammar_many_engines() {
    let g = right_recursive();
    let pre = PrecomputedGrammar::new(&g);
    let mut short = DeterministicParseEngine::new(&pre);
    let mut long = DeterministicParseEngine::new(&pre);
    assert!(feed(&mut short, "a"));
    assert!(feed(&mut long, "aaaaaaaa"));
    assert!(short.is_accepted());
    assert!(long.is_accepted());
    assert_eq!(short.location(), 1);
    assert_eq!(long.location(), 8);
}

#[test]
fn expected_lexer_rules_follow_grammar_order() {
    let digit = LexerRule::range('0', '9');
    let g = Grammar::new("S", vec![
        Production::new("S", vec!["S".into(), '+'.into(), digit.clone().into()]),
        Production::new("S", vec![digit.clone().into()]),
    ]).unwrap();
    let pre = PrecomputedGrammar::new(&g);
    let mut engine = DeterministicParseEngine::new(&pre);

    let rules = engine.expected_lexer_rules();
    assert_eq!(&rules[..], &[&digit]);
    assert!(Rc::ptr_eq(&rules, &engine.expected_lexer_rules()));

    assert!(engine.pulse(&digit.token_for('1', 0).unwrap()));
    assert_eq!(&engine.expected_lexer_rules()[..], &[&LexerRule::char('+')]);
    assert!(engine.pulse(&Token::from_char('+', 1)));
    assert!(Rc::ptr_eq(&rules, &engine.expected_lexer_rules()));
}

#[test]
#[should_panic(expected = "recognizer only")]
fn no_parse_forest() {
    let g = two_terminals();
    let pre = PrecomputedGrammar::new(&g);
    let engine = DeterministicParseEngine::new(&pre);
    engine.parse_forest_root();
}

fn recognize(recognizer: &mut dyn Recognizer<'_>, s: &str) -> bool {
    recognizer.reset();
    recognizer.recognize(&input(s))
}

#[test]
fn both_engines_behind_one_trait() {
    let g = arithmetic();
    let pre = PrecomputedGrammar::new(&g);
    let mut engines: Vec<Box<dyn Recognizer<'_> + '_>> = vec![
        Box::new(ParseEngine::new(&g)),
        Box::new(DeterministicParseEngine::new(&pre)),
    ];
    for engine in &mut engines {
        assert!(recognize(&mut **engine, "n*(n+-n)"));
        assert!(!recognize(&mut **engine, "n+*n"));
        assert_eq!(engine.location(), 2);
        assert!(!recognize(&mut **engine, ""));
        assert_eq!(engine.location(), 0);
    }
}

fn expected(recognizer: &mut dyn Recognizer<'_>) -> Vec<LexerRule> {
    recognizer.expected_lexer_rules().iter().map(|&rule| rule.clone()).collect()
}

fn right_side() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![Just('S'), Just('A'), Just('B'), Just('a'), Just('b')],
        0..=3,
    ).prop_map(|symbols| symbols.into_iter().collect())
}

/// Every non-terminal gets at least one production, so the grammar is valid.
fn grammar_rules() -> impl Strategy<Value = Vec<(String, String)>> {
    let extra = proptest::collection::vec((0usize..3, right_side()), 0..4);
    (right_side(), right_side(), right_side(), extra).prop_map(|(s, a, b, extra)| {
        let names = ["S", "A", "B"];
        let mut rules = vec![("S".to_string(), s), ("A".to_string(), a), ("B".to_string(), b)];
        rules.extend(extra.into_iter().map(|(i, rhs)| (names[i].to_string(), rhs)));
        rules
    })
}

proptest! {
    #[test]
    fn engines_agree(rules in grammar_rules(), text in "[ab]{0,6}") {
        let rules: Vec<(&str, &str)> = rules.iter().map(|(l, r)| (l.as_str(), r.as_str())).collect();
        let g = grammar("S", &rules);
        let pre = PrecomputedGrammar::new(&g);
        let mut leo = ParseEngine::new(&g);
        let mut plain = ParseEngine::with_options(
            &g, ParseEngineOptions::new().with_right_recursion_optimization(false));
        let mut frames = DeterministicParseEngine::new(&pre);

        let viable = expected(&mut leo);
        prop_assert_eq!(expected(&mut plain), viable.clone());
        prop_assert_eq!(expected(&mut frames), viable);
        prop_assert_eq!(leo.is_accepted(), plain.is_accepted());
        prop_assert_eq!(leo.is_accepted(), frames.is_accepted());

        for token in input(&text) {
            let consumed = leo.pulse(&token);
            prop_assert_eq!(plain.pulse(&token), consumed);
            prop_assert_eq!(frames.pulse(&token), consumed);
            if !consumed {
                break;
            }
            let viable = expected(&mut leo);
            prop_assert_eq!(expected(&mut plain), viable.clone());
            prop_assert_eq!(expected(&mut frames), viable);
            prop_assert_eq!(leo.is_accepted(), plain.is_accepted());
            prop_assert_eq!(leo.is_accepted(), frames.is_accepted());
        }
        prop_assert_eq!(leo.location(), frames.location());
    }

    #[test]
    fn reset_replays_identically(rules in grammar_rules(), text in "[ab]{0,6}") {
        let rules: Vec<(&str, &str)> = rules.iter().map(|(l, r)| (l.as_str(), r.as_str())).collect();
        let g = grammar("S", &rules);
        let pre = PrecomputedGrammar::new(&g);
        let mut engine = DeterministicParseEngine::new(&pre);
        let tokens = input(&text);
        let first = engine.recognize(&tokens);
        let first_location = engine.location();
        engine.reset();
        prop_assert_eq!(engine.recognize(&tokens), first);
        prop_assert_eq!(engine.location(), first_location);
    }
}
