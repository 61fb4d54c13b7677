//! Incremental Earley recognition for arbitrary context-free grammars.
//!
//! Two engines share one surface (`Recognizer`):
//!
//! * `ParseEngine` keeps a full Earley chart, one set per consumed token, and
//!   applies Leo's optimization so right recursion stays linear. It reports
//!   every dot advance to a `ForestHook`, so a forest builder can sit on top.
//!
//! * `DeterministicParseEngine` runs over a `PrecomputedGrammar`, where
//!   prediction and empty completions have been compiled into frames ahead of
//!   time. It accepts exactly the same inputs but only recognizes.
//!
//! Both are fed one token at a time with `pulse`; a `false` result means the
//! token was rejected and nothing changed.
//!
//! ```
//! use earleme::{Grammar, Production, ParseEngine, Token};
//!
//! let grammar = Grammar::new("S", vec![
//!     Production::new("S", vec!['a'.into(), "S".into()]),
//!     Production::new("S", vec!['a'.into()]),
//! ]).unwrap();
//!
//! let mut engine = ParseEngine::new(&grammar);
//! assert!(engine.pulse(&Token::from_char('a', 0)));
//! assert!(engine.is_accepted());
//! assert!(!engine.pulse(&Token::from_char('b', 1)));
//! assert_eq!(engine.location(), 1);
//! ```

pub mod automaton;
pub mod chart;
pub mod deterministic;
pub mod dotted_rule;
pub mod earley;
pub mod forest;
pub mod grammar;
pub mod options;
pub mod recognizer;
pub mod state;
pub mod token;

mod display;
mod expected;
mod rendering;

pub use automaton::{Frame, FrameId, PrecomputedGrammar};
pub use deterministic::{DeterministicParseEngine, StateFrame};
pub use display::{DisplayRule, DisplayState};
pub use dotted_rule::{DottedRule, DottedRuleId, DottedRuleRegistry};
pub use earley::ParseEngine;
pub use forest::{AttachEvent, Child, ForestHook, ForestNode, NoForest};
pub use grammar::{Grammar, GrammarError, LexerRule, LexerRuleId, NonTerminal, Production, ProductionId, Symbol, Terminal, TokenType};
pub use options::ParseEngineOptions;
pub use recognizer::Recognizer;
pub use rendering::Rendered;
pub use state::{State, StateKind};
pub use token::Token;
