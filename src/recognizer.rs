use std::rc::Rc;

use crate::grammar::{Grammar, LexerRule};
use crate::token::Token;

/// The surface shared by both engines: feed tokens one location at a time and
/// ask whether what has been fed so far is a sentence of the grammar.
pub trait Recognizer<'g> {
    fn grammar(&self) -> &'g Grammar;

    /// Number of tokens consumed so far.
    fn location(&self) -> usize;

    /// Consumes `token`. On `false` the token was rejected and the engine is
    /// left exactly where it was.
    fn pulse(&mut self, token: &Token) -> bool {
        self.pulse_all(std::slice::from_ref(token))
    }

    /// Scans every token in `tokens` as an alternative at the current
    /// location, then advances once. Succeeds if any of them was viable.
    fn pulse_all(&mut self, tokens: &[Token]) -> bool;

    fn is_accepted(&self) -> bool;

    /// Lexer rules that could match the next token, in grammar order.
    fn expected_lexer_rules(&mut self) -> Rc<[&'g LexerRule]>;

    /// Discards all progress and starts over at location zero.
    fn reset(&mut self);

    /// Feeds `tokens` in order, stopping at the first rejection.
    fn recognize(&mut self, tokens: &[Token]) -> bool {
        for token in tokens {
            if !self.pulse(token) {
                return false;
            }
        }
        self.is_accepted()
    }
}
