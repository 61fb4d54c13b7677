use crate::grammar::TokenType;

/// A lexeme handed to the engines. Only the token type takes part in
/// matching; value and position are carried for the caller's benefit.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Token {
    value: String,
    position: usize,
    token_type: TokenType,
}

impl Token {
    pub fn new(value: impl Into<String>, position: usize, token_type: TokenType) -> Self {
        Token { value: value.into(), position, token_type }
    }

    /// A one-character token typed by the character itself, matching
    /// `LexerRule::char`.
    pub fn from_char(c: char, position: usize) -> Self {
        Token::new(c.to_string(), position, TokenType::new(c.to_string()))
    }

    pub fn value(&self) -> &str { &self.value }
    pub fn position(&self) -> usize { self.position }
    pub fn token_type(&self) -> &TokenType { &self.token_type }
}

impl std::fmt::Display for Token {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{:?}@{}:{}", self.value, self.position, self.token_type)
    }
}
