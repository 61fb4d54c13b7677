use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use derive_more::Display;

use crate::token::Token;

// A grammar G is a tuple (Sigma, Delta, A_0, R), where
//   Sigma is a finite set of lexer rules (terminals classified by token type)
//   Delta is a finite set of non-terminals
//   A_0 in Delta is the start non-terminal, and
//   R is a finite list of productions A ::= X_1 ... X_n, with A in Delta and
//     each X_i drawn from Sigma or Delta. (n may be zero.)

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Debug, Display)]
#[display(fmt = "{}", _0)]
pub struct NonTerminal(Arc<str>);

impl NonTerminal {
    pub fn new(name: impl AsRef<str>) -> Self { NonTerminal(name.as_ref().into()) }
    pub fn name(&self) -> &str { &self.0 }
}

/// Classifies tokens. A scan succeeds when the post-dot lexer rule and the
/// token agree on their token type.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Debug, Display)]
#[display(fmt = "{}", _0)]
pub struct TokenType(Arc<str>);

impl TokenType {
    pub fn new(name: impl AsRef<str>) -> Self { TokenType(name.as_ref().into()) }
    pub fn name(&self) -> &str { &self.0 }
}

/// Character-level matcher. The engines never evaluate these; they exist for
/// whatever tokenizer sits in front of the engine.
#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub enum Terminal {
    Char(char),
    Range(char, char),
    Set(Arc<[char]>),
    Any,
}

impl Terminal {
    pub fn is_match(&self, c: char) -> bool {
        match self {
            Terminal::Char(d) => c == *d,
            Terminal::Range(from, to) => (*from..=*to).contains(&c),
            Terminal::Set(chars) => chars.contains(&c),
            Terminal::Any => true,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct LexerRule {
    token_type: TokenType,
    terminal: Terminal,
}

impl LexerRule {
    pub fn new(token_type: TokenType, terminal: Terminal) -> Self {
        LexerRule { token_type, terminal }
    }

    /// A single character; its token type is the character itself, which is
    /// what `Token::from_char` produces.
    pub fn char(c: char) -> Self {
        Self::new(TokenType::new(c.to_string()), Terminal::Char(c))
    }

    pub fn range(from: char, to: char) -> Self {
        Self::new(TokenType::new(format!("[{}-{}]", from, to)), Terminal::Range(from, to))
    }

    pub fn set(chars: &str) -> Self {
        Self::new(TokenType::new(format!("[{}]", chars)), Terminal::Set(chars.chars().collect()))
    }

    pub fn any() -> Self {
        Self::new(TokenType::new("."), Terminal::Any)
    }

    pub fn token_type(&self) -> &TokenType { &self.token_type }
    pub fn terminal(&self) -> &Terminal { &self.terminal }
    pub fn is_match(&self, c: char) -> bool { self.terminal.is_match(c) }

    /// Classifies `c` as a token of this rule, if the rule accepts it.
    pub fn token_for(&self, c: char, position: usize) -> Option<Token> {
        if self.is_match(c) {
            Some(Token::new(c.to_string(), position, self.token_type.clone()))
        } else {
            None
        }
    }
}

#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub enum Symbol {
    Terminal(LexerRule),
    NonTerminal(NonTerminal),
}

impl Symbol {
    pub fn as_nonterminal(&self) -> Option<&NonTerminal> {
        if let Symbol::NonTerminal(nt) = self { Some(nt) } else { None }
    }
    pub fn as_lexer_rule(&self) -> Option<&LexerRule> {
        if let Symbol::Terminal(rule) = self { Some(rule) } else { None }
    }
}

impl From<&str> for NonTerminal { fn from(a: &str) -> Self { NonTerminal::new(a) } }
impl From<&str> for TokenType { fn from(a: &str) -> Self { TokenType::new(a) } }
impl From<char> for Symbol { fn from(c: char) -> Self { Symbol::Terminal(LexerRule::char(c)) } }
impl From<&str> for Symbol { fn from(a: &str) -> Self { Symbol::NonTerminal(a.into()) } }
impl From<LexerRule> for Symbol { fn from(r: LexerRule) -> Self { Symbol::Terminal(r) } }
impl From<NonTerminal> for Symbol { fn from(nt: NonTerminal) -> Self { Symbol::NonTerminal(nt) } }

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
#[display(fmt = "p{}", _0)]
pub struct ProductionId(pub(crate) usize);

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
#[display(fmt = "l{}", _0)]
pub struct LexerRuleId(pub(crate) usize);

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Production {
    lhs: NonTerminal,
    rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: impl Into<NonTerminal>, rhs: impl IntoIterator<Item = Symbol>) -> Self {
        Production { lhs: lhs.into(), rhs: rhs.into_iter().collect() }
    }

    pub fn lhs(&self) -> &NonTerminal { &self.lhs }
    pub fn rhs(&self) -> &[Symbol] { &self.rhs }
    pub fn is_empty(&self) -> bool { self.rhs.is_empty() }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("start symbol `{0}` has no productions")]
    NoStartProductions(NonTerminal),
    #[error("a production for `{lhs}` refers to `{symbol}`, which has no productions")]
    UndefinedNonTerminal { lhs: NonTerminal, symbol: NonTerminal },
}

/// Immutable once built; engines borrow it, so any number of them can share
/// one grammar.
#[derive(Debug)]
pub struct Grammar {
    start: NonTerminal,
    productions: Vec<Production>,
    rules_for: HashMap<NonTerminal, Vec<ProductionId>>,
    nullable: HashSet<NonTerminal>,
    lexer_rules: Vec<LexerRule>,
    lexer_rule_ids: HashMap<LexerRule, LexerRuleId>,
    ignore_rules: Vec<LexerRule>,
}

impl Grammar {
    pub fn new(start: impl Into<NonTerminal>, productions: Vec<Production>) -> Result<Self, GrammarError> {
        let start = start.into();

        let mut rules_for: HashMap<NonTerminal, Vec<ProductionId>> = HashMap::new();
        for (i, p) in productions.iter().enumerate() {
            rules_for.entry(p.lhs.clone()).or_default().push(ProductionId(i));
        }

        if !rules_for.contains_key(&start) {
            return Err(GrammarError::NoStartProductions(start));
        }

        let mut lexer_rules = Vec::new();
        let mut lexer_rule_ids = HashMap::new();
        for p in &productions {
            for symbol in &p.rhs {
                match symbol {
                    Symbol::NonTerminal(nt) if !rules_for.contains_key(nt) => {
                        return Err(GrammarError::UndefinedNonTerminal {
                            lhs: p.lhs.clone(),
                            symbol: nt.clone(),
                        });
                    }
                    Symbol::NonTerminal(_) => {}
                    Symbol::Terminal(rule) => {
                        if !lexer_rule_ids.contains_key(rule) {
                            lexer_rule_ids.insert(rule.clone(), LexerRuleId(lexer_rules.len()));
                            lexer_rules.push(rule.clone());
                        }
                    }
                }
            }
        }

        let nullable = nullable_nonterminals(&productions);

        Ok(Grammar {
            start,
            productions,
            rules_for,
            nullable,
            lexer_rules,
            lexer_rule_ids,
            ignore_rules: Vec::new(),
        })
    }

    /// Rules a tokenizer should skip between tokens. The engines ignore them.
    pub fn with_ignore_rules(mut self, rules: impl IntoIterator<Item = LexerRule>) -> Self {
        self.ignore_rules.extend(rules);
        self
    }

    pub fn start(&self) -> &NonTerminal { &self.start }

    pub fn start_productions(&self) -> &[ProductionId] {
        self.rules_for(&self.start)
    }

    pub fn productions(&self) -> &[Production] { &self.productions }

    pub fn production(&self, id: ProductionId) -> &Production { &self.productions[id.0] }

    pub fn rules_for(&self, nonterm: &NonTerminal) -> &[ProductionId] {
        self.rules_for.get(nonterm).map(|v| &v[..]).unwrap_or(&[])
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = &NonTerminal> {
        self.rules_for.keys()
    }

    pub fn is_nullable(&self, nonterm: &NonTerminal) -> bool {
        self.nullable.contains(nonterm)
    }

    /// Every lexer rule referenced by a production, in order of first use.
    pub fn lexer_rules(&self) -> &[LexerRule] { &self.lexer_rules }

    pub fn lexer_rule(&self, id: LexerRuleId) -> &LexerRule { &self.lexer_rules[id.0] }

    pub fn lexer_rule_id(&self, rule: &LexerRule) -> Option<LexerRuleId> {
        self.lexer_rule_ids.get(rule).copied()
    }

    pub fn ignore_rules(&self) -> &[LexerRule] { &self.ignore_rules }
}

// A non-terminal is nullable when one of its productions consists solely of
// nullable non-terminals (vacuously so for an empty right side). Iterate to a
// fixed point.
fn nullable_nonterminals(productions: &[Production]) -> HashSet<NonTerminal> {
    let mut nullable = HashSet::new();
    loop {
        let mut changed = false;
        for p in productions {
            if nullable.contains(&p.lhs) {
                continue;
            }
            let all_nullable = p.rhs.iter().all(|s| match s {
                Symbol::NonTerminal(nt) => nullable.contains(nt),
                Symbol::Terminal(_) => false,
            });
            if all_nullable {
                nullable.insert(p.lhs.clone());
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

// This is a trick: we have the source code for our tests under a single
// `src/tests/` subdirectory, but we declare it as a module *here*, under this
// module. That way, it has access to private constructors and state that a
// sibling (or in this case, nibling) module would not have access to.
#[cfg(test)]
#[path = "tests/grammar.rs"]
mod tests_for_grammar;
