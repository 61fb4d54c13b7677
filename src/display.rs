use crate::dotted_rule::{DottedRuleId, DottedRuleRegistry};
use crate::grammar::{LexerRule, Production, Symbol, Terminal};
use crate::state::{State, StateKind};

impl std::fmt::Display for Terminal {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Terminal::Char(c) => write!(w, "{:?}", c),
            Terminal::Range(from, to) => write!(w, "[{}-{}]", from, to),
            Terminal::Set(chars) => {
                let chars: String = chars.iter().collect();
                write!(w, "[{}]", chars)
            }
            Terminal::Any => write!(w, "."),
        }
    }
}

impl std::fmt::Display for LexerRule {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{}", self.terminal())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Symbol::Terminal(rule) => write!(w, "{}", rule),
            Symbol::NonTerminal(nt) => write!(w, "{}", nt),
        }
    }
}

impl std::fmt::Display for Production {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{} ->", self.lhs())?;
        for symbol in self.rhs() {
            write!(w, " {}", symbol)?;
        }
        Ok(())
    }
}

/// `S -> 'a' . S`
pub struct DisplayRule<'a, 'g> {
    registry: &'a DottedRuleRegistry<'g>,
    id: DottedRuleId,
}

impl std::fmt::Display for DisplayRule<'_, '_> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        let rule = self.registry.rule(self.id);
        let production = self.registry.grammar().production(rule.production());
        write!(w, "{} ->", production.lhs())?;
        for (i, symbol) in production.rhs().iter().enumerate() {
            if i == rule.position() {
                write!(w, " .")?;
            }
            write!(w, " {}", symbol)?;
        }
        if rule.is_complete() {
            write!(w, " .")?;
        }
        Ok(())
    }
}

/// `(S -> 'a' . S, 0)`, or `S : (S -> 'a' S ., 0)` for a transitive state.
pub struct DisplayState<'a, 'g> {
    registry: &'a DottedRuleRegistry<'g>,
    state: &'a State,
}

impl std::fmt::Display for DisplayState<'_, '_> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        let rule = DisplayRule { registry: self.registry, id: self.state.rule() };
        match self.state.kind() {
            StateKind::Normal => write!(w, "({}, {})", rule, self.state.origin()),
            StateKind::Transitive { recognized } => {
                write!(w, "{} : ({}, {})", recognized, rule, self.state.origin())
            }
        }
    }
}

impl<'g> DottedRuleRegistry<'g> {
    pub fn display(&self, id: DottedRuleId) -> DisplayRule<'_, 'g> {
        DisplayRule { registry: self, id }
    }

    pub fn display_state<'a>(&'a self, state: &'a State) -> DisplayState<'a, 'g> {
        DisplayState { registry: self, state }
    }
}
