use crate::automaton::PrecomputedGrammar;
use crate::deterministic::DeterministicParseEngine;
use crate::earley::ParseEngine;

pub trait Rendered {
    fn rendered(&self) -> String;
}

impl Rendered for ParseEngine<'_> {
    fn rendered(&self) -> String {
        let registry = self.factory().registry();
        let mut s = String::new();
        for set in self.chart().sets() {
            s.push_str(&format!("== {} ==\n", set.location()));
            for state in set.states() {
                s.push_str(&format!("{}\n", registry.display_state(state)));
            }
        }
        s
    }
}

impl Rendered for PrecomputedGrammar<'_> {
    fn rendered(&self) -> String {
        let registry = self.registry();
        let mut s = String::new();
        for (i, frame) in self.frames().iter().enumerate() {
            let tag = if frame.is_predicted() { " (predicted)" } else { "" };
            s.push_str(&format!("f{}{}:\n", i, tag));
            for &rule in frame.rules() {
                s.push_str(&format!("    {}\n", registry.display(rule)));
            }
            for (token_type, next) in frame.token_transitions() {
                s.push_str(&format!("    scan {} => {}\n", token_type, next));
            }
            for (nt, next) in frame.reductions() {
                s.push_str(&format!("    reduce {} => {}\n", nt, next));
            }
            if let Some(next) = frame.null_transition() {
                s.push_str(&format!("    predict => {}\n", next));
            }
        }
        s
    }
}

impl Rendered for DeterministicParseEngine<'_> {
    fn rendered(&self) -> String {
        let mut s = String::new();
        for (location, set) in self.chart().sets().iter().enumerate() {
            s.push_str(&format!("== {} ==\n", location));
            for state in set.iter() {
                s.push_str(&format!("{}\n", state));
            }
        }
        s
    }
}
