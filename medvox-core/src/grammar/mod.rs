//! Intent grammar — an ordered table of intent definitions.
//!
//! The grammar is configuration, not state: it is built once and never
//! mutated at runtime. Matching walks intents in declared order and, inside
//! each intent, patterns in declared order; the first pattern that matches
//! anywhere wins and evaluation stops. Ties between overlapping intents are
//! therefore resolved by declaration order.
//!
//! All matching runs against the lowercased transcript, so patterns are
//! written in lowercase.

pub mod clinical;

use std::collections::BTreeMap;

use regex::{Captures, Regex};

/// Turns a pattern match into named entities.
///
/// Receives the winning capture groups and the full lowercased transcript.
pub type EntityExtractor = fn(&Captures<'_>, &str) -> BTreeMap<String, String>;

/// One intent: a name, its ordered matchers, and its extraction rule.
pub struct IntentDefinition {
    name: &'static str,
    patterns: Vec<Regex>,
    extract: EntityExtractor,
}

impl IntentDefinition {
    /// Compile an intent definition from pattern source strings.
    ///
    /// Grammar patterns are fixed at build time; a pattern that fails to
    /// compile is a bug in the grammar itself, not a runtime condition.
    pub fn new(name: &'static str, patterns: &[&str], extract: EntityExtractor) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).expect("builtin grammar pattern must compile"))
            .collect();
        Self {
            name,
            patterns,
            extract,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A fixed, ordered list of intent definitions.
pub struct IntentGrammar {
    intents: Vec<IntentDefinition>,
}

impl IntentGrammar {
    pub fn from_intents(intents: Vec<IntentDefinition>) -> Self {
        Self { intents }
    }

    /// Match a lowercased transcript against the grammar.
    ///
    /// Returns the earliest-declared matching intent and its extracted
    /// entities, or `None` when nothing matches.
    pub fn first_match(&self, lowered: &str) -> Option<(&'static str, BTreeMap<String, String>)> {
        for intent in &self.intents {
            for pattern in &intent.patterns {
                if let Some(caps) = pattern.captures(lowered) {
                    let entities = (intent.extract)(&caps, lowered);
                    return Some((intent.name, entities));
                }
            }
        }
        None
    }

    /// Declared intent names, in match order.
    pub fn intent_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.intents.iter().map(|i| i.name)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl Default for IntentGrammar {
    fn default() -> Self {
        Self::clinical()
    }
}
