//! Transcript → [`VoiceCommand`] parsing.
//!
//! `parse` is a pure function of its inputs: no hidden state, no
//! randomness, identical input always yields an identical command. The
//! transcript is lowercased for matching only; `raw_text` keeps the
//! original casing. Confidence passes through from the recognizer
//! untouched — the parser never recomputes or clamps it.

use tracing::debug;

use crate::command::VoiceCommand;
use crate::grammar::IntentGrammar;

pub struct CommandParser {
    grammar: IntentGrammar,
}

impl CommandParser {
    pub fn new(grammar: IntentGrammar) -> Self {
        Self { grammar }
    }

    /// Parse one finalized utterance.
    ///
    /// Never fails: a transcript no grammar rule matches degrades to the
    /// `"unknown"` intent with the verbatim transcript as its `query`.
    pub fn parse(&self, transcript: &str, confidence: f32) -> VoiceCommand {
        let lowered = transcript.to_lowercase();

        match self.grammar.first_match(lowered.trim()) {
            Some((intent, entities)) => {
                debug!(intent, entity_count = entities.len(), "transcript matched");
                VoiceCommand::new(intent, entities, confidence, transcript)
            }
            None => {
                debug!("transcript matched no intent");
                VoiceCommand::unknown(transcript, confidence)
            }
        }
    }

    pub fn grammar(&self) -> &IntentGrammar {
        &self.grammar
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(IntentGrammar::clinical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(transcript: &str) -> VoiceCommand {
        CommandParser::default().parse(transcript, 0.9)
    }

    #[test]
    fn parse_is_deterministic() {
        let parser = CommandParser::default();
        let first = parser.parse("Show patient 231", 0.73);
        let second = parser.parse("Show patient 231", 0.73);
        assert_eq!(first, second);
    }

    #[test]
    fn show_patient_by_id() {
        let cmd = parse("show patient 231");
        assert_eq!(cmd.intent, "show_patient");
        assert_eq!(cmd.entity("patient_id"), Some("231"));
    }

    #[test]
    fn vitals_folds_case_but_preserves_raw_text() {
        let cmd = parse("display vitals for John Doe");
        assert_eq!(cmd.intent, "show_vitals");
        assert_eq!(cmd.entity("patient_query"), Some("john doe"));
        assert_eq!(cmd.raw_text, "display vitals for John Doe");
    }

    #[test]
    fn imaging_with_modality_and_patient() {
        let cmd = parse("open last ct scan for patient 102948");
        assert_eq!(cmd.intent, "show_imaging");
        assert_eq!(cmd.entity("imaging_type"), Some("ct"));
        assert_eq!(cmd.entity("patient_query"), Some("102948"));
    }

    #[test]
    fn navigate_to_destination() {
        let cmd = parse("navigate to prescriptions");
        assert_eq!(cmd.intent, "navigate");
        assert_eq!(cmd.entity("destination"), Some("prescriptions"));
    }

    #[test]
    fn search_with_condition() {
        let cmd = parse("search for patients with diabetes");
        assert_eq!(cmd.intent, "search");
        assert_eq!(cmd.entity("search_query"), Some("diabetes"));
    }

    #[test]
    fn unmatched_transcript_degrades_to_unknown() {
        let cmd = parse("please order more coffee");
        assert_eq!(cmd.intent, "unknown");
        assert_eq!(cmd.entity("query"), Some("please order more coffee"));
        assert_eq!(cmd.raw_text, "please order more coffee");
    }

    #[test]
    fn confidence_passes_through_unmodified() {
        let parser = CommandParser::default();
        // Out-of-range values are the recognizer's responsibility; the
        // parser must not clamp them.
        let cmd = parser.parse("show patient 1", 1.7);
        assert_eq!(cmd.confidence, 1.7);
        let cmd = parser.parse("show patient 1", 0.0);
        assert_eq!(cmd.confidence, 0.0);
    }
}
