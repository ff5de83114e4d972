//! Spoken confirmations for parsed commands.
//!
//! Feedback is cosmetic: when the platform offers no text-to-speech
//! capability every call is a silent no-op, and nothing here can fail.

use tracing::debug;

use crate::command::VoiceCommand;
use crate::platform::{SpeechParams, SpeechSynthesizer};

const FAILURE_PHRASE: &str = "Sorry, I could not execute that command";

/// Per-call overrides for locale and prosody. `None` fields fall back to
/// the synthesizer's session defaults.
#[derive(Debug, Clone, Default)]
pub struct SpeakOverrides {
    pub locale: Option<String>,
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
}

pub struct FeedbackSynthesizer {
    tts: Box<dyn SpeechSynthesizer>,
    defaults: SpeechParams,
}

impl FeedbackSynthesizer {
    /// `locale` is the session's configured locale; rate and pitch default
    /// to neutral.
    pub fn new(tts: Box<dyn SpeechSynthesizer>, locale: &str) -> Self {
        Self {
            tts,
            defaults: SpeechParams::neutral(locale),
        }
    }

    /// Speak a confirmation for `command` with session defaults.
    pub fn confirm(&mut self, command: &VoiceCommand, succeeded: bool) {
        self.confirm_with(command, succeeded, &SpeakOverrides::default());
    }

    /// Speak a confirmation with per-call overrides.
    pub fn confirm_with(
        &mut self,
        command: &VoiceCommand,
        succeeded: bool,
        overrides: &SpeakOverrides,
    ) {
        if !self.tts.is_available() {
            debug!("speech synthesis unavailable; skipping confirmation");
            return;
        }

        let text = if succeeded {
            success_phrase(command)
        } else {
            FAILURE_PHRASE.to_string()
        };

        let params = SpeechParams {
            locale: overrides
                .locale
                .clone()
                .unwrap_or_else(|| self.defaults.locale.clone()),
            rate: overrides.rate.unwrap_or(self.defaults.rate),
            pitch: overrides.pitch.unwrap_or(self.defaults.pitch),
        };

        debug!(intent = %command.intent, %text, "speaking confirmation");
        self.tts.speak(&text, &params);
    }
}

/// Intent-specific confirmation phrasing; anything unlisted gets the
/// generic acknowledgement.
fn success_phrase(command: &VoiceCommand) -> String {
    let entity = |key: &str| command.entity(key).unwrap_or("the patient");
    match command.intent.as_str() {
        "show_patient" => {
            let target = command
                .entity("patient_name")
                .or_else(|| command.entity("patient_id"))
                .unwrap_or("the patient");
            format!("Opening patient record for {target}")
        }
        "show_vitals" => format!("Showing vitals for {}", entity("patient_query")),
        "show_labs" => format!("Showing lab results for {}", entity("patient_query")),
        "show_imaging" => format!(
            "Showing {} results for {}",
            command.entity("imaging_type").unwrap_or("imaging"),
            entity("patient_query")
        ),
        "show_prescriptions" => {
            format!("Showing prescriptions for {}", entity("patient_query"))
        }
        "navigate" => format!(
            "Navigating to {}",
            command.entity("destination").unwrap_or("the requested page")
        ),
        "search" => format!(
            "Searching for {}",
            command.entity("search_query").unwrap_or("your query")
        ),
        _ => "Command executed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CommandParser;
    use crate::platform::{MemorySynthesizer, NullSynthesizer};

    fn parsed(transcript: &str) -> VoiceCommand {
        CommandParser::default().parse(transcript, 1.0)
    }

    #[test]
    fn success_phrases_are_intent_specific() {
        let memory = MemorySynthesizer::new();
        let mut feedback = FeedbackSynthesizer::new(Box::new(memory.clone()), "en-US");

        feedback.confirm(&parsed("show patient 231"), true);
        feedback.confirm(&parsed("navigate to prescriptions"), true);
        feedback.confirm(&parsed("take a note"), true);

        let spoken = memory.spoken();
        assert_eq!(spoken[0].0, "Opening patient record for 231");
        assert_eq!(spoken[1].0, "Navigating to prescriptions");
        assert_eq!(spoken[2].0, "Command executed");
    }

    #[test]
    fn failure_uses_fixed_phrase() {
        let memory = MemorySynthesizer::new();
        let mut feedback = FeedbackSynthesizer::new(Box::new(memory.clone()), "en-US");

        feedback.confirm(&parsed("gibberish here"), false);

        let spoken = memory.spoken();
        assert_eq!(spoken[0].0, "Sorry, I could not execute that command");
    }

    #[test]
    fn defaults_are_session_locale_and_neutral_prosody() {
        let memory = MemorySynthesizer::new();
        let mut feedback = FeedbackSynthesizer::new(Box::new(memory.clone()), "en-GB");

        feedback.confirm(&parsed("show patient 1"), true);

        let (_, params) = &memory.spoken()[0];
        assert_eq!(params.locale, "en-GB");
        assert_eq!(params.rate, 1.0);
        assert_eq!(params.pitch, 1.0);
    }

    #[test]
    fn overrides_apply_per_call_only() {
        let memory = MemorySynthesizer::new();
        let mut feedback = FeedbackSynthesizer::new(Box::new(memory.clone()), "en-US");

        feedback.confirm_with(
            &parsed("show patient 1"),
            true,
            &SpeakOverrides {
                locale: Some("es-MX".into()),
                rate: Some(1.2),
                pitch: None,
            },
        );
        feedback.confirm(&parsed("show patient 2"), true);

        let spoken = memory.spoken();
        assert_eq!(spoken[0].1.locale, "es-MX");
        assert_eq!(spoken[0].1.rate, 1.2);
        assert_eq!(spoken[0].1.pitch, 1.0);
        assert_eq!(spoken[1].1.locale, "en-US");
        assert_eq!(spoken[1].1.rate, 1.0);
    }

    #[test]
    fn missing_capability_is_a_silent_noop() {
        let mut feedback = FeedbackSynthesizer::new(Box::new(NullSynthesizer), "en-US");
        // Must not panic or propagate anything.
        feedback.confirm(&parsed("show patient 231"), true);
        feedback.confirm(&parsed("nonsense"), false);
    }
}
