//! The parsed voice command payload.
//!
//! ## Event contract
//!
//! | Event | Name |
//! |-------|------|
//! | [`VoiceCommand`] | `"voiceCommand"` |
//!
//! `VoiceCommand` is the sole integration point between the engine and the
//! hosting application: any UI component may subscribe via
//! [`crate::engine::VoiceEngine::on_command`] and receives the payload
//! below. The serialized field names are a stable contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the application-wide event carrying a [`VoiceCommand`].
pub const VOICE_COMMAND_EVENT: &str = "voiceCommand";

/// Sentinel intent for transcripts no grammar rule matched.
pub const UNKNOWN_INTENT: &str = "unknown";

/// A structured command parsed from one finalized utterance.
///
/// Immutable once created. `intent` is always one of the grammar's
/// declared intent names or [`UNKNOWN_INTENT`]; `entities` is empty when
/// no extraction rule captured content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceCommand {
    /// Normalized action name, e.g. `"show_patient"`.
    pub intent: String,
    /// Named values extracted from the utterance, e.g. `patient_id`.
    /// Keys are sorted so equal commands serialize identically.
    pub entities: BTreeMap<String, String>,
    /// Recognition confidence in [0.0, 1.0], passed through unmodified
    /// from the platform.
    pub confidence: f32,
    /// The transcript exactly as delivered, original casing preserved.
    pub raw_text: String,
}

impl VoiceCommand {
    pub fn new(
        intent: impl Into<String>,
        entities: BTreeMap<String, String>,
        confidence: f32,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            intent: intent.into(),
            entities,
            confidence,
            raw_text: raw_text.into(),
        }
    }

    /// The fallback command for an unmatched transcript: intent
    /// `"unknown"` with the verbatim transcript under the `query` entity.
    pub fn unknown(transcript: &str, confidence: f32) -> Self {
        let mut entities = BTreeMap::new();
        entities.insert("query".to_string(), transcript.to_string());
        Self::new(UNKNOWN_INTENT, entities, confidence, transcript)
    }

    pub fn is_unknown(&self) -> bool {
        self.intent == UNKNOWN_INTENT
    }

    /// Entity lookup shorthand.
    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities.get(key).map(String::as_str)
    }
}
