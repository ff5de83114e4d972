//! Recognition error taxonomy.
//!
//! Platform backends report failures as opaque string codes. The closed
//! [`ErrorKind`] set maps each code to a stable variant with a fixed,
//! user-presentable message. Codes outside the known set are preserved in
//! [`ErrorKind::Other`] rather than dropped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed classification of recognition failures.
///
/// Each variant carries its user-facing message via `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The platform heard nothing during the session.
    #[error("No speech detected. Please try again.")]
    NoSpeech,

    /// The microphone could not be opened.
    #[error("Microphone not accessible. Please check permissions.")]
    AudioCaptureUnavailable,

    /// The user (or an administrator) denied microphone access.
    #[error("Microphone permission denied. Please enable microphone access.")]
    PermissionDenied,

    /// The recognition service could not be reached.
    #[error("Network error. Please check your connection.")]
    NetworkFailure,

    /// The platform offers no speech recognition capability at all.
    #[error("Voice recognition is not supported on this platform.")]
    Unsupported,

    /// Any code the taxonomy does not know. The raw code is embedded in
    /// the message so it is never silently lost.
    #[error("Voice recognition error: {0}")]
    Other(String),
}

impl ErrorKind {
    /// Classify a platform-reported error code.
    ///
    /// Accepts both kebab-case (Web Speech style) and snake_case spellings.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "no-speech" | "no_speech" => ErrorKind::NoSpeech,
            "audio-capture" | "audio_capture" => ErrorKind::AudioCaptureUnavailable,
            "not-allowed" | "not_allowed" | "permission-denied" | "permission_denied"
            | "service-not-allowed" | "service_not_allowed" => ErrorKind::PermissionDenied,
            "network" => ErrorKind::NetworkFailure,
            "unsupported" => ErrorKind::Unsupported,
            _ => ErrorKind::Other(code.trim().to_string()),
        }
    }
}

/// A classified recognition failure with its presentable message.
///
/// Always derived from a platform code via [`ErrorReport::from_code`] or
/// from a known kind via [`ErrorReport::new`]; the message is never
/// assembled ad hoc at call sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorReport {
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    pub fn from_code(code: &str) -> Self {
        Self::new(ErrorKind::from_code(code))
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_exactly_one_kind() {
        let cases = [
            ("no-speech", ErrorKind::NoSpeech),
            ("audio-capture", ErrorKind::AudioCaptureUnavailable),
            ("not-allowed", ErrorKind::PermissionDenied),
            ("service-not-allowed", ErrorKind::PermissionDenied),
            ("network", ErrorKind::NetworkFailure),
            ("unsupported", ErrorKind::Unsupported),
        ];
        for (code, expected) in cases {
            assert_eq!(ErrorKind::from_code(code), expected, "code {code}");
        }
    }

    #[test]
    fn classification_ignores_case_and_whitespace() {
        assert_eq!(ErrorKind::from_code("  No-Speech "), ErrorKind::NoSpeech);
        assert_eq!(ErrorKind::from_code("NETWORK"), ErrorKind::NetworkFailure);
    }

    #[test]
    fn unknown_code_maps_to_other_with_code_in_message() {
        let report = ErrorReport::from_code("aborted");
        assert_eq!(report.kind, ErrorKind::Other("aborted".into()));
        assert_eq!(report.message, "Voice recognition error: aborted");
    }

    #[test]
    fn report_message_matches_kind_display() {
        let report = ErrorReport::from_code("audio-capture");
        assert_eq!(
            report.message,
            "Microphone not accessible. Please check permissions."
        );
        assert_eq!(report.to_string(), report.message);
    }
}
