//! Platform capability abstractions.
//!
//! The engine never touches a concrete speech API. Recognition and
//! synthesis are injected behind the [`SpeechRecognizer`] and
//! [`SpeechSynthesizer`] traits so the session and feedback components can
//! be tested with fakes and ported across hosting environments.
//!
//! A backend may run its callbacks on any thread; it hands events to the
//! session through the [`EventSink`] channel and the session drains them
//! on the caller's thread.

pub mod scripted;

pub use scripted::{MemorySynthesizer, NullSynthesizer, ScriptedRecognizer, UnsupportedRecognizer};

use crate::session::SessionConfig;

/// Events delivered by a recognition backend, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerEvent {
    /// The platform confirmed that audio capture has begun.
    Started,
    /// One finalized utterance. Interim/partial hypotheses are never
    /// delivered through this event.
    Utterance { transcript: String, confidence: f32 },
    /// The platform ended the session on its own (end-of-utterance
    /// detection, service shutdown).
    Ended,
    /// A platform error code, classified later by
    /// [`crate::error::ErrorKind::from_code`].
    Error { code: String },
}

/// Sending half of the session's event queue, handed to a backend on start.
pub type EventSink = crossbeam_channel::Sender<RecognizerEvent>;

/// Contract for speech recognition backends.
///
/// `begin` must not block: it requests capture and returns, with the
/// outcome reported asynchronously as [`RecognizerEvent::Started`] or
/// [`RecognizerEvent::Error`] on the sink.
pub trait SpeechRecognizer: Send + 'static {
    /// Whether the platform offers recognition at all. When `false` the
    /// session reports `Unsupported` and never calls `begin`.
    fn is_available(&self) -> bool {
        true
    }

    /// Request that capture begin. Events flow into `sink` until `end` is
    /// called or the backend emits [`RecognizerEvent::Ended`].
    fn begin(&mut self, config: &SessionConfig, sink: EventSink);

    /// Request that capture end. Must be safe to call in any state,
    /// including when capture never started.
    fn end(&mut self);
}

/// Prosody and locale parameters for one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechParams {
    /// BCP 47 locale tag, e.g. `"en-US"`.
    pub locale: String,
    /// Speaking rate multiplier; `1.0` is neutral.
    pub rate: f32,
    /// Pitch multiplier; `1.0` is neutral.
    pub pitch: f32,
}

impl SpeechParams {
    pub fn neutral(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// Contract for text-to-speech backends.
pub trait SpeechSynthesizer: Send + 'static {
    /// Whether the platform offers synthesis. When `false` all feedback
    /// is silently skipped.
    fn is_available(&self) -> bool {
        true
    }

    /// Speak `text` with the given parameters. Best-effort: failures are
    /// the backend's to swallow, never to propagate.
    fn speak(&mut self, text: &str, params: &SpeechParams);
}
