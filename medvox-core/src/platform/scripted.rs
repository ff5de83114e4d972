//! Scripted platform backends.
//!
//! `ScriptedRecognizer` replays a fixed sequence of utterances so the full
//! session → parser → dispatch → feedback path can be exercised without
//! any real speech capability. Used by tests and by the console host when
//! run in demo mode.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::{EventSink, RecognizerEvent, SpeechParams, SpeechRecognizer, SpeechSynthesizer};
use crate::session::SessionConfig;

/// Replays a scripted set of recognizer events on every `begin`.
///
/// Emits `Started`, then each scripted step, then `Ended`. Steps may be
/// utterances or error codes, so failure paths are scriptable too.
pub struct ScriptedRecognizer {
    script: Vec<RecognizerEvent>,
    begin_calls: u32,
}

impl ScriptedRecognizer {
    /// Script of `(transcript, confidence)` utterances.
    pub fn with_utterances<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let script = utterances
            .into_iter()
            .map(|(transcript, confidence)| RecognizerEvent::Utterance {
                transcript: transcript.into(),
                confidence,
            })
            .collect();
        Self::with_script(script)
    }

    /// Arbitrary event script (`Started`/`Ended` framing is added by the
    /// recognizer itself).
    pub fn with_script(script: Vec<RecognizerEvent>) -> Self {
        Self {
            script,
            begin_calls: 0,
        }
    }

    /// How many times `begin` has been called. Lets tests assert the
    /// session never double-subscribes to the platform.
    pub fn begin_calls(&self) -> u32 {
        self.begin_calls
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn begin(&mut self, _config: &SessionConfig, sink: EventSink) {
        self.begin_calls += 1;
        debug!(begin_calls = self.begin_calls, "scripted recognizer begin");
        let _ = sink.send(RecognizerEvent::Started);
        for event in &self.script {
            let _ = sink.send(event.clone());
        }
        let _ = sink.send(RecognizerEvent::Ended);
    }

    fn end(&mut self) {
        debug!("scripted recognizer end");
    }
}

/// A platform with no recognition capability at all.
pub struct UnsupportedRecognizer;

impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn begin(&mut self, _config: &SessionConfig, _sink: EventSink) {
        unreachable!("session must not call begin on an unavailable backend");
    }

    fn end(&mut self) {}
}

/// Records every synthesis call for later assertion.
#[derive(Clone, Default)]
pub struct MemorySynthesizer {
    spoken: Arc<Mutex<Vec<(String, SpeechParams)>>>,
}

impl MemorySynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything spoken so far.
    pub fn spoken(&self) -> Vec<(String, SpeechParams)> {
        self.spoken.lock().clone()
    }
}

impl SpeechSynthesizer for MemorySynthesizer {
    fn speak(&mut self, text: &str, params: &SpeechParams) {
        self.spoken.lock().push((text.to_string(), params.clone()));
    }
}

/// A platform with no text-to-speech capability.
pub struct NullSynthesizer;

impl SpeechSynthesizer for NullSynthesizer {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _text: &str, _params: &SpeechParams) {}
}
