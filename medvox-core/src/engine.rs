//! `VoiceEngine` — top-level composition of the command pipeline.
//!
//! ```text
//! VoiceEngine::new()
//!     └─► start()              session requests platform capture
//!         └─► process_pending() utterances → parse → dispatch → feedback
//!             └─► stop()       session back to Idle, queue discarded
//! ```
//!
//! The engine is `&self`-driven with interior mutability, so a host can
//! share one instance between its UI callbacks and its event loop. All
//! command processing happens inside [`process_pending`] on the calling
//! thread; nothing here spawns or blocks.
//!
//! [`process_pending`]: VoiceEngine::process_pending

use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{info, warn};

use crate::command::VoiceCommand;
use crate::dispatch::CommandDispatcher;
use crate::error::ErrorReport;
use crate::feedback::{FeedbackSynthesizer, SpeakOverrides};
use crate::parser::CommandParser;
use crate::platform::{SpeechRecognizer, SpeechSynthesizer};
use crate::session::{RecognitionSession, SessionConfig, SessionEvent, SessionStatus};

type ErrorListener = Box<dyn FnMut(&ErrorReport) + Send>;

/// Configuration for [`VoiceEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// BCP 47 locale tag for recognition and spoken feedback.
    /// Default: `"en-US"`.
    pub language: String,
    /// Keep listening after the first finalized utterance.
    /// Default: `false`.
    pub continuous: bool,
    /// Maximum command history length; `None` is unbounded.
    pub history_cap: Option<usize>,
    /// Speak a confirmation after every dispatched command.
    /// Default: `true`.
    pub speak_confirmations: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: false,
            history_cap: None,
            speak_confirmations: true,
        }
    }
}

/// The top-level engine handle.
pub struct VoiceEngine {
    session: Mutex<RecognitionSession>,
    parser: CommandParser,
    dispatcher: Mutex<CommandDispatcher>,
    feedback: Mutex<FeedbackSynthesizer>,
    error_listeners: Mutex<Vec<ErrorListener>>,
    speak_confirmations: bool,
}

impl VoiceEngine {
    /// Build an engine over injected platform capabilities, using the
    /// builtin clinical grammar.
    pub fn new(
        config: EngineConfig,
        recognizer: Box<dyn SpeechRecognizer>,
        synthesizer: Box<dyn SpeechSynthesizer>,
    ) -> Self {
        Self::with_parser(config, recognizer, synthesizer, CommandParser::default())
    }

    /// Build an engine with a custom parser/grammar.
    pub fn with_parser(
        config: EngineConfig,
        recognizer: Box<dyn SpeechRecognizer>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        parser: CommandParser,
    ) -> Self {
        let session_config = SessionConfig {
            language: config.language.clone(),
            continuous: config.continuous,
        };
        Self {
            session: Mutex::new(RecognitionSession::new(session_config, recognizer)),
            parser,
            dispatcher: Mutex::new(CommandDispatcher::with_history_cap(config.history_cap)),
            feedback: Mutex::new(FeedbackSynthesizer::new(synthesizer, &config.language)),
            error_listeners: Mutex::new(Vec::new()),
            speak_confirmations: config.speak_confirmations,
        }
    }

    /// Request that recognition begin. Guarded no-op while active.
    pub fn start(&self) {
        self.session.lock().start();
    }

    /// Request that recognition end. Safe in any state.
    pub fn stop(&self) {
        self.session.lock().stop();
    }

    /// Current session status (snapshot).
    pub fn status(&self) -> SessionStatus {
        self.session.lock().status()
    }

    /// Subscribe to the application-wide `"voiceCommand"` event.
    ///
    /// Listeners run synchronously during [`Self::process_pending`], in
    /// subscription order, for every dispatched command — `"unknown"`
    /// included. Payload contract:
    /// `{ intent, entities, confidence, raw_text }`.
    pub fn on_command<F>(&self, listener: F)
    where
        F: FnMut(&VoiceCommand) + Send + 'static,
    {
        self.dispatcher.lock().subscribe(listener);
    }

    /// Subscribe to classified recognition failures.
    pub fn on_error<F>(&self, listener: F)
    where
        F: FnMut(&ErrorReport) + Send + 'static,
    {
        self.error_listeners.lock().push(Box::new(listener));
    }

    /// Drain platform events and run the command pipeline for each
    /// finalized utterance. Returns the number of commands dispatched.
    pub fn process_pending(&self) -> usize {
        let events = self.session.lock().drain_events();
        let mut dispatched = 0;

        for event in events {
            match event {
                SessionEvent::Utterance {
                    transcript,
                    confidence,
                } => {
                    let command = self.parser.parse(&transcript, confidence);
                    info!(
                        intent = %command.intent,
                        confidence,
                        "voice command recognized"
                    );
                    let succeeded = !command.is_unknown();
                    self.dispatcher.lock().dispatch(command.clone());
                    if self.speak_confirmations {
                        self.feedback.lock().confirm(&command, succeeded);
                    }
                    dispatched += 1;
                }
                SessionEvent::StatusChanged(status) => {
                    info!(?status, "session status changed");
                }
                SessionEvent::Error(report) => {
                    warn!(kind = ?report.kind, message = %report.message, "recognition error");
                    self.notify_error(&report);
                }
            }
        }

        dispatched
    }

    /// Speak success/failure feedback for a command, with per-call
    /// overrides. For hosts that execute commands themselves.
    pub fn speak_feedback(
        &self,
        command: &VoiceCommand,
        succeeded: bool,
        overrides: &SpeakOverrides,
    ) {
        self.feedback
            .lock()
            .confirm_with(command, succeeded, overrides);
    }

    /// Defensive copy of the command history, oldest first.
    pub fn history(&self) -> Vec<VoiceCommand> {
        self.dispatcher.lock().history()
    }

    pub fn clear_history(&self) {
        self.dispatcher.lock().clear_history();
    }

    fn notify_error(&self, report: &ErrorReport) {
        let mut listeners = self.error_listeners.lock();
        for (index, listener) in listeners.iter_mut().enumerate() {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener(report)));
            if outcome.is_err() {
                warn!(listener = index, "error listener panicked; continuing");
            }
        }
    }
}
