//! Recognition session adapter.
//!
//! ## Lifecycle
//!
//! ```text
//! RecognitionSession::new()          status = Idle
//!     └─► start()                    begin requested, still Idle
//!         └─► (platform Started)     status = Listening
//!             └─► utterances …       delivered exactly once each
//!                 └─► stop() / Ended status = Idle
//! ```
//!
//! `start()` and `stop()` are guarded no-ops in the wrong state and return
//! immediately; all outcomes arrive through [`drain_events`], which the
//! host calls on its own thread. Platform errors never escape as panics —
//! they surface as classified [`ErrorReport`]s in the drained events.
//!
//! Any utterance still queued when `stop()` is called is discarded, never
//! delivered to the parser.
//!
//! [`drain_events`]: RecognitionSession::drain_events

use std::collections::VecDeque;

use crossbeam_channel::{unbounded, Receiver, TryRecvError};
use tracing::{debug, info};

use crate::error::{ErrorKind, ErrorReport};
use crate::platform::{RecognizerEvent, SpeechRecognizer};

/// Session configuration, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// BCP 47 locale tag for recognition and feedback.
    pub language: String,
    /// `false`: the session auto-terminates after one finalized
    /// utterance. `true`: it listens until `stop()`.
    pub continuous: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: false,
        }
    }
}

/// Current state of the recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No capture in progress.
    Idle,
    /// The platform confirmed capture is running.
    Listening,
    /// A platform error ended the session; cleared by the next
    /// `start()`/`stop()`.
    Error(String),
}

/// Events produced by draining the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// One finalized utterance, delivered exactly once.
    Utterance { transcript: String, confidence: f32 },
    /// The session status changed.
    StatusChanged(SessionStatus),
    /// A classified recognition failure.
    Error(ErrorReport),
}

/// Bridges a [`SpeechRecognizer`] backend into session lifecycle events.
pub struct RecognitionSession {
    config: SessionConfig,
    backend: Box<dyn SpeechRecognizer>,
    status: SessionStatus,
    events: Option<Receiver<RecognizerEvent>>,
    /// `start()` was issued but the platform has not confirmed yet.
    awaiting_start: bool,
    /// Synchronously produced reports (e.g. `Unsupported`) waiting for
    /// the next drain.
    outbox: VecDeque<SessionEvent>,
}

impl RecognitionSession {
    pub fn new(config: SessionConfig, backend: Box<dyn SpeechRecognizer>) -> Self {
        Self {
            config,
            backend,
            status: SessionStatus::Idle,
            events: None,
            awaiting_start: false,
            outbox: VecDeque::new(),
        }
    }

    /// Request that recognition begin.
    ///
    /// No-op if a start is pending or the session is already listening.
    /// If the platform offers no recognition capability, queues an
    /// `Unsupported` report and stays `Idle`.
    pub fn start(&mut self) {
        if self.awaiting_start || self.status == SessionStatus::Listening {
            debug!("start ignored; session already active");
            return;
        }

        if !self.backend.is_available() {
            info!("speech recognition unavailable on this platform");
            self.status = SessionStatus::Idle;
            self.outbox
                .push_back(SessionEvent::Error(ErrorReport::new(ErrorKind::Unsupported)));
            return;
        }

        let (sink, events) = unbounded();
        self.events = Some(events);
        self.awaiting_start = true;
        self.status = SessionStatus::Idle;
        self.backend.begin(&self.config, sink);
        info!(language = %self.config.language, continuous = self.config.continuous, "recognition start requested");
    }

    /// Request that recognition end. Safe in any state; no-op when idle.
    pub fn stop(&mut self) {
        if !self.awaiting_start && self.status == SessionStatus::Idle {
            return;
        }
        self.backend.end();
        self.awaiting_start = false;
        // Dropping the receiver discards any utterance not yet drained.
        self.events = None;
        self.set_status(SessionStatus::Idle);
        info!("recognition stop requested");
    }

    /// Process all pending platform events on the caller's thread.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        let mut out: Vec<SessionEvent> = self.outbox.drain(..).collect();

        let Some(events) = self.events.take() else {
            return out;
        };

        let mut session_open = true;
        loop {
            let event = match events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Backend dropped its sink after finishing the script
                    // of events; anything sent beforehand was already
                    // received above.
                    break;
                }
            };

            match event {
                RecognizerEvent::Started => {
                    if self.awaiting_start {
                        self.awaiting_start = false;
                        self.set_status(SessionStatus::Listening);
                        out.push(SessionEvent::StatusChanged(SessionStatus::Listening));
                    }
                }
                RecognizerEvent::Utterance {
                    transcript,
                    confidence,
                } => {
                    if self.status != SessionStatus::Listening {
                        debug!("discarding utterance outside listening state");
                        continue;
                    }
                    out.push(SessionEvent::Utterance {
                        transcript,
                        confidence,
                    });
                    if !self.config.continuous {
                        // Single-shot sessions end after one utterance;
                        // later queued events are discarded.
                        self.backend.end();
                        self.set_status(SessionStatus::Idle);
                        out.push(SessionEvent::StatusChanged(SessionStatus::Idle));
                        session_open = false;
                        break;
                    }
                }
                RecognizerEvent::Ended => {
                    if self.awaiting_start || self.status == SessionStatus::Listening {
                        self.awaiting_start = false;
                        self.set_status(SessionStatus::Idle);
                        out.push(SessionEvent::StatusChanged(SessionStatus::Idle));
                    }
                    session_open = false;
                    break;
                }
                RecognizerEvent::Error { code } => {
                    let report = ErrorReport::from_code(&code);
                    info!(kind = ?report.kind, "recognition error reported");
                    out.push(SessionEvent::Error(report.clone()));
                    self.backend.end();
                    if self.awaiting_start {
                        // Start failure: never reached Listening, stay Idle.
                        self.awaiting_start = false;
                        self.set_status(SessionStatus::Idle);
                    } else {
                        let status = SessionStatus::Error(report.message);
                        self.set_status(status.clone());
                        out.push(SessionEvent::StatusChanged(status));
                    }
                    session_open = false;
                    break;
                }
            }
        }

        if session_open {
            self.events = Some(events);
        }
        out
    }

    pub fn status(&self) -> SessionStatus {
        self.status.clone()
    }

    pub fn is_listening(&self) -> bool {
        self.status == SessionStatus::Listening
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn set_status(&mut self, status: SessionStatus) {
        if self.status != status {
            debug!(from = ?self.status, to = ?status, "session status change");
            self.status = status;
        }
    }
}
