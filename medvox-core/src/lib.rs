//! # medvox-core
//!
//! Voice command engine for the MedVox hospital operations suite.
//! Converts finalized speech transcripts into structured, typed commands
//! that drive application navigation and clinical lookups.
//!
//! ## Architecture
//!
//! ```text
//! SpeechRecognizer → RecognitionSession → CommandParser(IntentGrammar)
//!                                               │
//!                                         VoiceCommand
//!                                               │
//!                                      CommandDispatcher ──► subscribers + history
//!                                               │
//!                                     FeedbackSynthesizer ──► SpeechSynthesizer
//! ```
//!
//! Platform recognition errors bypass the parser and are classified into
//! the closed [`error::ErrorKind`] taxonomy instead.
//!
//! All processing is cooperative: backends deliver events into a queue and
//! the host drains it on its own thread via [`VoiceEngine::process_pending`].

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod command;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod grammar;
pub mod parser;
pub mod platform;
pub mod session;

// Convenience re-exports for downstream crates
pub use command::{VoiceCommand, UNKNOWN_INTENT, VOICE_COMMAND_EVENT};
pub use engine::{EngineConfig, VoiceEngine};
pub use error::{ErrorKind, ErrorReport};
pub use platform::{RecognizerEvent, SpeechRecognizer, SpeechSynthesizer};
pub use session::{RecognitionSession, SessionConfig, SessionStatus};
