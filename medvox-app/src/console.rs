//! Console-backed platform capabilities.
//!
//! `ConsoleRecognizer` treats each stdin line as one finalized utterance
//! with confidence 1.0, standing in for a real speech-recognition
//! capability. `ConsoleSynthesizer` "speaks" by printing to stdout.

use std::io::{self, BufRead};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, RecvTimeoutError};
use parking_lot::Mutex;

use medvox_core::platform::{EventSink, SpeechParams};
use medvox_core::{RecognizerEvent, SessionConfig, SpeechRecognizer, SpeechSynthesizer};

pub struct ConsoleRecognizer {
    /// Sink of the current session; `None` while no session is active.
    /// Swapped on every `begin`/`end`, read by the forwarder thread.
    sink: Arc<Mutex<Option<EventSink>>>,
    closed: Arc<AtomicBool>,
}

impl ConsoleRecognizer {
    /// Spawns one stdin reader and one forwarder thread for the process
    /// lifetime. Sessions that restart share them, so a typed line is
    /// held until some session is around to receive it.
    pub fn new() -> Self {
        let (tx, lines) = unbounded::<String>();
        let sink: Arc<Mutex<Option<EventSink>>> = Arc::new(Mutex::new(None));
        let closed = Arc::new(AtomicBool::new(false));

        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if tx.send(line).is_err() {
                    break;
                }
            }
            // Dropping tx disconnects the forwarder below.
        });

        let sink_for_forwarder = Arc::clone(&sink);
        let closed_for_forwarder = Arc::clone(&closed);
        thread::spawn(move || {
            let mut pending: Option<String> = None;
            loop {
                let line = match pending.take() {
                    Some(line) => line,
                    None => match lines.recv_timeout(Duration::from_millis(100)) {
                        Ok(line) => line,
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => {
                            if let Some(sink) = sink_for_forwarder.lock().clone() {
                                let _ = sink.send(RecognizerEvent::Ended);
                            }
                            closed_for_forwarder.store(true, Ordering::SeqCst);
                            break;
                        }
                    },
                };

                let current = sink_for_forwarder.lock().clone();
                match current {
                    Some(sink) => {
                        let event = RecognizerEvent::Utterance {
                            transcript: line.clone(),
                            confidence: 1.0,
                        };
                        if sink.send(event).is_err() {
                            // Stale sink from a finished session; hold the
                            // line for the next one.
                            pending = Some(line);
                            thread::sleep(Duration::from_millis(20));
                        }
                    }
                    None => {
                        pending = Some(line);
                        thread::sleep(Duration::from_millis(20));
                    }
                }
            }
        });

        Self { sink, closed }
    }

    /// Set once stdin reaches EOF; lets the host loop know to exit.
    pub fn stdin_closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn begin(&mut self, _config: &SessionConfig, sink: EventSink) {
        let _ = sink.send(RecognizerEvent::Started);
        *self.sink.lock() = Some(sink);
    }

    fn end(&mut self) {
        *self.sink.lock() = None;
    }
}

impl Default for ConsoleRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ConsoleSynthesizer;

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&mut self, text: &str, params: &SpeechParams) {
        println!("[speaks, {}] {text}", params.locale);
    }
}
