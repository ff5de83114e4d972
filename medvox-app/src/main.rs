//! MedVox console host.
//!
//! Runs the voice command engine against console-backed platform
//! capabilities: each stdin line is treated as one finalized utterance and
//! dispatched `voiceCommand` events are printed as JSON lines. Pass
//! `--demo` to replay a canned tour of clinical commands instead of
//! reading stdin.

mod console;
mod settings;

use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use medvox_core::platform::ScriptedRecognizer;
use medvox_core::{SessionStatus, VoiceEngine, VOICE_COMMAND_EVENT};

use console::{ConsoleRecognizer, ConsoleSynthesizer};
use settings::{default_settings_path, load_settings, save_settings, AppSettings};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medvox=info".parse().expect("valid default filter")),
        )
        .init();

    let settings_path = default_settings_path();
    let app_settings = load_settings(&settings_path);
    if !settings_path.exists() {
        save_settings(&settings_path, &app_settings)?;
    }
    info!(
        settings_path = ?settings_path,
        language = %app_settings.language,
        continuous = app_settings.continuous,
        "settings loaded"
    );

    if std::env::args().any(|arg| arg == "--demo") {
        run_demo(&app_settings)
    } else {
        run_repl(&app_settings)
    }
}

fn attach_listeners(engine: &VoiceEngine) {
    engine.on_command(|command| match serde_json::to_string(command) {
        Ok(payload) => println!("{VOICE_COMMAND_EVENT} {payload}"),
        Err(e) => warn!("failed to serialize command: {e}"),
    });
    engine.on_error(|report| eprintln!("! {}", report.message));
}

/// Interactive mode: type a transcript per line, Ctrl-D to exit.
fn run_repl(app_settings: &AppSettings) -> Result<()> {
    let recognizer = ConsoleRecognizer::new();
    let stdin_closed = recognizer.stdin_closed_flag();

    let engine = VoiceEngine::new(
        app_settings.engine_config(),
        Box::new(recognizer),
        Box::new(ConsoleSynthesizer),
    );
    attach_listeners(&engine);

    println!("MedVox console — type a command (e.g. \"show patient 231\"), Ctrl-D to quit.");
    engine.start();

    loop {
        engine.process_pending();

        let idle = engine.status() == SessionStatus::Idle;
        if stdin_closed.load(Ordering::SeqCst) && idle {
            break;
        }
        if idle {
            // Single-utterance sessions re-arm so the console stays live.
            engine.start();
        }
        thread::sleep(POLL_INTERVAL);
    }

    info!(commands = engine.history().len(), "session finished");
    Ok(())
}

/// Replays a canned set of utterances through the full pipeline.
fn run_demo(app_settings: &AppSettings) -> Result<()> {
    let script = vec![
        ("Show patient 231", 0.94),
        ("display vitals for John Doe", 0.88),
        ("open last ct scan for patient 102948", 0.91),
        ("navigate to prescriptions", 0.97),
        ("search for patients with diabetes", 0.85),
        ("order a pepperoni pizza", 0.42),
    ];

    let mut config = app_settings.engine_config();
    // The demo replays its whole script in one session.
    config.continuous = true;

    let engine = VoiceEngine::new(
        config,
        Box::new(ScriptedRecognizer::with_utterances(script)),
        Box::new(ConsoleSynthesizer),
    );
    attach_listeners(&engine);

    engine.start();
    while engine.process_pending() > 0 || engine.status() != SessionStatus::Idle {
        thread::sleep(POLL_INTERVAL);
    }

    println!("-- history --");
    for command in engine.history() {
        println!("{:<20} {}", command.intent, command.raw_text);
    }
    Ok(())
}
