use std::sync::Arc;

use parking_lot::Mutex;

use medvox_core::platform::{MemorySynthesizer, ScriptedRecognizer, UnsupportedRecognizer};
use medvox_core::{
    EngineConfig, ErrorKind, SessionStatus, VoiceCommand, VoiceEngine,
};

fn engine_with_script(
    utterances: Vec<(&'static str, f32)>,
    continuous: bool,
) -> (VoiceEngine, MemorySynthesizer) {
    let synth = MemorySynthesizer::new();
    let config = EngineConfig {
        continuous,
        ..EngineConfig::default()
    };
    let engine = VoiceEngine::new(
        config,
        Box::new(ScriptedRecognizer::with_utterances(utterances)),
        Box::new(synth.clone()),
    );
    (engine, synth)
}

#[test]
fn utterance_flows_to_subscribers_history_and_feedback() {
    let (engine, synth) = engine_with_script(vec![("Show patient 231", 0.93)], false);

    let received: Arc<Mutex<Vec<VoiceCommand>>> = Arc::new(Mutex::new(Vec::new()));
    let received_clone = Arc::clone(&received);
    engine.on_command(move |cmd| received_clone.lock().push(cmd.clone()));

    engine.start();
    let dispatched = engine.process_pending();
    assert_eq!(dispatched, 1);

    let commands = received.lock();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].intent, "show_patient");
    assert_eq!(commands[0].entity("patient_id"), Some("231"));
    assert_eq!(commands[0].confidence, 0.93);
    assert_eq!(commands[0].raw_text, "Show patient 231");

    let history = engine.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0], commands[0]);

    let spoken = synth.spoken();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].0, "Opening patient record for 231");

    // Single-shot session ended itself after the utterance.
    assert_eq!(engine.status(), SessionStatus::Idle);
}

#[test]
fn continuous_session_accumulates_history_in_dispatch_order() {
    let (engine, _synth) = engine_with_script(
        vec![
            ("navigate to prescriptions", 0.9),
            ("this means nothing", 0.4),
            ("search for patients with diabetes", 0.8),
        ],
        true,
    );

    engine.start();
    let dispatched = engine.process_pending();
    assert_eq!(dispatched, 3);

    let history = engine.history();
    let intents: Vec<&str> = history.iter().map(|c| c.intent.as_str()).collect();
    assert_eq!(intents, ["navigate", "unknown", "search"]);

    engine.clear_history();
    assert!(engine.history().is_empty());
}

#[test]
fn unknown_command_speaks_failure_phrase() {
    let (engine, synth) = engine_with_script(vec![("tell me a joke please", 0.5)], false);

    engine.start();
    engine.process_pending();

    let spoken = synth.spoken();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].0, "Sorry, I could not execute that command");

    // The unknown command still lands in history.
    let history = engine.history();
    assert_eq!(history[0].intent, "unknown");
    assert_eq!(history[0].entity("query"), Some("tell me a joke please"));
}

#[test]
fn unsupported_platform_reaches_error_listeners_not_command_listeners() {
    let synth = MemorySynthesizer::new();
    let engine = VoiceEngine::new(
        EngineConfig::default(),
        Box::new(UnsupportedRecognizer),
        Box::new(synth.clone()),
    );

    let errors = Arc::new(Mutex::new(Vec::new()));
    let errors_clone = Arc::clone(&errors);
    engine.on_error(move |report| errors_clone.lock().push(report.clone()));

    let commands = Arc::new(Mutex::new(0usize));
    let commands_clone = Arc::clone(&commands);
    engine.on_command(move |_| *commands_clone.lock() += 1);

    engine.start();
    let dispatched = engine.process_pending();

    assert_eq!(dispatched, 0);
    assert_eq!(*commands.lock(), 0);
    let errors = errors.lock();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Unsupported);
    assert_eq!(engine.status(), SessionStatus::Idle);
    // No feedback is spoken for recognition failures.
    assert!(synth.spoken().is_empty());
}

#[test]
fn stop_before_processing_discards_the_utterance() {
    let (engine, synth) = engine_with_script(vec![("show patient 231", 0.9)], false);

    engine.start();
    engine.stop();
    let dispatched = engine.process_pending();

    assert_eq!(dispatched, 0);
    assert!(engine.history().is_empty());
    assert!(synth.spoken().is_empty());
}
