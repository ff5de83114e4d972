//! The builtin clinical grammar.
//!
//! Nine intents covering patient lookup, clinical data retrieval,
//! navigation, search, emergency escalation, and dictation. Declaration
//! order is load-bearing: overlapping phrasings ("show record of …"
//! contains the dictation trigger "record") resolve to the earliest
//! declared intent.

use std::collections::BTreeMap;

use regex::Captures;

use super::{IntentDefinition, IntentGrammar};

impl IntentGrammar {
    /// The grammar shipped with the hospital dashboards.
    pub fn clinical() -> Self {
        Self::from_intents(vec![
            IntentDefinition::new(
                "show_patient",
                &[r"\b(?:show|display|open|view)\s+(?:the\s+)?(?:patient(?:\s+(?:chart|record))?|chart|record)(?:\s+(?:for|of))?(?:\s+patient)?\s+(\d+|[a-z]+\s+[a-z]+)"],
                extract_patient_target,
            ),
            IntentDefinition::new(
                "show_vitals",
                &[r"\b(?:show|display|get)\s+(?:the\s+)?vitals?(?:\s+signs?)?\s+(?:for|of)\s+(?:patient\s+)?(.+)"],
                extract_patient_query,
            ),
            IntentDefinition::new(
                "show_labs",
                &[
                    r"\b(?:show|display|get)\s+(?:the\s+)?(?:lab|test)\s+(?:results?|reports?)\s+(?:for|of)\s+(?:patient\s+)?(.+)",
                    r"\b(?:last|recent|latest)\s+(?:labs?|tests?)(?:\s+(?:results?|reports?))?\s+(?:for|of)\s+(?:patient\s+)?(.+)",
                ],
                extract_patient_query,
            ),
            IntentDefinition::new(
                "show_imaging",
                &[r"\b(?:show|display|open)\s+(?:the\s+)?(?:last|recent|latest)\s+(ct|mri|x[\s-]?ray|scan)(?:\s+(?:scan|image))?\s+(?:for|of)\s+(?:patient\s+)?(.+)"],
                extract_imaging,
            ),
            IntentDefinition::new(
                "show_prescriptions",
                &[r"\b(?:show|display|get)\s+(?:the\s+)?(?:prescriptions?|medications?|meds)\s+(?:for|of)\s+(?:patient\s+)?(.+)"],
                extract_patient_query,
            ),
            IntentDefinition::new(
                "navigate",
                &[
                    r"\b(?:go\s+to|navigate\s+to|open)\s+(?:the\s+)?(.+)",
                    r"\b(?:show|display)\s+(?:the\s+)?(.+?)\s+(?:page|screen|dashboard)\b",
                ],
                extract_destination,
            ),
            IntentDefinition::new(
                "search",
                &[r"\b(?:search|find|look)(?:\s+for)?\s+(?:patients?\s+)?(?:(?:with|having|diagnosed\s+with)\s+)?(.+)"],
                extract_search_query,
            ),
            IntentDefinition::new(
                "emergency",
                &[r"\b(?:emergency|urgent|critical|code\s+blue)\b"],
                extract_nothing,
            ),
            IntentDefinition::new(
                "dictate",
                &[r"\b(?:dictate|record|take\s+(?:a\s+)?note)\b"],
                extract_nothing,
            ),
        ])
    }
}

/// Trim whitespace and trailing sentence punctuation from a captured value.
fn clean(value: &str) -> String {
    value
        .trim()
        .trim_end_matches(['.', ',', '!', '?'])
        .trim()
        .to_string()
}

fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// `show_patient`: digits become `patient_id`, a spoken name becomes
/// `patient_name`.
fn extract_patient_target(caps: &Captures<'_>, _lowered: &str) -> BTreeMap<String, String> {
    let mut entities = BTreeMap::new();
    if let Some(target) = caps.get(1) {
        let target = clean(target.as_str());
        if is_all_digits(&target) {
            entities.insert("patient_id".to_string(), target);
        } else if !target.is_empty() {
            entities.insert("patient_name".to_string(), target);
        }
    }
    entities
}

fn extract_patient_query(caps: &Captures<'_>, _lowered: &str) -> BTreeMap<String, String> {
    let mut entities = BTreeMap::new();
    if let Some(query) = caps.get(1) {
        let query = clean(query.as_str());
        if !query.is_empty() {
            entities.insert("patient_query".to_string(), query);
        }
    }
    entities
}

/// `show_imaging`: modality plus patient query. Spoken "x ray"/"xray"
/// variants normalize to `x-ray`.
fn extract_imaging(caps: &Captures<'_>, _lowered: &str) -> BTreeMap<String, String> {
    let mut entities = BTreeMap::new();
    if let Some(modality) = caps.get(1) {
        let modality = clean(modality.as_str());
        let modality = if modality.contains("ray") {
            "x-ray".to_string()
        } else {
            modality
        };
        entities.insert("imaging_type".to_string(), modality);
    }
    if let Some(query) = caps.get(2) {
        let query = clean(query.as_str());
        if !query.is_empty() {
            entities.insert("patient_query".to_string(), query);
        }
    }
    entities
}

/// `navigate`: the destination, with a trailing "page"/"screen"/
/// "dashboard" qualifier stripped.
fn extract_destination(caps: &Captures<'_>, _lowered: &str) -> BTreeMap<String, String> {
    let mut entities = BTreeMap::new();
    if let Some(destination) = caps.get(1) {
        let mut destination = clean(destination.as_str());
        for suffix in [" page", " screen", " dashboard"] {
            if let Some(stripped) = destination.strip_suffix(suffix) {
                destination = stripped.trim_end().to_string();
                break;
            }
        }
        if !destination.is_empty() {
            entities.insert("destination".to_string(), destination);
        }
    }
    entities
}

fn extract_search_query(caps: &Captures<'_>, _lowered: &str) -> BTreeMap<String, String> {
    let mut entities = BTreeMap::new();
    if let Some(query) = caps.get(1) {
        let query = clean(query.as_str());
        if !query.is_empty() {
            entities.insert("search_query".to_string(), query);
        }
    }
    entities
}

fn extract_nothing(_caps: &Captures<'_>, _lowered: &str) -> BTreeMap<String, String> {
    BTreeMap::new()
}
