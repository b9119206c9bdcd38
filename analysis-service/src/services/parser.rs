//! Turns free-form model replies into a hazard list.
//!
//! The model is asked for `{"hazards": [...]}` but may wrap it in prose or
//! code fences, or ignore the instruction altogether. Parsing never fails:
//!
//! 1. the span from the first `{` to the last `}` is parsed as JSON and its
//!    `hazards` array used (a missing or non-array `hazards` yields none);
//! 2. otherwise the reply itself becomes one generic hazard;
//! 3. with no reply at all, a placeholder asks for manual review.

use crate::models::DetectedHazard;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

pub const GENERAL_CONCERN_TAG: &str = "General Safety Concern";
pub const GENERAL_CONCERN_CONFIDENCE: f64 = 0.7;
/// Characters of the raw reply kept as notes of the generic hazard.
pub const GENERAL_CONCERN_NOTES_CHARS: usize = 200;

pub const ANALYSIS_REQUIRED_TAG: &str = "Analysis Required";
pub const ANALYSIS_REQUIRED_CONFIDENCE: f64 = 0.5;
pub const ANALYSIS_REQUIRED_NOTES: &str = "Manual review recommended";

/// Greedy: first `{` through last `}`.
static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("JSON object pattern is valid"));

/// Which step produced the hazard list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTier {
    Structured,
    TextFallback,
    NoReply,
}

impl ParseTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseTier::Structured => "structured",
            ParseTier::TextFallback => "text_fallback",
            ParseTier::NoReply => "no_reply",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub hazards: Vec<DetectedHazard>,
    pub tier: ParseTier,
}

/// Parse the model's reply. Blank replies count as no reply.
pub fn parse_reply(reply: Option<&str>) -> ParsedReply {
    let Some(text) = reply.filter(|text| !text.trim().is_empty()) else {
        return ParsedReply {
            hazards: vec![DetectedHazard::new(
                ANALYSIS_REQUIRED_TAG,
                ANALYSIS_REQUIRED_CONFIDENCE,
                ANALYSIS_REQUIRED_NOTES,
            )],
            tier: ParseTier::NoReply,
        };
    };

    match extract_hazards(text) {
        Some(hazards) => ParsedReply {
            hazards,
            tier: ParseTier::Structured,
        },
        None => ParsedReply {
            hazards: vec![DetectedHazard::new(
                GENERAL_CONCERN_TAG,
                GENERAL_CONCERN_CONFIDENCE,
                text.chars().take(GENERAL_CONCERN_NOTES_CHARS).collect::<String>(),
            )],
            tier: ParseTier::TextFallback,
        },
    }
}

/// `None` when no JSON object can be found or parsed.
fn extract_hazards(text: &str) -> Option<Vec<DetectedHazard>> {
    let candidate = JSON_OBJECT.find(text)?;

    let value: Value = match serde_json::from_str(candidate.as_str()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Model reply contained malformed JSON");
            return None;
        }
    };

    let hazards = match value.get("hazards") {
        Some(Value::Array(items)) => items.iter().filter_map(to_hazard).collect(),
        _ => Vec::new(),
    };

    Some(hazards)
}

/// One hazard entry as the model writes it. `notes` may be absent or null.
#[derive(Debug, Deserialize)]
struct ModelHazard {
    tag: String,
    confidence: f64,
    #[serde(default)]
    notes: Option<String>,
}

/// Entries the model got wrong are dropped rather than failing the list.
fn to_hazard(item: &Value) -> Option<DetectedHazard> {
    match serde_json::from_value::<ModelHazard>(item.clone()) {
        Ok(hazard) => Some(DetectedHazard::new(
            hazard.tag,
            hazard.confidence,
            hazard.notes.unwrap_or_default(),
        )),
        Err(e) => {
            tracing::warn!(error = %e, entry = %item, "Skipping malformed hazard entry");
            None
        }
    }
}
