use serde::{Deserialize, Serialize};

/// A hazard reported by the vision model for one photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedHazard {
    pub tag: String,
    /// Model-reported strength in `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub notes: String,
    /// Reserved for localisation; never populated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DetectedHazard {
    pub fn new(tag: impl Into<String>, confidence: f64, notes: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            confidence: confidence.clamp(0.0, 1.0),
            notes: notes.into(),
            bbox: None,
        }
    }

    pub fn level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }
}

/// Review bucket used when triaging detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            ConfidenceLevel::High
        } else if confidence >= 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Per-level counts of a hazard list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HazardSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl HazardSummary {
    pub fn from_hazards(hazards: &[DetectedHazard]) -> Self {
        hazards
            .iter()
            .fold(Self::default(), |mut summary, hazard| {
                match hazard.level() {
                    ConfidenceLevel::High => summary.high += 1,
                    ConfidenceLevel::Medium => summary.medium += 1,
                    ConfidenceLevel::Low => summary.low += 1,
                }
                summary
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub hazards: Vec<DetectedHazard>,
    /// The submitted photo as a data URI; no overlay is drawn.
    pub annotated_image: Option<String>,
}
