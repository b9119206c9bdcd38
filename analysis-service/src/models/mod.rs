pub mod hazard;

pub use hazard::{AnalysisResult, BoundingBox, ConfidenceLevel, DetectedHazard, HazardSummary};
