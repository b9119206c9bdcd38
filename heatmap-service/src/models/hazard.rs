use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A reported hazard pinned to the site map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardRecord {
    pub id: String,
    /// Serialized inline as `lat` / `lng`.
    #[serde(flatten)]
    pub location: Location,
    pub severity: Severity,
    pub category: String,
    pub site: String,
    pub area: String,
    pub shift: String,
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}
