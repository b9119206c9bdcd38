use crate::models::HazardRecord;
use crate::services::HazardFilters;
use serde::{Deserialize, Serialize};

/// Body of `POST /heatmap-data`.
#[derive(Debug, Default, Deserialize)]
pub struct HeatmapQuery {
    #[serde(default)]
    pub filters: HazardFilters,
}

#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    pub hazards: Vec<HazardRecord>,
}
