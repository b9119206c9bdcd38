use crate::dtos::{HeatmapQuery, HeatmapResponse};
use crate::services::FilterOptions;
use crate::startup::AppState;
use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use metrics::histogram;
use service_core::error::AppError;

/// `POST /heatmap-data`
pub async fn query_hazards(
    State(state): State<AppState>,
    WithRejection(Json(query), _): WithRejection<Json<HeatmapQuery>, AppError>,
) -> Result<Json<HeatmapResponse>, AppError> {
    let records = state.repository.list_hazards().await?;
    let total = records.len();

    let hazards = query.filters.apply(records);

    tracing::info!(
        filters = ?query.filters,
        unfiltered = query.filters.is_unfiltered(),
        total,
        matched = hazards.len(),
        "Hazard query served"
    );
    histogram!("heatmap_query_results").record(hazards.len() as f64);

    Ok(Json(HeatmapResponse { hazards }))
}

/// `GET /heatmap-data/options`
pub async fn filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptions>, AppError> {
    let records = state.repository.list_hazards().await?;
    Ok(Json(FilterOptions::from_records(&records)))
}
