use crate::dtos::AnalyzePhotoRequest;
use crate::error::AnalysisError;
use crate::models::AnalysisResult;
use crate::startup::AppState;
use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use metrics::counter;
use validator::Validate;

/// `POST /analyze-photo`
pub async fn analyze_photo(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<AnalyzePhotoRequest>, AnalysisError>,
) -> Result<Json<AnalysisResult>, AnalysisError> {
    request.validate()?;

    let outcome = state
        .analyzer
        .analyze(&request.image, request.notes.as_deref())
        .await;

    let label = if outcome.is_ok() { "ok" } else { "error" };
    counter!("hazard_analysis_requests_total", "outcome" => label).increment(1);

    Ok(Json(outcome?))
}
