use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let records = state
        .repository
        .list_hazards()
        .await
        .map(|records| records.len())
        .unwrap_or_default();

    Json(json!({
        "status": "ok",
        "service": "heatmap-service",
        "version": env!("CARGO_PKG_VERSION"),
        "records": records
    }))
}
