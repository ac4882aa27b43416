use axum::{extract::State, Json};

use crate::{models::overview::OverviewResponse, AppState};

/// Handler for GET /api/overview
pub async fn get_market_overview(State(state): State<AppState>) -> Json<OverviewResponse> {
    Json(state.overview.get_overview().await)
}
