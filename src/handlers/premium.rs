use axum::{extract::State, http::StatusCode, Json};

use crate::{
    models::{common::ErrorResponse, premium::PremiumResponse},
    AppState,
};

/// Handler for GET /api/kimchi
/// Upbit KRW prices against Binance USDT prices, highest premium first
pub async fn get_kimchi_premium(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<PremiumResponse>), (StatusCode, Json<ErrorResponse>)> {
    match state.premium.get_premiums().await {
        Ok(response) => {
            tracing::info!(
                "Serving {} kimchi premiums (rate {}, fallback: {})",
                response.data.len(),
                response.exchange_rate,
                response.rate_is_fallback
            );
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            tracing::error!("Failed to calculate kimchi premium: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to calculate kimchi premium".to_string(),
                }),
            ))
        }
    }
}
