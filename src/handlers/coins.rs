use axum::{extract::State, http::StatusCode, Json};

use crate::{models::common::ErrorResponse, AppState};

/// Handler for GET /api/coins
/// Top 100 coins by market cap, passed through from CoinGecko
pub async fn get_top_coins(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    match state.coingecko.fetch_top_coins().await {
        Ok(coins) => Ok(Json(coins)),
        Err(e) if e.is_status() => {
            tracing::warn!("CoinGecko refused top coins request: {}", e);
            Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse {
                    error: "CoinGecko rate limited".to_string(),
                }),
            ))
        }
        Err(e) => {
            tracing::error!("Failed to fetch coins: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch coins".to_string(),
                }),
            ))
        }
    }
}
