//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::http::{ErrorDetailDto, RoomSummaryDto, StoreHealthDto},
    ui::state::AppState,
};

/// Root status endpoint (static liveness message)
pub async fn root_status() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "Idobata server is running!"}))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Store connectivity check (`SELECT 1` round-trip)
///
/// Chat delivery does not depend on the store; this endpoint only reports
/// whether the dependency is reachable.
pub async fn store_health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StoreHealthDto>, (StatusCode, Json<ErrorDetailDto>)> {
    match state.check_store_health_usecase.execute().await {
        Ok(result) => Ok(Json(StoreHealthDto {
            status: "Database connected".to_string(),
            result,
        })),
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDetailDto {
                    detail: e.to_string(),
                }),
            ))
        }
    }
}

/// Get list of live rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let summaries = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> =
        summaries.into_iter().map(RoomSummaryDto::from).collect();

    Json(room_summaries)
}
