//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub connections: usize,
    pub backlog: usize,
}

/// Successful store round-trip response for `GET /api/health/db`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreHealthDto {
    pub status: String,
    pub result: i32,
}

/// Failure payload carrying a descriptive detail string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetailDto {
    pub detail: String,
}
