//! Conversion logic between DTOs and domain entities.

use idobata_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, RoomSummary};
use crate::infrastructure::dto::http::RoomSummaryDto;
use crate::infrastructure::dto::websocket::OutboundFrame;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChatMessage> for OutboundFrame {
    fn from(model: ChatMessage) -> Self {
        Self {
            nick: model.nick.into_string(),
            content: model.content.into_string(),
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
        }
    }
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(model: RoomSummary) -> Self {
        Self {
            id: model.id.into_string(),
            connections: model.connections,
            backlog: model.backlog,
        }
    }
}
