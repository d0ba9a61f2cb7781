//! WebSocket frame DTOs.

use serde::{Deserialize, Serialize};

/// Inbound frame (client → server)
///
/// Both fields are optional. Missing fields are normalized with defaults
/// (`"Guest"` / empty string) rather than rejected; there is no error-frame
/// path in this protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundFrame {
    pub nick: Option<String>,
    pub content: Option<String>,
}

/// Outbound frame (server → client)
///
/// Sent both for live fan-out and for backlog delivery on attach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundFrame {
    pub nick: String,
    pub content: String,
    /// RFC 3339 UTC string, assigned server-side at receipt
    pub timestamp: String,
}
