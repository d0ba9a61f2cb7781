//! Data Transfer Objects (DTOs) for the relay server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame DTOs
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
