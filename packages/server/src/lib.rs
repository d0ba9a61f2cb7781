//! Room-scoped WebSocket message relay library.
//!
//! Clients attach to a named chat room over a persistent WebSocket, send
//! messages, and receive messages sent by other participants in that room,
//! including messages sent while they were disconnected (bounded by a
//! 48-hour retention window).

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
