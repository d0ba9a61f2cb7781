//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement client-side decisions
//! without side effects, making them easy to test.

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `current_attempt` - The current reconnection attempt count (1-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
///
/// # Returns
///
/// `true` if reconnection should be attempted, `false` otherwise
pub fn should_attempt_reconnect(current_attempt: u32, max_attempts: u32) -> bool {
    current_attempt < max_attempts
}

/// Build the WebSocket URL for a room.
///
/// # Arguments
///
/// * `base_url` - The server URL without the `/ws` path (e.g., "ws://127.0.0.1:8080")
/// * `room` - The room id to attach to
///
/// # Returns
///
/// The full WebSocket URL for the room
pub fn build_room_url(base_url: &str, room: &str) -> String {
    format!("{}/ws/{}", base_url.trim_end_matches('/'), room)
}
