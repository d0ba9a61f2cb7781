//! Message formatting utilities for client display.

use idobata_server::infrastructure::dto::websocket::OutboundFrame;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a chat message received from the room
    ///
    /// # Arguments
    ///
    /// * `frame` - The outbound frame received from the server
    ///
    /// # Returns
    ///
    /// A formatted string with the chat message
    pub fn format_chat_message(frame: &OutboundFrame) -> String {
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            frame.nick, frame.content, frame.timestamp
        )
    }

    /// Format a raw text message that could not be parsed as a frame
    ///
    /// # Arguments
    ///
    /// * `text` - The raw message text
    ///
    /// # Returns
    ///
    /// A formatted string with the raw message
    pub fn format_raw_message(text: &str) -> String {
        format!("\n{}\n", text)
    }

    /// Format a confirmation message after sending
    ///
    /// # Arguments
    ///
    /// * `sent_at` - RFC 3339 timestamp of the send
    ///
    /// # Returns
    ///
    /// A formatted string with the sent confirmation
    pub fn format_sent_confirmation(sent_at: &str) -> String {
        format!("sent at {}\n", sent_at)
    }

    /// Format a binary message notification
    ///
    /// # Arguments
    ///
    /// * `byte_count` - The number of bytes received
    ///
    /// # Returns
    ///
    /// A formatted string with the binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n(binary message, {} bytes)\n", byte_count)
    }
}
