//! CLI chat client library for the Idobata relay.
//!
//! Connects to a room over WebSocket, prints messages from other
//! participants (including the backlog delivered on attach), and sends
//! lines read from the terminal.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;
