//! Shared utilities for the Idobata chat workspace.
//!
//! This crate holds the pieces both binaries need: the clock abstraction with
//! UTC timestamp helpers, and the tracing-subscriber bootstrap.

pub mod logger;
pub mod time;
