//! CLI chat client for a room-scoped WebSocket relay.
//!
//! Connects to a room, prints the backlog delivered on attach and all live
//! messages from other participants, and sends lines from stdin.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-client -- --room lobby --nick alice
//! cargo run --bin idobata-client -- -r lobby
//! ```

use clap::Parser;

use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "CLI chat client for a room-scoped relay", long_about = None)]
struct Args {
    /// Server URL (without the /ws path)
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080")]
    url: String,

    /// Room to attach to
    #[arg(short = 'r', long, default_value = "lobby")]
    room: String,

    /// Display nickname attached to sent messages (server defaults to "Guest")
    #[arg(short = 'n', long)]
    nick: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = idobata_client::runner::run_client(args.url, args.room, args.nick).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
