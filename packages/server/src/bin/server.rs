//! Room-scoped WebSocket chat relay server.
//!
//! Clients attach to a named room over `/ws/{room_id}`, send messages, and
//! receive messages from other participants in the same room, including a
//! 48-hour backlog of messages sent while they were away.
//!
//! Run with:
//! ```not_rust
//! DATABASE_URL=postgres://... cargo run --bin idobata-server
//! DATABASE_URL=postgres://... cargo run --bin idobata-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use idobata_server::{
    infrastructure::registry::InMemoryRoomRegistry,
    ui::Server,
    usecase::{
        AttachParticipantUseCase, CheckStoreHealthUseCase, DetachParticipantUseCase,
        GetRoomsUseCase, PublishMessageUseCase,
    },
};
use idobata_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Room-scoped WebSocket chat relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Required startup configuration; missing config is the only
    // process-fatal condition
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::error!("DATABASE_URL is not set");
            std::process::exit(1);
        }
    };

    // Lazy pool: chat delivery is in-memory and keeps working even when the
    // store is unreachable; only the health endpoint notices
    let pool = match PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(&database_url)
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Invalid DATABASE_URL: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Registry
    // 2. Clock
    // 3. UseCases
    // 4. Server

    // 1. Create Registry (in-memory room table)
    let registry = Arc::new(InMemoryRoomRegistry::new());

    // 2. Create Clock (system time, UTC)
    let clock = Arc::new(SystemClock);

    // 3. Create UseCases
    let attach_participant_usecase = Arc::new(AttachParticipantUseCase::new(registry.clone()));
    let publish_message_usecase =
        Arc::new(PublishMessageUseCase::new(registry.clone(), clock));
    let detach_participant_usecase = Arc::new(DetachParticipantUseCase::new(registry.clone()));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let check_store_health_usecase = Arc::new(CheckStoreHealthUseCase::new(pool));

    // 4. Create and run the server
    let server = Server::new(
        attach_participant_usecase,
        publish_message_usecase,
        detach_participant_usecase,
        get_rooms_usecase,
        check_store_health_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
