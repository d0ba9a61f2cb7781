//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    AttachParticipantUseCase, CheckStoreHealthUseCase, DetachParticipantUseCase, GetRoomsUseCase,
    PublishMessageUseCase,
};

use super::{
    handler::{
        http::{get_rooms, health_check, root_status, store_health_check},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Room-scoped WebSocket relay server
///
/// This struct encapsulates the server dependencies and provides methods to
/// run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     attach_participant_usecase,
///     publish_message_usecase,
///     detach_participant_usecase,
///     get_rooms_usecase,
///     check_store_health_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// AttachParticipantUseCase（接続 attach のユースケース）
    attach_participant_usecase: Arc<AttachParticipantUseCase>,
    /// PublishMessageUseCase（メッセージ publish のユースケース）
    publish_message_usecase: Arc<PublishMessageUseCase>,
    /// DetachParticipantUseCase（接続 detach のユースケース）
    detach_participant_usecase: Arc<DetachParticipantUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// CheckStoreHealthUseCase（ストア疎通確認のユースケース）
    check_store_health_usecase: Arc<CheckStoreHealthUseCase>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `attach_participant_usecase` - UseCase for attaching a connection
    /// * `publish_message_usecase` - UseCase for publishing a message
    /// * `detach_participant_usecase` - UseCase for detaching a connection
    /// * `get_rooms_usecase` - UseCase for listing live rooms
    /// * `check_store_health_usecase` - UseCase for the store round-trip check
    pub fn new(
        attach_participant_usecase: Arc<AttachParticipantUseCase>,
        publish_message_usecase: Arc<PublishMessageUseCase>,
        detach_participant_usecase: Arc<DetachParticipantUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        check_store_health_usecase: Arc<CheckStoreHealthUseCase>,
    ) -> Self {
        Self {
            attach_participant_usecase,
            publish_message_usecase,
            detach_participant_usecase,
            get_rooms_usecase,
            check_store_health_usecase,
        }
    }

    /// Run the relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            attach_participant_usecase: self.attach_participant_usecase,
            publish_message_usecase: self.publish_message_usecase,
            detach_participant_usecase: self.detach_participant_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            check_store_health_usecase: self.check_store_health_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws/{room_id}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/", get(root_status))
            .route("/api/health", get(health_check))
            .route("/api/health/db", get(store_health_check))
            .route("/api/rooms", get(get_rooms))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws/{{room_id}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
