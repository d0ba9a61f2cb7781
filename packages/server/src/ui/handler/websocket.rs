//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, RoomId},
    infrastructure::dto::websocket::{InboundFrame, OutboundFrame},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    // Room ids are opaque, client-supplied strings; no validation, no
    // pre-creation. The room comes into existence on attach.
    let room_id = RoomId::new(room_id);

    ws.on_upgrade(move |socket| handle_socket(socket, state, room_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: messages from other
/// connections in the room (via rx channel) are written to this client's
/// WebSocket. Socket I/O happens here, never under the registry lock.
///
/// # Arguments
///
/// * `rx` - Channel receiver for messages fanned out by the registry
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId) {
    let connection_id = ConnectionId::generate();
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive fanned-out messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Register the connection and take the backlog snapshot in one step.
    // Anything published after this point arrives through the rx channel,
    // so the client sees the backlog first, then live traffic, with no
    // message lost or duplicated in between.
    let backlog = state
        .attach_participant_usecase
        .execute(&room_id, connection_id, tx)
        .await;

    // Deliver history to the newly joined connection before any live fan-out
    for message in backlog {
        let json = serde_json::to_string(&OutboundFrame::from(message)).unwrap();
        if let Err(e) = sender.send(Message::Text(json.into())).await {
            tracing::warn!(
                "Failed to deliver backlog to connection {}: {}",
                connection_id,
                e
            );
            state
                .detach_participant_usecase
                .execute(&room_id, &connection_id)
                .await;
            return;
        }
    }

    let room_id_clone = room_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive messages from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text: {}", text);

                    // Parse the incoming frame. Missing fields are filled with
                    // defaults downstream; non-JSON text is treated as bare
                    // content. There is no reject path.
                    let frame = match serde_json::from_str::<InboundFrame>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!("Failed to parse frame as JSON: {}", e);
                            InboundFrame {
                                nick: None,
                                content: Some(text.to_string()),
                            }
                        }
                    };

                    // Normalization, server-side timestamp, append+prune and
                    // fan-out all happen inside the usecase/registry cycle
                    state_clone
                        .publish_message_usecase
                        .execute(&room_id_clone, &connection_id, frame.nick, frame.content)
                        .await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection {} requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push fanned-out messages to this connection
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Exactly one detach per connection lifetime; the connection object is
    // not reusable after this point (a reconnect is a new connection).
    state
        .detach_participant_usecase
        .execute(&room_id, &connection_id)
        .await;
}
