//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use idobata_server::infrastructure::dto::websocket::{InboundFrame, OutboundFrame};
use idobata_shared::time::{get_utc_timestamp, timestamp_to_rfc3339};

use crate::{
    domain::build_room_url,
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run the WebSocket client session
///
/// Connects to the room, prints the backlog and live messages from other
/// participants, and sends lines read from the terminal as inbound frames.
pub async fn run_client_session(
    url: &str,
    room: &str,
    nick: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ws_url = build_room_url(url, room);

    let (ws_stream, _response) = match connect_async(&ws_url).await {
        Ok(result) => result,
        Err(e) => {
            return Err(Box::new(ClientError::ConnectionError(e.to_string())));
        }
    };

    tracing::info!("Connected to chat server!");
    let display_nick = nick.unwrap_or("Guest");
    println!(
        "\nYou are '{}' in room '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        display_nick, room
    );

    let (mut write, mut read) = ws_stream.split();

    // Clone nick for read task
    let nick_for_read = display_nick.to_string();

    // Spawn a task to handle incoming messages (backlog first, then live)
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    // Try to parse as an outbound chat frame
                    if let Ok(frame) = serde_json::from_str::<OutboundFrame>(&text) {
                        let formatted = MessageFormatter::format_chat_message(&frame);
                        print!("{}", formatted);
                    }
                    // If parsing fails, display as raw text
                    else {
                        let formatted = MessageFormatter::format_raw_message(&text);
                        print!("{}", formatted);
                    }
                    redisplay_prompt(&nick_for_read);
                }
                Ok(Message::Binary(data)) => {
                    let formatted = MessageFormatter::format_binary_message(data.len());
                    print!("{}", formatted);
                    redisplay_prompt(&nick_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt_nick = display_nick.to_string();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", prompt_nick);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to handle terminal input and send it to the room
    let nick_for_write = nick.map(|n| n.to_string());
    let prompt_nick_for_write = display_nick.to_string();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            // The nick field is omitted when not configured; the server
            // normalizes it to "Guest"
            let frame = InboundFrame {
                nick: nick_for_write.clone(),
                content: Some(line),
            };

            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize frame: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }

            // Display sent timestamp and redisplay prompt; the server assigns
            // the authoritative timestamp on receipt
            let sent_at = timestamp_to_rfc3339(get_utc_timestamp());
            let formatted = MessageFormatter::format_sent_confirmation(&sent_at);
            print!("\n{}", formatted);
            redisplay_prompt(&prompt_nick_for_write);
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if let Ok(true) = read_result {
                return Err(Box::new(ClientError::ConnectionError(
                    "connection closed by server".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if let Ok(true) = write_result {
                return Err(Box::new(ClientError::ConnectionError(
                    "failed to send message".to_string(),
                )));
            }
        }
    }

    Ok(())
}
