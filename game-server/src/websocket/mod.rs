use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::game_manager::GameManager;
use game_types::{ClientMessage, ConnectionId, ServerMessage};

pub mod connection;
pub mod handlers;
pub mod rate_limiter;


pub use connection::ConnectionManager;
use handlers::MessageHandler;
use rate_limiter::RateLimiter;

pub async fn handle_connection(
    websocket: WebSocket,
    connection_manager: Arc<ConnectionManager>,
    game_manager: Arc<GameManager>,
    rate_limiter: RateLimiter,
) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut ws_sender, mut ws_receiver) = websocket.split();

    let message_receiver = connection_manager.create_connection(connection_id).await;

    let message_handler = MessageHandler::new(
        connection_id,
        connection_manager.clone(),
        game_manager.clone(),
    );

    let incoming_handler = {
        let message_handler = message_handler.clone();
        let connection_manager = connection_manager.clone();
        let mut rate_limiter = rate_limiter;

        async move {
            while let Some(result) = ws_receiver.next().await {
                match result {
                    Ok(msg) => {
                        if msg.is_close() {
                            break;
                        }
                        // any frame counts as activity, pings included
                        connection_manager.update_activity(connection_id).await;
                        if !rate_limiter.check_rate_limit() {
                            warn!("Rate limit exceeded for connection {}, dropping frame", connection_id);
                            continue;
                        }
                        if let Err(e) = handle_message(msg, &message_handler).await {
                            warn!("Rejected message from {}: {}", connection_id, e);
                            let _ = connection_manager
                                .send_to_connection(connection_id, ServerMessage::Error { message: e })
                                .await;
                        }
                    }
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", connection_id, e);
                        break;
                    }
                }
            }
        }
    };

    let outgoing_handler = {
        async move {
            let mut receiver = message_receiver;

            while let Some(message) = receiver.recv().await {
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize message: {:?}", e);
                        continue;
                    }
                };

                if let Err(e) = ws_sender.send(Message::text(json)).await {
                    warn!("Failed to send message to {}: {:?}", connection_id, e);
                    break;
                }
            }
        }
    };

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    info!("Connection {} disconnected", connection_id);
    message_handler.handle_disconnect().await;
    connection_manager.remove_connection(connection_id).await;
}

async fn handle_message(msg: Message, message_handler: &MessageHandler) -> Result<(), String> {
    // pings and binary frames carry nothing for the game
    if !msg.is_text() {
        return Ok(());
    }

    let text = msg.to_str().map_err(|_| "Invalid text message".to_string())?;

    let client_message: ClientMessage =
        serde_json::from_str(text).map_err(|e| format!("Invalid JSON message: {}", e))?;

    message_handler.handle_message(client_message).await
}
