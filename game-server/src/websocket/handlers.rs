use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::game_manager::GameManager;
use crate::websocket::connection::ConnectionManager;
use game_types::{ClientMessage, ConnectionId, ServerMessage};

#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    connection_manager: Arc<ConnectionManager>,
    game_manager: Arc<GameManager>,
}

impl MessageHandler {
    pub fn new(
        connection_id: ConnectionId,
        connection_manager: Arc<ConnectionManager>,
        game_manager: Arc<GameManager>,
    ) -> Self {
        Self {
            connection_id,
            connection_manager,
            game_manager,
        }
    }

    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        match message {
            ClientMessage::JoinRoom {
                room_code,
                nickname,
            } => self.handle_join_room(room_code, nickname).await,
            ClientMessage::ClientReady => {
                self.game_manager.client_ready(self.connection_id).await;
                Ok(())
            }
            ClientMessage::CanvasState(snapshot) => {
                self.game_manager
                    .canvas_state(self.connection_id, snapshot)
                    .await;
                Ok(())
            }
            ClientMessage::DrawLine(line) => {
                self.game_manager.draw_line(self.connection_id, line).await;
                Ok(())
            }
            ClientMessage::Clear => {
                self.game_manager.clear_canvas(self.connection_id).await;
                Ok(())
            }
            ClientMessage::SubmitWord {
                room_code, word, ..
            } => {
                self.game_manager
                    .submit_word(self.connection_id, room_code.as_deref(), &word)
                    .await;
                Ok(())
            }
            ClientMessage::GuessWord {
                room_code, guess, ..
            } => {
                self.game_manager
                    .guess_word(self.connection_id, room_code.as_deref(), &guess)
                    .await;
                Ok(())
            }
            ClientMessage::ChangeName {
                room_code,
                old_name,
                new_name,
            } => {
                self.handle_change_name(room_code.as_deref(), &old_name, &new_name)
                    .await
            }
            ClientMessage::InitiateVoteKick {
                room_code, player, ..
            } => {
                self.game_manager
                    .initiate_vote_kick(self.connection_id, room_code.as_deref(), &player)
                    .await;
                Ok(())
            }
            ClientMessage::SendChatMessage { message, .. } => {
                self.game_manager
                    .send_chat(self.connection_id, &message)
                    .await;
                Ok(())
            }
            ClientMessage::LeaveRoom => {
                info!("Connection {} leaving its room", self.connection_id);
                self.game_manager.leave_room(self.connection_id).await;
                Ok(())
            }
            ClientMessage::Heartbeat => Ok(()),
        }
    }

    pub async fn handle_disconnect(&self) {
        info!("Handling disconnect for connection {}", self.connection_id);
        self.game_manager.leave_room(self.connection_id).await;
    }

    async fn handle_join_room(&self, room_code: String, nickname: String) -> Result<(), String> {
        info!(
            "Connection {} joining room {} as {}",
            self.connection_id, room_code, nickname
        );

        match self
            .game_manager
            .join_room(self.connection_id, &room_code, &nickname)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Join rejected for {}: {}", self.connection_id, e);
                self.send_error(&e.to_string()).await
            }
        }
    }

    async fn handle_change_name(
        &self,
        room_code: Option<&str>,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), String> {
        let result = self
            .game_manager
            .change_name(self.connection_id, room_code, old_name, new_name)
            .await;

        let reply = match result {
            Ok(()) => ServerMessage::NameChangeResult {
                success: true,
                message: None,
            },
            Err(e) => {
                debug!("Rename rejected for {}: {}", self.connection_id, e);
                ServerMessage::NameChangeResult {
                    success: false,
                    message: Some(e.to_string()),
                }
            }
        };
        self.send_message(reply).await
    }

    async fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.connection_manager
            .send_to_connection(self.connection_id, message)
            .await
    }

    async fn send_error(&self, error_message: &str) -> Result<(), String> {
        self.send_message(ServerMessage::Error {
            message: error_message.to_string(),
        })
        .await
    }
}
