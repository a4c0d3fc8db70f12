#![allow(dead_code)]

use game_core::RoomSettings;
use game_server::game_manager::GameManager;
use game_server::websocket::ConnectionManager;
use game_types::{ConnectionId, ServerMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

pub const TEST_ROOM: &str = "AB12C";

/// A connected test client: its id and the queue the server writes into.
pub struct TestClient {
    pub id: ConnectionId,
    pub name: String,
    pub receiver: UnboundedReceiver<ServerMessage>,
}

impl TestClient {
    /// Everything delivered so far, without waiting.
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            messages.push(message);
        }
        messages
    }

    /// Waits up to two seconds for a message accepted by `matches`.
    pub async fn recv_until(&mut self, matches: impl Fn(&ServerMessage) -> bool) -> ServerMessage {
        let wait = async {
            while let Some(message) = self.receiver.recv().await {
                if matches(&message) {
                    return Some(message);
                }
            }
            None
        };
        timeout(Duration::from_secs(2), wait)
            .await
            .expect("Timed out waiting for message")
            .expect("Connection closed while waiting")
    }
}

/// Test setup that provides all necessary components
pub struct TestGameServerSetup {
    pub connection_manager: Arc<ConnectionManager>,
    pub game_manager: Arc<GameManager>,
}

impl TestGameServerSetup {
    pub fn new() -> Self {
        Self::with_timing(60, Duration::from_secs(1))
    }

    /// Short rounds and fast ticks so countdowns finish inside a test.
    pub fn with_timing(round_seconds: u32, tick: Duration) -> Self {
        let connection_manager = Arc::new(ConnectionManager::new());
        let settings = RoomSettings {
            round_seconds,
            ..RoomSettings::default()
        };
        Self {
            connection_manager: connection_manager.clone(),
            game_manager: GameManager::new(connection_manager, settings, tick),
        }
    }

    /// Opens a connection and joins it to the test room.
    pub async fn join(&self, nickname: &str) -> TestClient {
        let id = ConnectionId::new();
        let receiver = self.connection_manager.create_connection(id).await;
        self.game_manager
            .join_room(id, TEST_ROOM, nickname)
            .await
            .expect("join should succeed");
        TestClient {
            id,
            name: id.display_name(nickname),
            receiver,
        }
    }

    pub async fn join_all(&self, nicknames: &[&str]) -> Vec<TestClient> {
        let mut clients = Vec::new();
        for nickname in nicknames {
            clients.push(self.join(nickname).await);
        }
        clients
    }

    pub async fn submit_word(&self, client: &TestClient, word: &str) {
        self.game_manager
            .submit_word(client.id, Some(TEST_ROOM), word)
            .await;
    }

    pub async fn guess_word(&self, client: &TestClient, guess: &str) {
        self.game_manager
            .guess_word(client.id, Some(TEST_ROOM), guess)
            .await;
    }
}

pub fn is_timer_update(message: &ServerMessage) -> bool {
    matches!(message, ServerMessage::TimerUpdate(_))
}
