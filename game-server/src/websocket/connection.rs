use game_types::{ConnectionId, ServerMessage};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info};

/// Outbound side of one socket plus the time it last sent us anything.
#[derive(Debug)]
struct Connection {
    sender: mpsc::UnboundedSender<ServerMessage>,
    last_activity: Instant,
}

impl Connection {
    fn send(&self, message: ServerMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .map_err(|_| "Connection closed".to_string())
    }

    fn idle_for(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// Outbound queues for every open socket. Dropping an entry closes the socket's writer.
#[derive(Default)]
pub struct ConnectionManager {
    connections: RwLock<HashMap<ConnectionId, Connection>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a socket and hands back the queue its writer task drains.
    pub async fn create_connection(&self, id: ConnectionId) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection = Connection {
            sender,
            last_activity: Instant::now(),
        };
        self.connections.write().await.insert(id, connection);
        receiver
    }

    pub async fn remove_connection(&self, id: ConnectionId) -> bool {
        self.connections.write().await.remove(&id).is_some()
    }

    pub async fn update_activity(&self, id: ConnectionId) {
        if let Some(connection) = self.connections.write().await.get_mut(&id) {
            connection.last_activity = Instant::now();
        }
    }

    pub async fn send_to_connection(&self, id: ConnectionId, message: ServerMessage) -> Result<(), String> {
        match self.connections.read().await.get(&id) {
            Some(connection) => connection.send(message),
            None => Err("Connection not found".to_string()),
        }
    }

    /// Best effort: recipients that already went away are skipped.
    pub async fn send_to_many(&self, ids: &[ConnectionId], message: &ServerMessage) {
        let connections = self.connections.read().await;
        for id in ids {
            let Some(connection) = connections.get(id) else {
                debug!("Dropping message for unknown connection {}", id);
                continue;
            };
            if let Err(e) = connection.send(message.clone()) {
                debug!("Dropping message for {}: {}", id, e);
            }
        }
    }

    /// Removes idle connections and returns them so their room membership can be unwound.
    pub async fn cleanup_inactive_connections(&self, timeout: Duration) -> Vec<ConnectionId> {
        let mut connections = self.connections.write().await;
        let idle: Vec<ConnectionId> = connections
            .iter()
            .filter(|(_, connection)| connection.idle_for(timeout))
            .map(|(id, _)| *id)
            .collect();

        for id in &idle {
            info!("Removing inactive connection: {}", id);
            connections.remove(id);
        }
        idle
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}
