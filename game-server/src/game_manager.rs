use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::Config;
use crate::websocket::connection::ConnectionManager;
use game_core::{GameEvent, RoomCode, RoomRegistry, RoomSettings, TimerTick};
use game_types::{ConnectionId, DrawLine, GameError, RandomRoomResponse, RoomSummary};

struct RoomTimer {
    epoch: u64,
    handle: JoinHandle<()>,
}

/// Serializes every room mutation behind one lock and carries out the resulting
/// events: message delivery and the per-room countdown tasks.
///
/// Events are dispatched before the registry lock is released, so two operations
/// can never interleave their messages.
pub struct GameManager {
    registry: Mutex<RoomRegistry>,
    timers: DashMap<RoomCode, RoomTimer>,
    connection_manager: Arc<ConnectionManager>,
    tick_interval: Duration,
    self_ref: Weak<GameManager>,
}

impl GameManager {
    pub fn new(
        connection_manager: Arc<ConnectionManager>,
        settings: RoomSettings,
        tick_interval: Duration,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            registry: Mutex::new(RoomRegistry::new(settings)),
            timers: DashMap::new(),
            connection_manager,
            tick_interval,
            self_ref: self_ref.clone(),
        })
    }

    pub fn from_config(connection_manager: Arc<ConnectionManager>, config: &Config) -> Arc<Self> {
        Self::new(
            connection_manager,
            config.room_settings(),
            config.timer_tick(),
        )
    }

    pub async fn create_room(&self) -> RoomCode {
        let registry = self.registry.lock().await;
        let code = registry.create_room();
        info!("Generated room code {}", code);
        code
    }

    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        self.registry.lock().await.list_rooms()
    }

    /// An active room if there is one, otherwise a fresh code to create.
    pub async fn random_room(&self) -> RandomRoomResponse {
        let registry = self.registry.lock().await;
        match registry.pick_random_active_room() {
            Some(code) => RandomRoomResponse {
                success: true,
                room_id: code.to_string(),
            },
            None => RandomRoomResponse {
                success: false,
                room_id: registry.create_room().to_string(),
            },
        }
    }

    pub async fn room_exists(&self, room_code: &str) -> bool {
        match RoomCode::parse(room_code) {
            Ok(code) => self.registry.lock().await.is_active(&code),
            Err(_) => false,
        }
    }

    pub async fn room_players(&self, room_code: &RoomCode) -> Option<Vec<String>> {
        let registry = self.registry.lock().await;
        registry.room(room_code).map(|room| room.names())
    }

    pub async fn room_of(&self, connection_id: ConnectionId) -> Option<RoomCode> {
        let registry = self.registry.lock().await;
        registry.resolve_room(connection_id).cloned()
    }

    pub fn active_timer_count(&self) -> usize {
        self.timers.len()
    }

    pub async fn join_room(
        &self,
        connection_id: ConnectionId,
        room_code: &str,
        nickname: &str,
    ) -> Result<(), GameError> {
        let mut registry = self.registry.lock().await;
        let events = registry.join(connection_id, room_code, nickname)?;
        self.dispatch(events).await;
        Ok(())
    }

    pub async fn leave_room(&self, connection_id: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let events = registry.leave(connection_id);
        self.dispatch(events).await;
    }

    pub async fn change_name(
        &self,
        connection_id: ConnectionId,
        room_hint: Option<&str>,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), GameError> {
        let mut registry = self.registry.lock().await;
        let events = registry.change_name(connection_id, room_hint, old_name, new_name)?;
        self.dispatch(events).await;
        Ok(())
    }

    pub async fn submit_word(&self, connection_id: ConnectionId, room_hint: Option<&str>, word: &str) {
        let mut registry = self.registry.lock().await;
        let events = registry.submit_word(connection_id, room_hint, word);
        self.dispatch(events).await;
    }

    pub async fn guess_word(&self, connection_id: ConnectionId, room_hint: Option<&str>, guess: &str) {
        let mut registry = self.registry.lock().await;
        let events = registry.guess_word(connection_id, room_hint, guess);
        self.dispatch(events).await;
    }

    pub async fn initiate_vote_kick(
        &self,
        connection_id: ConnectionId,
        room_hint: Option<&str>,
        target: &str,
    ) {
        let mut registry = self.registry.lock().await;
        let events = registry.initiate_vote_kick(connection_id, room_hint, target);
        self.dispatch(events).await;
    }

    pub async fn draw_line(&self, connection_id: ConnectionId, line: DrawLine) {
        let mut registry = self.registry.lock().await;
        let events = registry.draw_line(connection_id, line);
        self.dispatch(events).await;
    }

    pub async fn clear_canvas(&self, connection_id: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let events = registry.clear_canvas(connection_id);
        self.dispatch(events).await;
    }

    pub async fn client_ready(&self, connection_id: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let events = registry.client_ready(connection_id);
        self.dispatch(events).await;
    }

    pub async fn canvas_state(&self, connection_id: ConnectionId, snapshot: String) {
        let mut registry = self.registry.lock().await;
        let events = registry.canvas_state(connection_id, snapshot);
        self.dispatch(events).await;
    }

    pub async fn send_chat(&self, connection_id: ConnectionId, message: &str) {
        let mut registry = self.registry.lock().await;
        let events = registry.chat(connection_id, message);
        self.dispatch(events).await;
    }

    /// One countdown step. Returns false once the ticker should stop.
    async fn on_tick(&self, room_code: &RoomCode, epoch: u64) -> bool {
        let mut registry = self.registry.lock().await;
        let (events, keep_running) = match registry.tick(room_code, epoch) {
            TimerTick::Running(events) => (events, true),
            TimerTick::Expired(events) => (events, false),
            TimerTick::Stale => (Vec::new(), false),
        };
        self.dispatch(events).await;

        if !keep_running
            && self
                .timers
                .remove_if(room_code, |_, timer| timer.epoch == epoch)
                .is_some()
        {
            debug!("Countdown {} for room {} finished", epoch, room_code);
        }
        keep_running
    }

    async fn dispatch(&self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Deliver {
                    recipients,
                    message,
                } => {
                    self.connection_manager
                        .send_to_many(&recipients, &message)
                        .await;
                }
                GameEvent::StartTimer { room_code, epoch } => {
                    self.start_timer(room_code, epoch);
                }
                GameEvent::StopTimer { room_code } => {
                    if let Some((_, timer)) = self.timers.remove(&room_code) {
                        timer.handle.abort();
                        debug!("Stopped countdown {} for room {}", timer.epoch, room_code);
                    }
                }
            }
        }
    }

    /// Not async: the ticker calls back into `dispatch`, which spawns tickers.
    fn start_timer(&self, room_code: RoomCode, epoch: u64) {
        let manager = self.self_ref.clone();
        let tick_interval = self.tick_interval;
        let task_room = room_code.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + tick_interval, tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                if !manager.on_tick(&task_room, epoch).await {
                    break;
                }
            }
        });

        if let Some(previous) = self
            .timers
            .insert(room_code.clone(), RoomTimer { epoch, handle })
        {
            previous.handle.abort();
        }
        info!("Started countdown {} for room {}", epoch, room_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> Arc<GameManager> {
        GameManager::new(
            Arc::new(ConnectionManager::new()),
            RoomSettings::default(),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_random_room_without_players_offers_fresh_code() {
        let manager = manager();
        let response = manager.random_room().await;

        assert!(!response.success);
        assert!(RoomCode::parse(&response.room_id).is_ok());
        assert!(!manager.room_exists(&response.room_id).await);
    }

    #[tokio::test]
    async fn test_join_reports_validation_errors() {
        let manager = manager();
        let result = manager.join_room(ConnectionId::new(), "nope", "Alice").await;
        assert!(matches!(result, Err(GameError::InvalidRoomCode { .. })));
        assert!(manager.list_rooms().await.is_empty());
    }
}
