#![allow(dead_code)]

use game_core::{GameEvent, Room, RoomCode, RoomRegistry, RoomSettings};
use game_types::{ConnectionId, ServerMessage};

pub const TEST_ROOM: &str = "AB12C";

/// A registry with one room and a handful of named connections.
pub struct TestTable {
    pub registry: RoomRegistry,
    pub code: RoomCode,
    seats: Vec<(String, ConnectionId)>,
}

impl TestTable {
    pub fn new() -> Self {
        Self::with_settings(RoomSettings::default())
    }

    pub fn with_round_seconds(round_seconds: u32) -> Self {
        Self::with_settings(RoomSettings {
            round_seconds,
            ..RoomSettings::default()
        })
    }

    pub fn with_settings(settings: RoomSettings) -> Self {
        Self {
            registry: RoomRegistry::new(settings),
            code: RoomCode::parse(TEST_ROOM).unwrap(),
            seats: Vec::new(),
        }
    }

    /// Joins a fresh connection under `nickname` and returns the events of the join.
    pub fn join(&mut self, nickname: &str) -> Vec<GameEvent> {
        let connection_id = ConnectionId::new();
        self.seats.push((nickname.to_string(), connection_id));
        self.registry
            .join(connection_id, TEST_ROOM, nickname)
            .expect("join should succeed")
    }

    pub fn seat(&mut self, nicknames: &[&str]) {
        for nickname in nicknames {
            self.join(nickname);
        }
    }

    pub fn conn(&self, nickname: &str) -> ConnectionId {
        self.seats
            .iter()
            .find(|(n, _)| n == nickname)
            .map(|(_, id)| *id)
            .unwrap_or_else(|| panic!("no seat for {nickname}"))
    }

    /// Display name as assigned on join.
    pub fn name(&self, nickname: &str) -> String {
        self.conn(nickname).display_name(nickname)
    }

    pub fn room(&self) -> &Room {
        self.registry.room(&self.code).expect("room should exist")
    }

    pub fn submit(&mut self, nickname: &str, word: &str) -> Vec<GameEvent> {
        let id = self.conn(nickname);
        self.registry.submit_word(id, Some(TEST_ROOM), word)
    }

    pub fn guess(&mut self, nickname: &str, guess: &str) -> Vec<GameEvent> {
        let id = self.conn(nickname);
        self.registry.guess_word(id, Some(TEST_ROOM), guess)
    }

    pub fn vote(&mut self, voter: &str, target: &str) -> Vec<GameEvent> {
        let id = self.conn(voter);
        let target = self.name(target);
        self.registry.initiate_vote_kick(id, Some(TEST_ROOM), &target)
    }
}

/// Messages `connection_id` would receive, in order.
pub fn messages_for(events: &[GameEvent], connection_id: ConnectionId) -> Vec<ServerMessage> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::Deliver {
                recipients,
                message,
            } if recipients.contains(&connection_id) => Some(message.clone()),
            _ => None,
        })
        .collect()
}

pub fn started_epoch(events: &[GameEvent]) -> Option<u64> {
    events.iter().find_map(|event| match event {
        GameEvent::StartTimer { epoch, .. } => Some(*epoch),
        _ => None,
    })
}

pub fn has_stop_timer(events: &[GameEvent]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, GameEvent::StopTimer { .. }))
}
