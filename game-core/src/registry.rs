use std::collections::HashMap;

use game_types::{ConnectionId, DrawLine, GameError, RoomSummary, ServerMessage};
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::relay::{relay_chat, relay_clear, relay_draw_line};
use crate::{
    GameEvent, Outbox, Room, RoomCode, RoomSettings, TimerTick, validate_guess, validate_nickname,
    validate_secret_word,
};

/// Every live room plus the connection -> room index. Both sides are updated
/// inside the same call so they never disagree.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
    connection_rooms: HashMap<ConnectionId, RoomCode>,
    settings: RoomSettings,
}

impl RoomRegistry {
    pub fn new(settings: RoomSettings) -> Self {
        Self {
            rooms: HashMap::new(),
            connection_rooms: HashMap::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &RoomSettings {
        &self.settings
    }

    /// A code no active room uses. Nothing is reserved: the room exists once someone joins.
    pub fn create_room(&self) -> RoomCode {
        let mut rng = rand::thread_rng();
        loop {
            let code = RoomCode::generate(&mut rng);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    pub fn resolve_room(&self, connection_id: ConnectionId) -> Option<&RoomCode> {
        self.connection_rooms.get(&connection_id)
    }

    pub fn room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_active(&self, code: &RoomCode) -> bool {
        self.rooms.get(code).is_some_and(|room| !room.is_empty())
    }

    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        let mut rooms: Vec<_> = self
            .rooms
            .values()
            .filter(|room| !room.is_empty())
            .map(|room| RoomSummary {
                room_id: room.code().to_string(),
                player_count: room.player_count(),
            })
            .collect();
        rooms.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        rooms
    }

    pub fn pick_random_active_room(&self) -> Option<RoomCode> {
        let active: Vec<_> = self.rooms.values().filter(|room| !room.is_empty()).collect();
        active
            .choose(&mut rand::thread_rng())
            .map(|room| room.code().clone())
    }

    /// Binds the connection to `room_code`, leaving any other room first.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        room_code: &str,
        nickname: &str,
    ) -> Result<Vec<GameEvent>, GameError> {
        let code = RoomCode::parse(room_code)?;
        let nickname = validate_nickname(nickname)?;

        if let Some(room) = self.rooms.get(&code) {
            if room.is_full() && room.name_of(connection_id).is_none() {
                return Err(GameError::RoomFull {
                    room_code: code.to_string(),
                });
            }
        }

        let mut out = Outbox::new();
        let switching_rooms = self
            .connection_rooms
            .get(&connection_id)
            .is_some_and(|current| *current != code);
        if switching_rooms {
            self.leave_into(connection_id, &mut out);
        }

        let room = self
            .rooms
            .entry(code.clone())
            .or_insert_with(|| Room::new(code.clone(), &self.settings));
        room.admit(connection_id, &nickname, &mut out);
        self.connection_rooms.insert(connection_id, code);

        Ok(out.into_events())
    }

    /// Explicit leave or disconnect. Unknown connections are a no-op.
    pub fn leave(&mut self, connection_id: ConnectionId) -> Vec<GameEvent> {
        let mut out = Outbox::new();
        self.leave_into(connection_id, &mut out);
        out.into_events()
    }

    fn leave_into(&mut self, connection_id: ConnectionId, out: &mut Outbox) {
        let Some(code) = self.connection_rooms.remove(&connection_id) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(&code) else {
            return;
        };
        let kicked = room.depart(connection_id, out);
        self.settle(&code, kicked, out);
    }

    /// Unbinds kicked connections and purges the room once nobody is left.
    fn settle(&mut self, code: &RoomCode, kicked: Vec<ConnectionId>, out: &mut Outbox) {
        for connection_id in kicked {
            self.connection_rooms.remove(&connection_id);
        }
        if self.rooms.get(code).is_some_and(Room::is_empty) {
            self.rooms.remove(code);
            out.stop_timer(code);
            info!("Room {} is empty and was removed", code);
        }
    }

    /// The connection's room, unless the payload names a different one.
    fn bound_room_mut(
        &mut self,
        connection_id: ConnectionId,
        room_hint: Option<&str>,
    ) -> Option<&mut Room> {
        let code = self.connection_rooms.get(&connection_id)?;
        if let Some(hint) = room_hint {
            if !code.matches(hint) {
                debug!(
                    "Connection {} sent a message for room {} while in {}",
                    connection_id, hint, code
                );
                return None;
            }
        }
        self.rooms.get_mut(code)
    }

    pub fn change_name(
        &mut self,
        connection_id: ConnectionId,
        room_hint: Option<&str>,
        old_name: &str,
        new_nickname: &str,
    ) -> Result<Vec<GameEvent>, GameError> {
        let new_nickname = validate_nickname(new_nickname)?;
        let room = self
            .bound_room_mut(connection_id, room_hint)
            .ok_or(GameError::NotInRoom)?;

        let mut out = Outbox::new();
        room.rename(connection_id, old_name, &new_nickname, &mut out)?;
        Ok(out.into_events())
    }

    pub fn submit_word(
        &mut self,
        connection_id: ConnectionId,
        room_hint: Option<&str>,
        word: &str,
    ) -> Vec<GameEvent> {
        let mut out = Outbox::new();
        let Some(room) = self.bound_room_mut(connection_id, room_hint) else {
            return Vec::new();
        };
        match validate_secret_word(word) {
            Ok(word) => room.submit_word(connection_id, word, &mut out),
            Err(e) => out.send(
                connection_id,
                ServerMessage::Error {
                    message: e.to_string(),
                },
            ),
        }
        out.into_events()
    }

    pub fn guess_word(
        &mut self,
        connection_id: ConnectionId,
        room_hint: Option<&str>,
        guess: &str,
    ) -> Vec<GameEvent> {
        let mut out = Outbox::new();
        let Some(room) = self.bound_room_mut(connection_id, room_hint) else {
            return Vec::new();
        };
        match validate_guess(guess) {
            Ok(guess) => room.guess_word(connection_id, &guess, &mut out),
            Err(e) => out.send(
                connection_id,
                ServerMessage::Error {
                    message: e.to_string(),
                },
            ),
        }
        out.into_events()
    }

    pub fn initiate_vote_kick(
        &mut self,
        connection_id: ConnectionId,
        room_hint: Option<&str>,
        target: &str,
    ) -> Vec<GameEvent> {
        let mut out = Outbox::new();
        let Some(room) = self.bound_room_mut(connection_id, room_hint) else {
            return Vec::new();
        };
        let code = room.code().clone();
        let kicked = room.cast_kick_vote(connection_id, target, &mut out);
        self.settle(&code, kicked.into_iter().collect(), &mut out);
        out.into_events()
    }

    /// Called once per second by the room's countdown task.
    pub fn tick(&mut self, room_code: &RoomCode, epoch: u64) -> TimerTick {
        let Some(room) = self.rooms.get_mut(room_code) else {
            return TimerTick::Stale;
        };
        let mut out = Outbox::new();
        match room.tick(epoch, &mut out) {
            None => TimerTick::Stale,
            Some(false) => TimerTick::Running(out.into_events()),
            Some(true) => TimerTick::Expired(out.into_events()),
        }
    }

    pub fn draw_line(&mut self, connection_id: ConnectionId, line: DrawLine) -> Vec<GameEvent> {
        let mut out = Outbox::new();
        if let Some(room) = self.bound_room_mut(connection_id, None) {
            relay_draw_line(room.roster(), line, &mut out);
        }
        out.into_events()
    }

    pub fn clear_canvas(&mut self, connection_id: ConnectionId) -> Vec<GameEvent> {
        let mut out = Outbox::new();
        if let Some(room) = self.bound_room_mut(connection_id, None) {
            relay_clear(room.roster(), &mut out);
        }
        out.into_events()
    }

    /// A late joiner wants the current drawing.
    pub fn client_ready(&mut self, connection_id: ConnectionId) -> Vec<GameEvent> {
        let mut out = Outbox::new();
        if let Some(room) = self.bound_room_mut(connection_id, None) {
            let (roster, canvas) = room.canvas_mut();
            canvas.request(roster, connection_id, &mut out);
        }
        out.into_events()
    }

    pub fn canvas_state(&mut self, connection_id: ConnectionId, snapshot: String) -> Vec<GameEvent> {
        let mut out = Outbox::new();
        if let Some(room) = self.bound_room_mut(connection_id, None) {
            let (_, canvas) = room.canvas_mut();
            canvas.respond(connection_id, snapshot, &mut out);
        }
        out.into_events()
    }

    pub fn chat(&mut self, connection_id: ConnectionId, message: &str) -> Vec<GameEvent> {
        let mut out = Outbox::new();
        if let Some(room) = self.bound_room_mut(connection_id, None) {
            relay_chat(room.roster(), connection_id, message, &mut out);
        }
        out.into_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_room_is_not_listed_until_joined() {
        let mut registry = RoomRegistry::default();
        let code = registry.create_room();

        assert!(registry.list_rooms().is_empty());
        assert!(!registry.is_active(&code));
        assert_eq!(registry.pick_random_active_room(), None);

        let alice = ConnectionId::new();
        registry.join(alice, code.as_str(), "Alice").unwrap();

        assert_eq!(
            registry.list_rooms(),
            vec![RoomSummary {
                room_id: code.to_string(),
                player_count: 1,
            }]
        );
        assert_eq!(registry.pick_random_active_room(), Some(code));
    }

    #[test]
    fn test_join_validation_changes_nothing() {
        let mut registry = RoomRegistry::default();
        let alice = ConnectionId::new();

        assert!(matches!(
            registry.join(alice, "bad", "Alice"),
            Err(GameError::InvalidRoomCode { .. })
        ));
        assert!(matches!(
            registry.join(alice, "AB12C", "  "),
            Err(GameError::InvalidNickname { .. })
        ));
        assert_eq!(registry.room_count(), 0);
        assert!(registry.resolve_room(alice).is_none());
    }

    #[test]
    fn test_full_room_rejects_newcomers() {
        let mut registry = RoomRegistry::new(RoomSettings {
            round_seconds: 60,
            max_players: 2,
        });
        registry.join(ConnectionId::new(), "FULL1", "a").unwrap();
        registry.join(ConnectionId::new(), "FULL1", "b").unwrap();

        let late = ConnectionId::new();
        assert_eq!(
            registry.join(late, "FULL1", "c").unwrap_err(),
            GameError::RoomFull {
                room_code: "FULL1".to_string()
            }
        );
        assert!(registry.resolve_room(late).is_none());
    }

    #[test]
    fn test_leaving_last_player_purges_room() {
        let mut registry = RoomRegistry::default();
        let alice = ConnectionId::new();
        registry.join(alice, "AB12C", "Alice").unwrap();

        let code = RoomCode::parse("AB12C").unwrap();
        let events = registry.leave(alice);

        assert!(events.contains(&GameEvent::StopTimer {
            room_code: code.clone()
        }));
        assert!(registry.room(&code).is_none());
        assert!(registry.resolve_room(alice).is_none());
        assert!(registry.leave(alice).is_empty());
    }

    #[test]
    fn test_stale_room_hint_is_ignored() {
        let mut registry = RoomRegistry::default();
        let alice = ConnectionId::new();
        let bob = ConnectionId::new();
        registry.join(alice, "AB12C", "Alice").unwrap();
        registry.join(bob, "AB12C", "Bob").unwrap();

        assert!(registry.submit_word(alice, Some("ZZZZZ"), "cat").is_empty());
        assert!(registry.guess_word(bob, Some("ZZZZZ"), "cat").is_empty());
        assert!(!registry.submit_word(alice, Some("ab12c"), "cat").is_empty());
    }
}
