use game_types::{ConnectionId, ServerMessage};

use crate::RoomCode;

/// Side effects produced by the coordinator, in the order they must be carried out.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Deliver {
        recipients: Vec<ConnectionId>,
        message: ServerMessage,
    },
    /// Start a countdown for the room, replacing any running one.
    StartTimer { room_code: RoomCode, epoch: u64 },
    /// Cancel the room's countdown if one exists.
    StopTimer { room_code: RoomCode },
}

/// Result of one countdown tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerTick {
    /// The countdown was replaced, stopped or its room purged. The ticker must exit.
    Stale,
    Running(Vec<GameEvent>),
    /// Time ran out; the round has been closed. The ticker must exit after delivering.
    Expired(Vec<GameEvent>),
}

/// Collects events while an operation runs.
#[derive(Debug, Default)]
pub struct Outbox {
    events: Vec<GameEvent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, to: ConnectionId, message: ServerMessage) {
        self.deliver(vec![to], message);
    }

    pub fn deliver(&mut self, recipients: Vec<ConnectionId>, message: ServerMessage) {
        if recipients.is_empty() {
            return;
        }
        self.events.push(GameEvent::Deliver {
            recipients,
            message,
        });
    }

    pub fn start_timer(&mut self, room_code: &RoomCode, epoch: u64) {
        self.events.push(GameEvent::StartTimer {
            room_code: room_code.clone(),
            epoch,
        });
    }

    pub fn stop_timer(&mut self, room_code: &RoomCode) {
        self.events.push(GameEvent::StopTimer {
            room_code: room_code.clone(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }
}
