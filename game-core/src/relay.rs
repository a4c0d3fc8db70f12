//! Canvas and chat fan-out. Strokes are never stored; the only state is who is
//! waiting for a canvas snapshot.

use game_types::{ConnectionId, DrawLine, ServerMessage};

use crate::{Outbox, Roster, sanitize_chat_message};

/// Connections that asked for a snapshot and have not received one yet.
#[derive(Debug, Clone, Default)]
pub struct CanvasSync {
    waiting: Vec<ConnectionId>,
}

impl CanvasSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_waiting(&self, connection_id: ConnectionId) -> bool {
        self.waiting.contains(&connection_id)
    }

    /// A late joiner is ready: ask everyone else for their canvas.
    pub fn request(&mut self, roster: &Roster, requester: ConnectionId, out: &mut Outbox) {
        let peers = roster.connections_except(requester);
        if peers.is_empty() {
            return;
        }
        if !self.waiting.contains(&requester) {
            self.waiting.push(requester);
        }
        out.deliver(peers, ServerMessage::GetCanvasState);
    }

    /// The first snapshot answers every pending request; later ones are dropped.
    pub fn respond(&mut self, sender: ConnectionId, snapshot: String, out: &mut Outbox) {
        let recipients: Vec<_> = self
            .waiting
            .iter()
            .copied()
            .filter(|id| *id != sender)
            .collect();
        if recipients.is_empty() {
            return;
        }
        self.waiting.retain(|id| *id == sender);
        out.deliver(recipients, ServerMessage::CanvasStateFromServer(snapshot));
    }

    pub fn forget(&mut self, connection_id: ConnectionId) {
        self.waiting.retain(|id| *id != connection_id);
    }
}

/// Sent to the whole room including the sender so every canvas renders the same stroke.
pub fn relay_draw_line(roster: &Roster, line: DrawLine, out: &mut Outbox) {
    out.deliver(roster.connections(), ServerMessage::DrawLine(line));
}

pub fn relay_clear(roster: &Roster, out: &mut Outbox) {
    out.deliver(roster.connections(), ServerMessage::Clear);
}

pub fn relay_chat(roster: &Roster, sender: ConnectionId, raw: &str, out: &mut Outbox) {
    let Some(player_name) = roster.name_of(sender) else {
        return;
    };
    let Some(message) = sanitize_chat_message(raw) else {
        return;
    };
    out.deliver(
        roster.connections(),
        ServerMessage::ReceiveChatMessage {
            player_name: player_name.to_string(),
            message,
            sent_at: chrono::Utc::now().to_rfc3339(),
        },
    );
}
