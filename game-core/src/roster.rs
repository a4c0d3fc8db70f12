use game_types::{ConnectionId, GameError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub connection_id: ConnectionId,
}

/// Ordered list of the participants in one room. Order is join order and
/// defines drawing turns.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    pub fn names(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name.clone()).collect()
    }

    pub fn connections(&self) -> Vec<ConnectionId> {
        self.participants.iter().map(|p| p.connection_id).collect()
    }

    pub fn connections_except(&self, except: ConnectionId) -> Vec<ConnectionId> {
        self.participants
            .iter()
            .filter(|p| p.connection_id != except)
            .map(|p| p.connection_id)
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.name == name)
    }

    pub fn has_connection(&self, connection_id: ConnectionId) -> bool {
        self.participants
            .iter()
            .any(|p| p.connection_id == connection_id)
    }

    pub fn name_of(&self, connection_id: ConnectionId) -> Option<&str> {
        self.participants
            .iter()
            .find(|p| p.connection_id == connection_id)
            .map(|p| p.name.as_str())
    }

    pub fn connection_of(&self, name: &str) -> Option<ConnectionId> {
        self.participants
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.connection_id)
    }

    /// Appends a participant. Returns false if the connection is already listed.
    pub fn add(&mut self, connection_id: ConnectionId, name: String) -> bool {
        if self.has_connection(connection_id) || self.contains(&name) {
            return false;
        }
        self.participants.push(Participant {
            name,
            connection_id,
        });
        true
    }

    /// Removes the participant and reports the index it held.
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Option<(usize, Participant)> {
        let index = self
            .participants
            .iter()
            .position(|p| p.connection_id == connection_id)?;
        Some((index, self.participants.remove(index)))
    }

    pub fn remove_name(&mut self, name: &str) -> Option<(usize, Participant)> {
        let index = self.participants.iter().position(|p| p.name == name)?;
        Some((index, self.participants.remove(index)))
    }

    /// Renames in place so the participant keeps its turn position.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), GameError> {
        if self.contains(new_name) {
            return Err(GameError::NameTaken {
                name: game_types::nickname_of(new_name).to_string(),
            });
        }
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.name == old_name)
            .ok_or_else(|| GameError::PlayerNotFound {
                name: old_name.to_string(),
            })?;
        participant.name = new_name.to_string();
        Ok(())
    }
}
