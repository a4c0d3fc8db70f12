use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of one realtime session. Every display name in a room carries a
/// suffix derived from it, so two sessions can never share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// `#` followed by the hyphen-free uuid. Clients display everything before the `#`.
    pub fn uniquifier(&self) -> String {
        format!("#{}", self.0.simple())
    }

    pub fn display_name(&self, nickname: &str) -> String {
        format!("{}{}", nickname, self.uniquifier())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strips the per-connection suffix from a display name.
pub fn nickname_of(display_name: &str) -> &str {
    display_name
        .split_once('#')
        .map(|(nickname, _)| nickname)
        .unwrap_or(display_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_round_trips_to_nickname() {
        let id = ConnectionId::new();
        let name = id.display_name("Alice");

        assert!(name.starts_with("Alice#"));
        assert_eq!(name.len(), "Alice#".len() + 32);
        assert_eq!(nickname_of(&name), "Alice");
    }

    #[test]
    fn test_distinct_connections_get_distinct_names() {
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        assert_ne!(a.display_name("Sam"), b.display_name("Sam"));
    }
}
