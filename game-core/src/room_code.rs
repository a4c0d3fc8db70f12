use game_types::GameError;
use rand::Rng;
use std::fmt;

pub const ROOM_CODE_LEN: usize = 5;
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Short uppercase code identifying a room, e.g. `AB12C`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomCode(String);

impl RoomCode {
    /// Accepts user input: surrounding whitespace and lowercase letters are tolerated.
    pub fn parse(value: &str) -> Result<Self, GameError> {
        let normalized = value.trim().to_ascii_uppercase();
        let valid = normalized.len() == ROOM_CODE_LEN
            && normalized.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b));

        if valid {
            Ok(Self(normalized))
        } else {
            Err(GameError::InvalidRoomCode {
                code: value.to_string(),
            })
        }
    }

    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when a room code carried in a client payload refers to this room.
    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().eq_ignore_ascii_case(&self.0)
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RoomCode {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}
