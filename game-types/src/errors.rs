use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("The name {name} is already taken in this room")]
    NameTaken { name: String },
    #[error("Player {name} is not in this room")]
    PlayerNotFound { name: String },
    #[error("Not in a room")]
    NotInRoom,
    #[error("Invalid room code: {code}")]
    InvalidRoomCode { code: String },
    #[error("Invalid nickname: {reason}")]
    InvalidNickname { reason: String },
    #[error("Room {room_code} is full")]
    RoomFull { room_code: String },
    #[error("{field} cannot be empty")]
    EmptyInput { field: String },
    #[error("{field} is too long (max {max} characters)")]
    TooLong { field: String, max: usize },
}
