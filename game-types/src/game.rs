use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Display name -> points for everyone currently in a room.
pub type Leaderboard = BTreeMap<String, u32>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One stroke segment. `prev_point` is absent for the first segment of a stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DrawLine {
    pub prev_point: Option<Point>,
    pub curr_point: Point,
    pub color: String,
    #[serde(alias = "thickness")]
    pub brush_thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomSummary {
    #[serde(rename = "roomID")]
    pub room_id: String,
    #[serde(rename = "playerCount")]
    pub player_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateRoomResponse {
    #[serde(rename = "roomID")]
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JoinRoomResponse {
    pub success: bool,
    #[serde(rename = "roomID", skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

/// `success` is false when no room had players and `room_id` is a fresh code to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RandomRoomResponse {
    pub success: bool,
    #[serde(rename = "roomID")]
    pub room_id: String,
}
