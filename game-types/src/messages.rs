use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DrawLine, Leaderboard};

/// Frames sent by a browser. Every frame is `{"event": "...", "data": ...}`.
///
/// Room codes and player names carried in payloads are informational only; the
/// server acts on behalf of whoever is bound to the sending connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
#[ts(export)]
pub enum ClientMessage {
    JoinRoom {
        #[serde(rename = "roomCode", alias = "roomID")]
        room_code: String,
        #[serde(alias = "playerName")]
        nickname: String,
    },
    ClientReady,
    CanvasState(String),
    DrawLine(DrawLine),
    Clear,
    SubmitWord {
        #[serde(rename = "roomCode", alias = "roomID", default)]
        room_code: Option<String>,
        #[serde(rename = "playerName", default)]
        player_name: Option<String>,
        word: String,
    },
    GuessWord {
        #[serde(rename = "roomCode", alias = "roomID", default)]
        room_code: Option<String>,
        #[serde(rename = "playerName", default)]
        player_name: Option<String>,
        guess: String,
    },
    ChangeName {
        #[serde(rename = "roomCode", alias = "roomID", default)]
        room_code: Option<String>,
        #[serde(rename = "oldName")]
        old_name: String,
        #[serde(rename = "newName")]
        new_name: String,
    },
    InitiateVoteKick {
        #[serde(rename = "roomCode", alias = "roomID", default)]
        room_code: Option<String>,
        player: String,
        #[serde(default)]
        voter: Option<String>,
    },
    SendChatMessage {
        #[serde(rename = "playerName", default)]
        player_name: Option<String>,
        message: String,
    },
    LeaveRoom,
    Heartbeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
#[ts(export)]
pub enum ServerMessage {
    AssignPlayerName(String),
    NewPlayer(String),
    PlayersInRoom(Vec<String>),
    GetCanvasState,
    CanvasStateFromServer(String),
    DrawLine(DrawLine),
    Clear,
    PromptWordEntry(String),
    /// Private to the drawer so it can redisplay what it is drawing.
    DrawingWord(String),
    WordSubmitted {
        #[serde(rename = "playerName")]
        player_name: String,
        #[serde(rename = "wordLength")]
        word_length: usize,
    },
    CorrectGuess {
        #[serde(rename = "playerName")]
        player_name: String,
        #[serde(rename = "nextPlayer")]
        next_player: String,
    },
    WrongGuess,
    UpdateLeaderboard(Leaderboard),
    TimerUpdate(u32),
    TimeUp {
        #[serde(rename = "currentPlayer")]
        current_player: String,
        #[serde(rename = "drawingWord")]
        drawing_word: String,
    },
    PlayerNameChanged {
        #[serde(rename = "oldName")]
        old_name: String,
        #[serde(rename = "newName")]
        new_name: String,
    },
    NameChangeResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    VoteInitiated {
        player: String,
        voter: String,
    },
    VoteProgress {
        player: String,
        votes: usize,
    },
    PlayerKicked {
        player: String,
    },
    PlayerLeft {
        #[serde(rename = "playerName")]
        player_name: String,
        players: Vec<String>,
    },
    ReceiveChatMessage {
        #[serde(rename = "playerName")]
        player_name: String,
        message: String,
        #[serde(rename = "sentAt")]
        sent_at: String,
    },
    Error {
        message: String,
    },
}
