//! Events exchanged with clients.
//!
//! Every message is `{"event": "<name>", "data": <payload>}` and every state
//! update carries the complete [`GameState`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{GameState, Move, MoveError, Role};

/// Sent to a lone connection while it waits for an opponent.
pub const WAITING_TEXT: &str = "Waiting for another player to join...";

/// Sent with `invalidMove` when a move fails validation.
pub const INVALID_MOVE_TEXT: &str = "Invalid move. Please try again.";

/// Sent with `invalidMove` for out-of-turn moves, when enabled.
pub const NOT_YOUR_TURN_TEXT: &str = "Not your turn.";

/// Sent to the remaining player when the other one leaves.
pub const OPPONENT_LEFT_TEXT: &str = "Your opponent has disconnected.";

/// Transport-assigned identity of one client connection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a room, `room_<second>_<first>` for the two connections it pairs.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Room name for a newly arrived connection paired with the waiting one.
    pub fn for_pair(arriving: ConnectionId, waiting: ConnectionId) -> RoomId {
        RoomId(format!("room_{}_{}", arriving, waiting))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(name: &str) -> Self {
        RoomId(name.to_string())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw move coordinates as sent by a client.
///
/// Start coordinates may be omitted while goats are being placed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MoveRequest {
    #[serde(default, alias = "startRow")]
    pub start_row: Option<i64>,
    #[serde(default, alias = "startCol")]
    pub start_col: Option<i64>,
    #[serde(alias = "endRow")]
    pub end_row: i64,
    #[serde(alias = "endCol")]
    pub end_col: i64,
}

impl MoveRequest {
    /// A request naming both ends of the move.
    pub fn new(start_row: i64, start_col: i64, end_row: i64, end_col: i64) -> MoveRequest {
        MoveRequest {
            start_row: Some(start_row),
            start_col: Some(start_col),
            end_row,
            end_col,
        }
    }

    /// A placement request; no start position.
    pub fn place(end_row: i64, end_col: i64) -> MoveRequest {
        MoveRequest {
            start_row: None,
            start_col: None,
            end_row,
            end_col,
        }
    }

    /// Resolve against the position it is played in.
    pub fn resolve(&self, state: &GameState) -> Result<Move, MoveError> {
        let start = self.start_row.zip(self.start_col);
        state.interpret(start, (self.end_row, self.end_col))
    }
}

/// Messages a client may send.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    MakeMove {
        room: RoomId,
        #[serde(rename = "move")]
        mov: MoveRequest,
    },
    ResetGame {
        room: RoomId,
    },
    UndoMove {
        room: RoomId,
    },
}

/// Messages the server sends.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    Waiting(String),
    GameStart {
        role: Role,
        room: RoomId,
        state: GameState,
    },
    GameStateUpdate {
        state: GameState,
        winner: Option<Role>,
    },
    InvalidMove {
        message: String,
    },
    OpponentDisconnected(String),
}

impl ServerEvent {
    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Waiting(_) => "waiting",
            ServerEvent::GameStart { .. } => "gameStart",
            ServerEvent::GameStateUpdate { .. } => "gameStateUpdate",
            ServerEvent::InvalidMove { .. } => "invalidMove",
            ServerEvent::OpponentDisconnected(_) => "opponentDisconnected",
        }
    }
}

/// One event addressed to one connection.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Outbound {
    pub to: ConnectionId,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn new(to: ConnectionId, event: ServerEvent) -> Outbound {
        Outbound { to, event }
    }
}
