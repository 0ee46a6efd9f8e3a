//! Matchmaking and room lifecycle.
//!
//! [`SessionManager`] is a synchronous state machine. Each call handles one
//! connection event to completion and returns the events to deliver, in
//! order. Callers that share it across threads must serialize access (one
//! lock or one task), which also makes the waiting-slot check-then-set atomic.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use crate::protocol::{
    ClientEvent, ConnectionId, MoveRequest, Outbound, RoomId, ServerEvent, INVALID_MOVE_TEXT,
    NOT_YOUR_TURN_TEXT, OPPONENT_LEFT_TEXT, WAITING_TEXT,
};
use crate::{Game, Role};

/// Behaviour switches for the session manager.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Answer out-of-turn moves with `invalidMove` instead of ignoring them.
    pub notify_out_of_turn: bool,
}

/// Where a connection is in its lifecycle.
///
/// Closed connections are forgotten and report `Idle`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Waiting,
    Paired { role: Role, room: RoomId },
}

/// One match between two connections.
#[derive(Clone, Debug)]
pub struct Room {
    id: RoomId,
    game: Game,
    goat: ConnectionId,
    tiger: ConnectionId,
}

impl Room {
    fn new(id: RoomId, goat: ConnectionId, tiger: ConnectionId) -> Room {
        Room {
            id,
            game: Game::new(),
            goat,
            tiger,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Role played by `conn` in this room, if it is a member.
    pub fn role_of(&self, conn: ConnectionId) -> Option<Role> {
        if conn == self.goat {
            Some(Role::Goat)
        } else if conn == self.tiger {
            Some(Role::Tiger)
        } else {
            None
        }
    }

    /// Both members, goat first.
    pub fn members(&self) -> [ConnectionId; 2] {
        [self.goat, self.tiger]
    }

    fn other(&self, conn: ConnectionId) -> ConnectionId {
        if conn == self.goat {
            self.tiger
        } else {
            self.goat
        }
    }

    fn broadcast(&self, event: ServerEvent) -> Vec<Outbound> {
        self.members()
            .into_iter()
            .map(|member| Outbound::new(member, event.clone()))
            .collect()
    }

    fn broadcast_state(&self, winner: Option<Role>) -> Vec<Outbound> {
        self.broadcast(ServerEvent::GameStateUpdate {
            state: *self.game.state(),
            winner,
        })
    }
}

/// Owns the waiting slot and every live room.
#[derive(Debug, Default)]
pub struct SessionManager {
    config: SessionConfig,
    waiting: Option<ConnectionId>,
    rooms: HashMap<RoomId, Room>,
    memberships: HashMap<ConnectionId, RoomId>,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> SessionManager {
        SessionManager {
            config,
            ..SessionManager::default()
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Connection currently holding the waiting slot.
    pub fn waiting(&self) -> Option<ConnectionId> {
        self.waiting
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn connection_state(&self, conn: ConnectionId) -> ConnectionState {
        if self.waiting == Some(conn) {
            return ConnectionState::Waiting;
        }
        self.memberships
            .get(&conn)
            .and_then(|id| self.rooms.get(id))
            .and_then(|room| {
                room.role_of(conn).map(|role| ConnectionState::Paired {
                    role,
                    room: room.id.clone(),
                })
            })
            .unwrap_or(ConnectionState::Idle)
    }

    // ========== Connection Lifecycle ==========

    /// A new connection arrived: wait, or pair with the waiting one.
    #[instrument(skip(self))]
    pub fn connect(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        if self.connection_state(conn) != ConnectionState::Idle {
            warn!(%conn, "duplicate connect ignored");
            return Vec::new();
        }

        let Some(waiting) = self.waiting.take() else {
            info!(%conn, "waiting for an opponent");
            self.waiting = Some(conn);
            return vec![Outbound::new(conn, ServerEvent::Waiting(WAITING_TEXT.to_string()))];
        };

        let id = RoomId::for_pair(conn, waiting);
        let room = Room::new(id.clone(), waiting, conn);
        let state = *room.game.state();
        info!(room = %id, goat = %waiting, tiger = %conn, "room created");

        self.memberships.insert(waiting, id.clone());
        self.memberships.insert(conn, id.clone());
        self.rooms.insert(id.clone(), room);

        vec![
            Outbound::new(
                waiting,
                ServerEvent::GameStart {
                    role: Role::Goat,
                    room: id.clone(),
                    state,
                },
            ),
            Outbound::new(
                conn,
                ServerEvent::GameStart {
                    role: Role::Tiger,
                    room: id,
                    state,
                },
            ),
        ]
    }

    /// A connection went away: free the slot and tear down its room.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        if self.waiting == Some(conn) {
            info!(%conn, "waiting connection left");
            self.waiting = None;
        }

        let Some(id) = self.memberships.remove(&conn) else {
            return Vec::new();
        };
        let Some(room) = self.rooms.remove(&id) else {
            return Vec::new();
        };
        let other = room.other(conn);
        self.memberships.remove(&other);
        info!(room = %id, %conn, remaining = %other, "room closed");

        vec![Outbound::new(
            other,
            ServerEvent::OpponentDisconnected(OPPONENT_LEFT_TEXT.to_string()),
        )]
    }

    // ========== Room Requests ==========

    /// Dispatch a parsed client message.
    pub fn handle(&mut self, conn: ConnectionId, event: ClientEvent) -> Vec<Outbound> {
        match event {
            ClientEvent::MakeMove { room, mov } => self.make_move(conn, &room, mov),
            ClientEvent::ResetGame { room } => self.reset_game(conn, &room),
            ClientEvent::UndoMove { room } => self.undo_move(conn, &room),
        }
    }

    /// Room named by a request, provided `conn` plays in it.
    fn member_room(&mut self, conn: ConnectionId, id: &RoomId) -> Option<&mut Room> {
        let room = self.rooms.get_mut(id).filter(|room| room.role_of(conn).is_some());
        if room.is_none() {
            warn!(%conn, room = %id, "request for unknown room ignored");
        }
        room
    }

    /// Validate, apply and evaluate a move from a room member.
    #[instrument(skip(self))]
    pub fn make_move(&mut self, conn: ConnectionId, id: &RoomId, request: MoveRequest) -> Vec<Outbound> {
        let notify_out_of_turn = self.config.notify_out_of_turn;
        let Some(room) = self.member_room(conn, id) else {
            return Vec::new();
        };
        let Some(role) = room.role_of(conn) else {
            return Vec::new();
        };

        let turn = room.game.state().turn();
        if role != turn {
            debug!(%conn, %role, %turn, "out-of-turn move");
            if notify_out_of_turn {
                return vec![Outbound::new(
                    conn,
                    ServerEvent::InvalidMove {
                        message: NOT_YOUR_TURN_TEXT.to_string(),
                    },
                )];
            }
            return Vec::new();
        }

        let result = request
            .resolve(room.game.state())
            .and_then(|mov| room.game.play(mov).map(|winner| (mov, winner)));
        match result {
            Ok((mov, winner)) => {
                debug!(room = %id, %role, %mov, ?winner, "move applied");
                if let Some(winner) = winner {
                    info!(room = %id, %winner, "game decided");
                }
                room.broadcast_state(winner)
            }
            Err(err) => {
                debug!(room = %id, %role, ?request, %err, "move rejected");
                vec![Outbound::new(
                    conn,
                    ServerEvent::InvalidMove {
                        message: INVALID_MOVE_TEXT.to_string(),
                    },
                )]
            }
        }
    }

    /// Start the room over with a fresh game, dropping its history.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self, conn: ConnectionId, id: &RoomId) -> Vec<Outbound> {
        let Some(room) = self.member_room(conn, id) else {
            return Vec::new();
        };
        room.game = Game::new();
        info!(room = %id, %conn, "game reset");
        room.broadcast_state(None)
    }

    /// Take back the last move in the room, if there is one.
    #[instrument(skip(self))]
    pub fn undo_move(&mut self, conn: ConnectionId, id: &RoomId) -> Vec<Outbound> {
        let Some(room) = self.member_room(conn, id) else {
            return Vec::new();
        };
        if !room.game.undo() {
            debug!(room = %id, "nothing to undo");
            return Vec::new();
        }
        debug!(room = %id, %conn, remaining = room.game.history().len(), "move undone");
        room.broadcast_state(None)
    }
}
