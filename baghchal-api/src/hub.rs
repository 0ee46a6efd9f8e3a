//! Connection registry in front of the session manager.
//!
//! Every connection gets an unbounded outbox. Events are handled one at a time
//! under the session lock and pushed into the outboxes before the lock is
//! released, so each client sees events in processing order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use baghchal_core::protocol::{ClientEvent, ConnectionId, Outbound, ServerEvent};
use baghchal_core::session::{SessionConfig, SessionManager};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Sending half of a connection's outbound queue.
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

/// Snapshot of hub occupancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub connections: usize,
    pub rooms: usize,
    pub waiting: bool,
}

/// Shared server state: the session manager plus the live connections.
pub struct Hub {
    sessions: Mutex<SessionManager>,
    outboxes: Mutex<HashMap<ConnectionId, Outbox>>,
    next_id: AtomicU64,
}

impl Hub {
    pub fn new(config: SessionConfig) -> Hub {
        Hub {
            sessions: Mutex::new(SessionManager::new(config)),
            outboxes: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, SessionManager> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn outboxes(&self) -> MutexGuard<'_, HashMap<ConnectionId, Outbox>> {
        self.outboxes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new connection and run matchmaking for it.
    #[instrument(skip_all)]
    pub fn connect(&self, outbox: Outbox) -> ConnectionId {
        let conn = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.outboxes().insert(conn, outbox);

        let mut sessions = self.sessions();
        let out = sessions.connect(conn);
        self.deliver(out);
        conn
    }

    /// Handle one text frame from a connection.
    #[instrument(skip(self, text))]
    pub fn handle_text(&self, conn: ConnectionId, text: &str) {
        let event: ClientEvent = match serde_json::from_str(text) {
            Ok(event) => event,
            Err(err) => {
                warn!(%conn, %err, "unreadable message ignored");
                return;
            }
        };

        let mut sessions = self.sessions();
        let out = sessions.handle(conn, event);
        self.deliver(out);
    }

    /// Tear down everything tied to a closed connection.
    #[instrument(skip(self))]
    pub fn disconnect(&self, conn: ConnectionId) {
        let mut sessions = self.sessions();
        let out = sessions.disconnect(conn);
        self.deliver(out);
        drop(sessions);

        self.outboxes().remove(&conn);
    }

    pub fn stats(&self) -> HubStats {
        let connections = self.outboxes().len();
        let sessions = self.sessions();
        HubStats {
            connections,
            rooms: sessions.room_count(),
            waiting: sessions.waiting().is_some(),
        }
    }

    fn deliver(&self, out: Vec<Outbound>) {
        let outboxes = self.outboxes();
        for Outbound { to, event } in out {
            let name = event.name();
            match outboxes.get(&to) {
                Some(outbox) => {
                    if outbox.send(event).is_err() {
                        debug!(%to, event = name, "connection closed before delivery");
                    }
                }
                None => debug!(%to, event = name, "no outbox for connection"),
            }
        }
    }
}
