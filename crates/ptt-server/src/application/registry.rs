//! Connected sessions and the single shared PTT state.
//!
//! [`SessionRegistry`] is plain data: it holds one outbox per browser and the
//! one [`PttState`] they all share.  It never touches the keyboard; the
//! control service decides when to call the actuator based on what the
//! registry reports.
//!
//! Outboxes are unbounded channels drained by each session task, so a send
//! only fails once that task has gone away.  Such sessions are pruned on the
//! spot and reported back to the caller.

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;

use ptt_core::{PttCommand, PttState, ServerStatus};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Opaque identifier of one control-channel connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first group is plenty to tell sessions apart in logs.
        let s = self.0.simple().to_string();
        f.write_str(&s[..8])
    }
}

/// A session removed from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    pub id: SessionId,
    pub peer: SocketAddr,
    /// The key was held when this session left, so the registry moved to
    /// `Released` and the caller must release the key and broadcast.
    pub forced_release: bool,
    /// This session's command is what put the key down.
    pub was_presser: bool,
}

struct ClientSession {
    peer: SocketAddr,
    outbox: UnboundedSender<ServerStatus>,
}

/// All live sessions plus the shared [`PttState`].
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, ClientSession>,
    state: PttState,
    last_presser: Option<SessionId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current shared state.
    pub fn state(&self) -> PttState {
        self.state
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// The session whose command most recently moved the key down, if it is
    /// still held.
    pub fn last_presser(&self) -> Option<SessionId> {
        self.last_presser
    }

    /// Adds a session and queues its greeting: `connected`, then `ptt_on`
    /// if the key is currently held.
    ///
    /// Returns `false` (and registers nothing) if the outbox is already closed.
    pub fn register(
        &mut self,
        id: SessionId,
        peer: SocketAddr,
        outbox: UnboundedSender<ServerStatus>,
    ) -> bool {
        if outbox.send(ServerStatus::Connected).is_err() {
            return false;
        }
        if self.state.is_pressed() && outbox.send(ServerStatus::PttOn).is_err() {
            return false;
        }
        self.sessions.insert(id, ClientSession { peer, outbox });
        true
    }

    /// Applies a command from `origin` (`None` for the host itself).
    ///
    /// Returns the new state on a real transition, or `None` when the command
    /// repeats the current state and is absorbed.
    pub fn apply(&mut self, command: PttCommand, origin: Option<SessionId>) -> Option<PttState> {
        let next = self.state.transition(command)?;
        self.state = next;
        self.last_presser = if next.is_pressed() { origin } else { None };
        Some(next)
    }

    /// Removes a session.
    ///
    /// If the key is held, the state is forced to `Released` no matter which
    /// session pressed it.  Returns `None` for an id that is not registered.
    pub fn deregister(&mut self, id: SessionId) -> Option<Departure> {
        let session = self.sessions.remove(&id)?;
        Some(self.depart(id, session.peer))
    }

    /// Removes every session, forcing a release if the key is held.
    pub fn clear(&mut self) -> Vec<Departure> {
        let ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        ids.into_iter().filter_map(|id| self.deregister(id)).collect()
    }

    /// Queues `status` on every outbox.
    ///
    /// Sessions whose outbox is closed are removed and returned; each
    /// departure must be handled like a disconnect.
    pub fn broadcast(&mut self, status: ServerStatus) -> Vec<Departure> {
        let dead: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|(_, s)| s.outbox.send(status).is_err())
            .map(|(id, _)| *id)
            .collect();
        dead.into_iter().filter_map(|id| self.deregister(id)).collect()
    }

    fn depart(&mut self, id: SessionId, peer: SocketAddr) -> Departure {
        let was_presser = self.last_presser == Some(id);
        let forced_release = self.apply(PttCommand::Off, None).is_some();
        Departure {
            id,
            peer,
            forced_release,
            was_presser,
        }
    }
}
