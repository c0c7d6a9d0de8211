//! The session manager: tracks every connected session.
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself — it uses a plain
//! `HashMap`. The server wraps it in a mutex and only holds the lock for
//! the duration of one map operation, never across a room call.

use std::collections::HashMap;
use std::time::Instant;

use boomcats_protocol::SessionId;

use crate::{Session, SessionError, SessionState};

/// Registry of connected sessions.
///
/// ## Lifecycle
///
/// ```text
/// create() ──→ attach() ──→ detach() ──→ remove()
///    │            │                         ▲
///    ▼            ▼                         │
/// [Unattached] [InRoom] ────────────────────┘
/// ```
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<SessionId, Session>,
}

impl SessionManager {
    /// Creates a new, empty session manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly accepted session.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if the id is taken.
    pub fn create(
        &mut self,
        session_id: SessionId,
    ) -> Result<&Session, SessionError> {
        if self.sessions.contains_key(&session_id) {
            return Err(SessionError::AlreadyConnected(session_id));
        }
        let session = self.sessions.entry(session_id).or_insert(Session {
            session_id,
            state: SessionState::Unattached,
            connected_at: Instant::now(),
        });
        tracing::debug!(session = %session_id, "session created");
        Ok(session)
    }

    /// Records that the session joined `room` as `name`.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn attach(
        &mut self,
        session_id: SessionId,
        room: &str,
        name: &str,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        session.state = SessionState::InRoom {
            room: room.to_owned(),
            name: name.to_owned(),
        };
        tracing::debug!(session = %session_id, room, name, "session attached");
        Ok(())
    }

    /// Marks the session as no longer in any room.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn detach(&mut self, session_id: SessionId) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        session.state = SessionState::Unattached;
        Ok(())
    }

    /// Forgets a session entirely (connection closed).
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn remove(&mut self, session_id: SessionId) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .remove(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        tracing::debug!(
            session = %session_id,
            connected_for = ?session.connected_at.elapsed(),
            "session removed"
        );
        Ok(session)
    }

    /// Looks up a session by id.
    pub fn get(&self, session_id: &SessionId) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// Returns the ids of every session attached to `room`, sorted.
    pub fn in_room(&self, room: &str) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|s| s.room() == Some(room))
            .map(|s| s.session_id)
            .collect();
        ids.sort();
        ids
    }

    /// Returns the number of connected sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
