//! Session types: the data structures that represent one connection.
//!
//! A "session" is the server's record of a connected client. It tracks:
//! - WHO the client is (`SessionId`)
//! - WHERE it is (unattached, or in a room under a display name)
//! - WHEN it connected

use std::time::{Duration, Instant};

use boomcats_protocol::{SessionId, DEFAULT_MAX_LINE_LEN};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for per-session behavior.
///
/// `#[serde(default)]` lets a config file override only the fields it
/// cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of each session's outbound queue. A session whose queue
    /// fills up is considered unresponsive and disconnected.
    pub outbox_capacity: usize,

    /// Longest inbound line accepted, in bytes.
    pub max_line_len: usize,

    /// A session that sends nothing for this long is closed.
    pub idle_timeout_ms: u64,

    /// How often the server pings each client. Must be shorter than the
    /// client's own idle timeout.
    pub ping_interval_ms: u64,
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            outbox_capacity: 256,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            idle_timeout_ms: 15_000,
            ping_interval_ms: 13_500,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where a session currently is.
///
/// ```text
///   Unattached ──(join_lobby ok)──→ InRoom ──(room gone)──→ Unattached
/// ```
///
/// A failed `join_lobby` (name taken) leaves the session `Unattached` so
/// the client can try another name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Connected but not yet in a room.
    Unattached,

    /// Attached to the named room under a display name.
    InRoom { room: String, name: String },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single client's session on the server.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: SessionId,
    pub state: SessionState,
    pub connected_at: Instant,
}

impl Session {
    /// Returns the room name, if attached.
    pub fn room(&self) -> Option<&str> {
        match &self.state {
            SessionState::InRoom { room, .. } => Some(room),
            SessionState::Unattached => None,
        }
    }
}
