//! Error types for the room layer.

use boomcats_protocol::{RoomId, SessionId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The display name already belongs to a member of this room.
    #[error("name {0:?} is already taken in this room")]
    NameCollision(String),

    /// No room with this name exists.
    #[error("room {0:?} not found")]
    NotFound(String),

    /// A room with this name already exists.
    #[error("room {0:?} already exists")]
    AlreadyExists(String),

    /// The session is already a member of this room.
    #[error("session {0} already in room {1}")]
    AlreadyInRoom(SessionId, RoomId),

    /// The session is not a member of this room.
    #[error("session {0} not in room {1}")]
    NotInRoom(SessionId, RoomId),

    /// The room's actor has stopped (emptied or deleted).
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// The room was torn down by an internal fault while this request
    /// was queued.
    #[error("room {0} faulted")]
    Fault(RoomId),
}
