//! Error types for the session layer.

use boomcats_protocol::SessionId;

/// Errors that can occur during session management and delivery.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given id.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// A session with this id is already registered.
    #[error("session {0} already exists")]
    AlreadyConnected(SessionId),

    /// The session's outbound queue is full; the client is not keeping up.
    /// Callers treat this as a disconnection of that session only.
    #[error("session {0} is unresponsive")]
    Unresponsive(SessionId),

    /// The session's writer has gone away.
    #[error("session {0} is closed")]
    Closed(SessionId),
}
