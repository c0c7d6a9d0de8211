//! Unified error type for the boomcats server.

use boomcats_protocol::ProtocolError;
use boomcats_room::RoomError;
use boomcats_session::SessionError;
use boomcats_transport::TransportError;

use crate::config::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BoomcatsError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An inbound line could not be understood.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (unknown id, closed outbox).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (name taken, room gone, fault).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use boomcats_protocol::{RoomId, SessionId};

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let err: BoomcatsError = err.into();
        assert!(matches!(err, BoomcatsError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::MalformedInput("bad".into());
        let err: BoomcatsError = err.into();
        assert!(matches!(err, BoomcatsError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err: BoomcatsError = SessionError::NotFound(SessionId(7)).into();
        assert!(matches!(err, BoomcatsError::Session(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err: BoomcatsError = RoomError::Fault(RoomId(1)).into();
        assert!(matches!(err, BoomcatsError::Room(_)));

        let err: BoomcatsError = RoomError::NameCollision("alice".into()).into();
        assert!(err.to_string().contains("alice"));
    }

    #[test]
    fn test_from_config_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: BoomcatsError = ConfigError::Parse(parse).into();
        assert!(matches!(err, BoomcatsError::Config(_)));
    }
}
