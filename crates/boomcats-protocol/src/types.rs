//! Identity and addressing types shared by every layer.

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for one connected session.
///
/// Newtype over `u64` so a `RoomId` can never be passed where a session is
/// expected. Sessions are numbered by the transport as they are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// A unique identifier for one room *instance*.
///
/// Rooms are addressed by name on the wire; the id distinguishes a room
/// from a later room that reuses the same name after the first one was
/// torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive a notification?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server notification.
///
/// Game logic returns `(Recipient, Notification)` pairs; the room actor
/// resolves each recipient against its current membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every member of the room.
    All,

    /// One specific session.
    Session(SessionId),

    /// Every member except the listed sessions.
    AllExcept(Vec<SessionId>),
}

impl Recipient {
    /// Returns `true` if `session` is addressed by this recipient.
    pub fn includes(&self, session: SessionId) -> bool {
        match self {
            Self::All => true,
            Self::Session(id) => *id == session,
            Self::AllExcept(excluded) => !excluded.contains(&session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_display() {
        assert_eq!(SessionId(42).to_string(), "S-42");
        assert_eq!(RoomId(7).to_string(), "R-7");
    }

    #[test]
    fn test_recipient_includes() {
        let a = SessionId(1);
        let b = SessionId(2);
        assert!(Recipient::All.includes(a));
        assert!(Recipient::Session(a).includes(a));
        assert!(!Recipient::Session(a).includes(b));
        assert!(!Recipient::AllExcept(vec![a]).includes(a));
        assert!(Recipient::AllExcept(vec![a]).includes(b));
    }
}
