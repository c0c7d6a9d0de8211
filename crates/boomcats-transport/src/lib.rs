//! Transport abstraction layer for boomcats.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! the persistent, ordered, text-message connection each session rides on.
//! The game core never touches sockets; it only sees whole lines.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One inbound event on a [`Connection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A whole text message.
    Text(String),
    /// A keepalive frame (ping or pong) from the peer. Carries no data but
    /// proves the peer is still there.
    Keepalive,
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// A single connection that carries text messages in both directions.
///
/// Reading and writing are independent: one task may sit in [`recv`]
/// while another calls [`send`] or [`ping`] on the same connection.
///
/// [`recv`]: Connection::recv
/// [`send`]: Connection::send
/// [`ping`]: Connection::ping
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one text message to the remote peer.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the next message or keepalive from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed. Frames
    /// that are not valid UTF-8 are skipped.
    async fn recv(&self) -> Result<Option<Inbound>, Self::Error>;

    /// Sends a keepalive ping. Transports without one may no-op.
    async fn ping(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_inbound_text_compares_by_content() {
        assert_eq!(Inbound::Text("draw".into()), Inbound::Text("draw".into()));
        assert_ne!(Inbound::Text("draw".into()), Inbound::Keepalive);
    }

    #[test]
    fn test_connection_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "alice");
        map.insert(ConnectionId::new(2), "bob");
        assert_eq!(map[&ConnectionId::new(1)], "alice");
    }
}
