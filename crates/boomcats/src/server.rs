//! `BoomcatsServer` builder and server loop.
//!
//! This ties the layers together: transport → protocol → session → room.

use std::marker::PhantomData;
use std::sync::Arc;

use boomcats_protocol::LineCodec;
use boomcats_room::{GameLogic, RoomConfig, RoomRegistry};
use boomcats_session::{SessionConfig, SessionManager};
use boomcats_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::{BoomcatsError, ServerConfig};

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<G: GameLogic> {
    pub(crate) sessions: Mutex<SessionManager>,
    pub(crate) rooms: Arc<RoomRegistry<G>>,
    pub(crate) codec: LineCodec,
    pub(crate) session_config: SessionConfig,
}

/// Builder for configuring and starting a boomcats server.
///
/// # Example
///
/// ```rust,ignore
/// use boomcats::prelude::*;
///
/// let server = BoomcatsServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build::<CatsGame>()
///     .await?;
/// server.run().await
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoomcatsServerBuilder {
    config: ServerConfig,
}

impl BoomcatsServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a loaded [`ServerConfig`].
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_owned();
        self
    }

    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config.room = config;
        self
    }

    /// Binds the listener and builds a server hosting game `G`.
    pub async fn build<G: GameLogic>(self) -> Result<BoomcatsServer<G>, BoomcatsError> {
        let ServerConfig {
            bind_addr,
            session,
            room,
        } = self.config;
        let transport = WebSocketTransport::bind(&bind_addr).await?;

        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionManager::new()),
            rooms: RoomRegistry::new(room),
            codec: LineCodec::new(session.max_line_len),
            session_config: session,
        });

        Ok(BoomcatsServer {
            transport,
            state,
            _game: PhantomData,
        })
    }
}

/// A bound boomcats server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct BoomcatsServer<G: GameLogic> {
    transport: WebSocketTransport,
    state: Arc<ServerState<G>>,
    _game: PhantomData<fn() -> G>,
}

impl<G: GameLogic> BoomcatsServer<G> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns the room registry, shared with every connection.
    pub fn rooms(&self) -> Arc<RoomRegistry<G>> {
        Arc::clone(&self.state.rooms)
    }

    /// Runs the accept loop, spawning a handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), BoomcatsError> {
        tracing::info!("boomcats server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
