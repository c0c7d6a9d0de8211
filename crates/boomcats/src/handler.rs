//! Per-connection handler: greeting, keepalive, and command routing.
//!
//! Each accepted connection gets its own Tokio task running this handler,
//! plus a writer task that drains the session's outbox. The flow is:
//!   1. Writer sends `version <n>`, then queued lines and periodic pings
//!   2. Reader loop: receive lines → decode → join a room or dispatch
//!   3. Either side ending closes the connection and parts the room

use std::sync::Arc;
use std::time::Duration;

use boomcats_protocol::{
    Codec, Command, ErrorReason, Notification, SessionId, PROTOCOL_VERSION,
};
use boomcats_room::{GameLogic, RoomError, RoomHandle};
use boomcats_session::{outbox, Outbox, OutboxReceiver};
use boomcats_transport::{Connection, Inbound, TransportError, WebSocketConnection};

use crate::server::ServerState;
use crate::BoomcatsError;

/// Drop guard that parts the room and forgets the session when the
/// handler exits, even by panic. `Drop` is synchronous, so the async
/// cleanup runs on a spawned task.
struct SessionGuard<G: GameLogic> {
    session_id: SessionId,
    room: Option<RoomHandle>,
    state: Arc<ServerState<G>>,
}

impl<G: GameLogic> Drop for SessionGuard<G> {
    fn drop(&mut self) {
        let session_id = self.session_id;
        let room = self.room.take();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            if let Some(room) = room {
                if let Err(e) = room.part(session_id).await {
                    tracing::debug!(session = %session_id, error = %e, "part on disconnect failed");
                }
            }
            let _ = state.sessions.lock().await.remove(session_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<G: GameLogic>(
    conn: WebSocketConnection,
    state: Arc<ServerState<G>>,
) -> Result<(), BoomcatsError> {
    let conn = Arc::new(conn);
    let session_id = SessionId(conn.id().into_inner());
    tracing::debug!(session = %session_id, "handling new connection");

    state.sessions.lock().await.create(session_id)?;
    let mut guard = SessionGuard {
        session_id,
        room: None,
        state: Arc::clone(&state),
    };

    let config = &state.session_config;
    let (outbox, receiver) = outbox(session_id, config.outbox_capacity);
    let greeting = state.codec.encode(&Notification::Version(PROTOCOL_VERSION));
    let mut writer = tokio::spawn(write_loop(
        Arc::clone(&conn),
        receiver,
        greeting,
        config.ping_interval(),
    ));

    loop {
        let received = tokio::select! {
            result = &mut writer => {
                match result {
                    Ok(Ok(())) => tracing::info!(session = %session_id, "session kicked"),
                    Ok(Err(e)) => tracing::debug!(session = %session_id, error = %e, "send failed"),
                    Err(e) => tracing::error!(session = %session_id, error = %e, "writer task failed"),
                }
                let _ = conn.close().await;
                return Ok(());
            }
            received = tokio::time::timeout(config.idle_timeout(), conn.recv()) => received,
        };

        // Any inbound frame restarts the idle timer on the next iteration.
        let line = match received {
            Ok(Ok(Some(Inbound::Text(line)))) => line,
            Ok(Ok(Some(Inbound::Keepalive))) => continue,
            Ok(Ok(None)) => {
                tracing::info!(session = %session_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(session = %session_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(session = %session_id, "connection timed out");
                break;
            }
        };

        let command = match state.codec.decode(&line) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!(session = %session_id, error = %e, "dropping line");
                continue;
            }
        };

        match command {
            Command::JoinLobby { room, name } if guard.room.is_none() => {
                guard.room = join_lobby(&state, &outbox, &room, &name).await;
            }
            command => match &guard.room {
                Some(room) => {
                    if let Err(e) = room.dispatch(session_id, command).await {
                        tracing::debug!(session = %session_id, error = %e, "dispatch failed");
                    }
                }
                None => {
                    tracing::debug!(session = %session_id, verb = command.verb(), "ignoring command before join_lobby");
                }
            },
        }
    }

    writer.abort();
    let _ = conn.close().await;
    Ok(())
}

/// Attaches the session to `room` as `name`. A taken name is reported to
/// the client and leaves the session unattached.
async fn join_lobby<G: GameLogic>(
    state: &ServerState<G>,
    outbox: &Outbox,
    room: &str,
    name: &str,
) -> Option<RoomHandle> {
    let session_id = outbox.session_id();
    match state.rooms.join(room, session_id, name, outbox).await {
        Ok(handle) => {
            if let Err(e) = state.sessions.lock().await.attach(session_id, room, name) {
                tracing::warn!(session = %session_id, error = %e, "attach failed");
            }
            tracing::info!(session = %session_id, room, name, "joined lobby");
            Some(handle)
        }
        Err(RoomError::NameCollision(_)) => {
            let reply = Notification::Error(ErrorReason::UsernameExists);
            if let Err(e) = outbox.deliver(state.codec.encode(&reply)) {
                tracing::debug!(session = %session_id, error = %e, "could not report name collision");
            }
            None
        }
        Err(e) => {
            tracing::warn!(session = %session_id, room, error = %e, "join_lobby failed");
            None
        }
    }
}

/// Writes the greeting, then every queued line, pinging on `ping_every`.
/// Returns once the session is kicked.
async fn write_loop(
    conn: Arc<WebSocketConnection>,
    mut receiver: OutboxReceiver,
    greeting: String,
    ping_every: Duration,
) -> Result<(), TransportError> {
    conn.send(&greeting).await?;

    let mut ping = tokio::time::interval_at(tokio::time::Instant::now() + ping_every, ping_every);
    loop {
        tokio::select! {
            line = receiver.next() => match line {
                Some(line) => conn.send(&line).await?,
                None => return Ok(()),
            },
            _ = ping.tick() => conn.ping().await?,
        }
    }
}
