//! Bounded outbound queue for one session.
//!
//! The room actor must never wait on a slow client, so delivery is a
//! non-blocking `try_send`. A full queue surfaces as
//! [`SessionError::Unresponsive`] and the room drops that member. The
//! writer task on the other end drains the queue into the connection.
//!
//! Rooms can also *kick* a session (teardown, fault, removal). The kick
//! is a `Notify` permit rather than a queued message, so it still gets
//! through when the queue is full.

use std::sync::Arc;

use boomcats_protocol::SessionId;
use tokio::sync::{mpsc, Notify};

use crate::SessionError;

/// Creates a connected [`Outbox`] / [`OutboxReceiver`] pair.
pub fn outbox(session_id: SessionId, capacity: usize) -> (Outbox, OutboxReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let kick = Arc::new(Notify::new());
    (
        Outbox {
            session_id,
            tx,
            kick: Arc::clone(&kick),
        },
        OutboxReceiver { rx, kick },
    )
}

/// Sending half, cloned into every room the session is attached to.
#[derive(Debug, Clone)]
pub struct Outbox {
    session_id: SessionId,
    tx: mpsc::Sender<String>,
    kick: Arc<Notify>,
}

impl Outbox {
    /// Returns the session this outbox delivers to.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Queues one line without waiting.
    ///
    /// # Errors
    /// - [`SessionError::Unresponsive`] — the queue is full
    /// - [`SessionError::Closed`] — the writer is gone
    pub fn deliver(&self, line: String) -> Result<(), SessionError> {
        self.tx.try_send(line).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                SessionError::Unresponsive(self.session_id)
            }
            mpsc::error::TrySendError::Closed(_) => {
                SessionError::Closed(self.session_id)
            }
        })
    }

    /// Tells the writer to flush what is queued and close the connection.
    pub fn kick(&self) {
        self.kick.notify_one();
    }

    /// Returns `true` once the receiving half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half, owned by the session's writer task.
#[derive(Debug)]
pub struct OutboxReceiver {
    rx: mpsc::Receiver<String>,
    kick: Arc<Notify>,
}

impl OutboxReceiver {
    /// Waits for the next line to write.
    ///
    /// Queued lines are always handed out before a kick is honoured.
    /// Returns `None` once the session has been kicked (and the queue is
    /// drained) or every sender is gone.
    pub async fn next(&mut self) -> Option<String> {
        tokio::select! {
            biased;
            line = self.rx.recv() => return line,
            () = self.kick.notified() => {}
        }
        // Kicked. Flush anything that raced in with the kick, and keep the
        // kick armed for the following call.
        let line = self.rx.try_recv().ok();
        if line.is_some() {
            self.kick.notify_one();
        }
        line
    }
}
