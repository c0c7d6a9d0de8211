//! Session management for boomcats.
//!
//! This crate handles the lifecycle of one connected client:
//!
//! 1. **Outbound queue** — every session owns a bounded [`Outbox`]; rooms
//!    push notifications into it without ever awaiting the network
//! 2. **Session tracking** — knowing who's connected and which room they
//!    sit in ([`SessionManager`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← delivers notifications through Outbox
//!     ↕
//! Session Layer (this crate)  ← identity, room attachment, outbound queue
//!     ↕
//! Protocol Layer (below)  ← provides SessionId
//! ```

mod error;
mod manager;
mod outbox;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use outbox::{outbox, Outbox, OutboxReceiver};
pub use session::{Session, SessionConfig, SessionState};
