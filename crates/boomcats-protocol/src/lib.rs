//! Wire protocol for boomcats.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`SessionId`], [`RoomId`], [`Recipient`]) — identities and
//!   addressing for outbound notifications.
//! - **Cards** ([`Card`]) — the closed card catalogue and its display order.
//! - **Commands** ([`Command`], [`Question`]) — what a client may send.
//! - **Notifications** ([`Notification`]) — what the server sends back,
//!   rendered as space-separated tokens.
//! - **Codec** ([`Codec`] trait, [`LineCodec`]) — line validation and the
//!   text encoding of both directions.
//!
//! # Architecture
//!
//! ```text
//! Transport (text frames) → Protocol (Command / Notification) → Room / Game
//! ```
//!
//! The protocol layer knows nothing about connections or rooms.

mod card;
mod codec;
mod command;
mod error;
mod notification;
mod types;

pub use card::Card;
pub use codec::{Codec, LineCodec, DEFAULT_MAX_LINE_LEN};
pub use command::{Command, Question};
pub use error::ProtocolError;
pub use notification::{BcastEvent, ErrorReason, MessageKind, Notification};
pub use types::{Recipient, RoomId, SessionId};

/// Protocol revision announced to every client on connect (`version <n>`).
pub const PROTOCOL_VERSION: u32 = 3;
