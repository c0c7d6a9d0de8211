//! Room lifecycle management for boomcats.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns the
//! room's membership and its live game. Every mutation, whichever session
//! it comes from, goes through the room's single command queue, so two
//! actions never race on the same game.
//!
//! # Key types
//!
//! - [`GameLogic`] — the trait a game implements to be hosted in a room
//! - [`RoomRegistry`] — creates, looks up and deletes rooms by name
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomState`] — room lifecycle state machine
//! - [`RoomConfig`] — queue size and win-announcement delay

mod config;
mod error;
mod logic;
mod registry;
mod room;

pub use config::{RoomConfig, RoomState};
pub use error::RoomError;
pub use logic::GameLogic;
pub use registry::RoomRegistry;
pub use room::{RoomHandle, RoomInfo};
