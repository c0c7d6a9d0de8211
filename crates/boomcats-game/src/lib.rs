//! Exploding-cats rules for boomcats rooms.
//!
//! [`CatsGame`] implements [`boomcats_room::GameLogic`]; a room hosting it
//! feeds it joins, parts and member commands one at a time and delivers
//! whatever notifications it returns.
//!
//! - [`Deck`] / [`Hand`] — card containers
//! - [`CatsState`] — lobby, turn order, hands, pending questions
//! - [`Interaction`] — the single pending question/answer exchange
//! - [`Snapshot`] — one step of undo for `nope`

mod deck;
mod effects;
mod engine;
mod error;
mod interaction;
mod outbound;
mod snapshot;

pub use deck::{DEFUSES_IN_PLAY, Deck, Hand};
pub use engine::{CatsGame, CatsState, MAX_PLAYERS, MIN_PLAYERS, Phase};
pub use error::GameError;
pub use interaction::{Interaction, TargetKind};
pub use snapshot::Snapshot;
