//! The `GameLogic` trait — the seam between a room and the game it hosts.
//!
//! The room actor owns membership, ordering and delivery; the game only
//! sees session ids and display names and answers with notifications
//! addressed by [`Recipient`].

use boomcats_protocol::{Command, Notification, Recipient, SessionId};

/// A game that can be hosted by a room actor.
///
/// All methods run inside the room actor, one at a time, so `State` never
/// needs interior locking.
pub trait GameLogic: Send + Sync + 'static {
    /// The full game state owned by the room.
    type State: Send + 'static;

    /// Creates a fresh game in its lobby phase.
    ///
    /// Called when the room is created and again after every finished
    /// game, before current members are re-admitted through
    /// [`on_join`](Self::on_join).
    fn init() -> Self::State;

    /// A session entered the room (or is re-admitted to a fresh game).
    fn on_join(
        state: &mut Self::State,
        session: SessionId,
        name: &str,
    ) -> Vec<(Recipient, Notification)>;

    /// A session is leaving the room. It is still a member while the
    /// returned notifications are delivered.
    fn on_part(
        state: &mut Self::State,
        session: SessionId,
    ) -> Vec<(Recipient, Notification)>;

    /// Processes a game command from a member.
    ///
    /// Room-wide commands (`chat`, `join_lobby`) never reach this method.
    fn handle_command(
        state: &mut Self::State,
        sender: SessionId,
        command: Command,
    ) -> Vec<(Recipient, Notification)>;

    /// Returns `true` once the game has a winner.
    ///
    /// Checked after every call into the game. When it flips to `true` the
    /// room stops forwarding game commands and schedules a fresh game.
    fn is_finished(state: &Self::State) -> bool;

    /// Notifications sent just before a finished game is replaced.
    /// Default: none.
    fn on_reset(_state: &Self::State) -> Vec<(Recipient, Notification)> {
        Vec::new()
    }
}
