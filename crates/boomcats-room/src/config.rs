//! Room configuration and state machine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room a registry spawns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Capacity of each room's command queue. Senders wait when it is full.
    pub channel_size: usize,

    /// How long a win is announced before the fresh game replaces it.
    pub win_delay_ms: u64,
}

impl RoomConfig {
    pub fn win_delay(&self) -> Duration {
        Duration::from_millis(self.win_delay_ms)
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            channel_size: 64,
            win_delay_ms: 5_000,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
///            ┌──────────(new game)───────────┐
///            ▼                               │
///         Active ──(game finished)──→ Concluding
///            │                               │
///            └──────→ Destroying ←───────────┘
/// ```
///
/// - **Active**: the hosted game accepts commands.
/// - **Concluding**: a winner was announced; game commands are ignored
///   until the delayed replacement game is built. Joins, parts and chat
///   still work.
/// - **Destroying**: the room emptied, faulted, or was deleted. Terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Active,
    Concluding,
    Destroying,
}

impl RoomState {
    /// Returns `true` if game commands are forwarded to the game.
    pub fn accepts_game_commands(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Concluding)
                | (Self::Concluding, Self::Active)
                | (Self::Active | Self::Concluding, Self::Destroying)
        )
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Concluding => write!(f, "Concluding"),
            Self::Destroying => write!(f, "Destroying"),
        }
    }
}
