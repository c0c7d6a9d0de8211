//! Error types for the rules engine.

/// A rejected game action. Never fatal: the actor is told
/// `err illegal_move` and the game state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(&'static str),
}
