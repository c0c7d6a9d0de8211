//! One step of undo history for `nope`.

use crate::deck::Deck;

/// The parts of a game a `nope` can reverse: the draw pile, whose turn it
/// is, and the attack flag. Hands are never rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub deck: Deck,
    pub current: usize,
    pub attack: bool,
}
