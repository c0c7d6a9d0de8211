//! Pending question/answer exchanges.

use boomcats_protocol::{Question, SessionId};

/// What a player is choosing a target for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// `favour` card: the target picks a card to give.
    Favour,
    /// Pair combo: a random card is taken from the target.
    Random,
    /// Triple combo: the asker names a card to take.
    Steal,
}

impl TargetKind {
    /// The question that asks the asker to pick a target.
    pub fn question(self) -> Question {
        match self {
            Self::Favour => Question::FavourWho,
            Self::Random => Question::RandomWho,
            Self::Steal => Question::StealWho,
        }
    }
}

/// At most one exchange is pending per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    AwaitingTarget {
        asker: SessionId,
        kind: TargetKind,
    },
    AwaitingFavourItem {
        asker: SessionId,
        target: SessionId,
    },
    AwaitingStealItem {
        asker: SessionId,
        target: SessionId,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns `true` if the exchange is waiting on `who` to pick a
    /// target of `kind`.
    pub fn awaiting_target(&self, who: SessionId, kind: TargetKind) -> bool {
        matches!(*self, Self::AwaitingTarget { asker, kind: k } if asker == who && k == kind)
    }
}
