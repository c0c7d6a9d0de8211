//! The card catalogue.
//!
//! Cards carry no per-instance identity; only the kind matters. The wire
//! name of each card is its lowercase variant name (`see3`, `random4`, ...),
//! derived by `strum` so parsing and printing can never drift apart.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// One kind of card.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Card {
    Defuse,
    Exploding,
    Attack,
    Skip,
    Favour,
    Shuffle,
    Nope,
    See3,
    Random1,
    Random2,
    Random3,
    Random4,
    Random5,
}

impl Card {
    /// Position in the canonical hand display order:
    /// defuse < nope < skip < attack < see3 < shuffle < favour < random1..5.
    ///
    /// Exploding cards never sit in a hand; they sort last.
    pub fn display_rank(self) -> u8 {
        match self {
            Self::Defuse => 10,
            Self::Nope => 20,
            Self::Skip => 30,
            Self::Attack => 40,
            Self::See3 => 50,
            Self::Shuffle => 60,
            Self::Favour => 70,
            Self::Random1 => 80,
            Self::Random2 => 90,
            Self::Random3 => 100,
            Self::Random4 => 110,
            Self::Random5 => 120,
            Self::Exploding => u8::MAX,
        }
    }

    /// Returns the wire token for this card.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_card_wire_names() {
        assert_eq!(Card::See3.to_string(), "see3");
        assert_eq!(Card::Random5.as_str(), "random5");
        assert_eq!("favour".parse::<Card>().unwrap(), Card::Favour);
        assert_eq!("exploding".parse::<Card>().unwrap(), Card::Exploding);
        assert!("Favour".parse::<Card>().is_err());
        assert!("joker".parse::<Card>().is_err());
    }

    #[test]
    fn test_every_card_parses_back_from_its_name() {
        for card in Card::iter() {
            assert_eq!(card.as_str().parse::<Card>().unwrap(), card);
        }
        assert_eq!(Card::iter().count(), 13);
    }

    #[test]
    fn test_display_rank_is_strictly_ordered() {
        let order = [
            Card::Defuse,
            Card::Nope,
            Card::Skip,
            Card::Attack,
            Card::See3,
            Card::Shuffle,
            Card::Favour,
            Card::Random1,
            Card::Random2,
            Card::Random3,
            Card::Random4,
            Card::Random5,
            Card::Exploding,
        ];
        assert!(order.windows(2).all(|w| w[0].display_rank() < w[1].display_rank()));
    }
}
