//! Draw pile and player hands.

use boomcats_protocol::Card;
use rand::Rng;
use rand::seq::SliceRandom;

/// Cards in a fresh deck before dealing. No exploding or defuse cards;
/// those are added per player count.
const BASE_DECK: [(Card, usize); 11] = [
    (Card::Nope, 5),
    (Card::Attack, 4),
    (Card::Skip, 4),
    (Card::Favour, 4),
    (Card::Shuffle, 4),
    (Card::See3, 5),
    (Card::Random1, 4),
    (Card::Random2, 4),
    (Card::Random3, 4),
    (Card::Random4, 4),
    (Card::Random5, 4),
];

/// Total defuse cards in play (dealt plus shuffled in) for any player count.
pub const DEFUSES_IN_PLAY: usize = 6;

/// The draw pile. The top of the pile is the end of the vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds the shuffled base deck.
    pub fn base() -> Self {
        let mut deck = Self {
            cards: BASE_DECK
                .iter()
                .flat_map(|&(card, n)| std::iter::repeat_n(card, n))
                .collect(),
        };
        deck.shuffle();
        deck
    }

    /// Builds a deck with `cards` in order, last card on top.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Cards bottom to top.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn count(&self, card: Card) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Returns up to `n` cards from the top, nearest first.
    pub fn peek(&self, n: usize) -> Vec<Card> {
        self.cards.iter().rev().take(n).copied().collect()
    }

    /// Places `card` so that `depth` cards sit above it.
    ///
    /// Depth 0 makes it the next card drawn; `depth >= len` puts it at the
    /// bottom.
    pub fn insert_at_depth(&mut self, depth: usize, card: Card) {
        let depth = depth.min(self.cards.len());
        let index = self.cards.len() - depth;
        self.cards.insert(index, card);
    }

    /// Uniformly permutes the pile.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
    }

    /// Adds `players - 1` exploding cards and tops defuses up to
    /// [`DEFUSES_IN_PLAY`], then reshuffles.
    pub fn add_extra_cards(&mut self, players: usize) {
        let exploding = players.saturating_sub(1);
        let defuse = DEFUSES_IN_PLAY.saturating_sub(players);
        self.cards.extend(std::iter::repeat_n(Card::Exploding, exploding));
        self.cards.extend(std::iter::repeat_n(Card::Defuse, defuse));
        self.shuffle();
    }

    /// Deals one starting hand: a defuse plus 7 cards, or 6 with more than
    /// five players.
    pub fn deal_hand(&mut self, players: usize) -> Hand {
        let n = if players > 5 { 6 } else { 7 };
        let mut cards = Vec::with_capacity(n + 1);
        cards.push(Card::Defuse);
        cards.extend(std::iter::from_fn(|| self.draw()).take(n));
        Hand::from_cards(cards)
    }
}

/// A player's hand. Order is the order shown to the player; duplicates
/// occupy distinct positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes the card at `index`, if any.
    pub fn remove_at(&mut self, index: usize) -> Option<Card> {
        (index < self.cards.len()).then(|| self.cards.remove(index))
    }

    /// Removes one copy of `card`. Returns `false` if the hand has none.
    pub fn remove_card(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, card: Card) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Removes and returns a uniformly chosen card.
    pub fn take_random(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..self.cards.len());
        Some(self.cards.remove(index))
    }

    /// Sorts into canonical display order. Stable, so equal cards keep
    /// their relative order.
    pub fn sort(&mut self) {
        self.cards.sort_by_key(|c| c.display_rank());
    }
}
