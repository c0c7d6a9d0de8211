//! The exploding-cats turn state machine.
//!
//! ```text
//!  Lobby ──start──→ Playing ──(one player left)──→ Won
//!    ▲                                              │
//!    └──────────── fresh game (room) ───────────────┘
//! ```
//!
//! Each member of the room is either a spectator (arrival order) or a
//! player (turn order). Every command is checked against the actor and the
//! turn before anything changes; a rejected command produces only
//! `err illegal_move` for the actor.

use std::collections::HashMap;

use boomcats_protocol::{
    BcastEvent, Card, Command, ErrorReason, MessageKind, Notification, Question,
    Recipient, SessionId,
};
use boomcats_room::GameLogic;
use rand::seq::SliceRandom;

use crate::deck::{Deck, Hand};
use crate::effects::effect_of;
use crate::interaction::{Interaction, TargetKind};
use crate::outbound::Outbound;
use crate::snapshot::Snapshot;
use crate::GameError;

/// Fewest players `start` accepts.
pub const MIN_PLAYERS: usize = 2;
/// Most players `start` accepts.
pub const MAX_PLAYERS: usize = 6;

/// Game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lobby,
    Playing,
    /// A winner was announced; the room replaces the game after its delay.
    Won,
}

/// Progress of the current player's defuse after drawing an exploding card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum DefuseStep {
    #[default]
    Idle,
    /// Exploding card drawn; a defuse must be played.
    Drawn,
    /// Defuse played; waiting for `a defuse_pos <depth>`.
    Placing,
}

/// State of one game. Owned by the room actor.
#[derive(Debug)]
pub struct CatsState {
    pub(crate) names: HashMap<SessionId, String>,
    pub(crate) spectators: Vec<SessionId>,
    pub(crate) players: Vec<SessionId>,
    pub(crate) hands: HashMap<SessionId, Hand>,
    pub(crate) deck: Deck,
    pub(crate) current: usize,
    pub(crate) phase: Phase,
    pub(crate) attack: bool,
    pub(crate) defuse: DefuseStep,
    pub(crate) interaction: Interaction,
    pub(crate) snapshot: Option<Snapshot>,
}

impl Default for CatsState {
    fn default() -> Self {
        Self::new()
    }
}

impl CatsState {
    /// A fresh lobby with no members.
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
            spectators: Vec::new(),
            players: Vec::new(),
            hands: HashMap::new(),
            deck: Deck::default(),
            current: 0,
            phase: Phase::Lobby,
            attack: false,
            defuse: DefuseStep::Idle,
            interaction: Interaction::Idle,
            snapshot: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Players in turn order.
    pub fn players(&self) -> &[SessionId] {
        &self.players
    }

    /// Spectators in arrival order.
    pub fn spectators(&self) -> &[SessionId] {
        &self.spectators
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn hand(&self, session: SessionId) -> Option<&Hand> {
        self.hands.get(&session)
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn is_attack(&self) -> bool {
        self.attack
    }

    /// Returns `true` while the current player is dealing with an
    /// exploding card.
    pub fn is_defusing(&self) -> bool {
        self.defuse != DefuseStep::Idle
    }

    /// Whose turn it is, while playing.
    pub fn current_player(&self) -> Option<SessionId> {
        match self.phase {
            Phase::Playing => self.players.get(self.current).copied(),
            _ => None,
        }
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    fn admit(&mut self, session: SessionId, name: &str, out: &mut Outbound) {
        self.names.insert(session, name.to_owned());
        self.spectators.push(session);
        out.all(Notification::Joins(name.to_owned()));

        // Sync the newcomer.
        out.to(session, Notification::Spectators(self.spectator_names()));
        out.to(session, Notification::Players(self.player_names()));
        if self.phase == Phase::Lobby {
            out.to(session, Notification::Message(MessageKind::Spectating));
            return;
        }
        out.to(
            session,
            Notification::Message(MessageKind::SpectatingStarted),
        );
        if !self.deck.is_empty() {
            out.to(session, Notification::DrawPile(true));
        }
    }

    fn remove(&mut self, session: SessionId, out: &mut Outbound) {
        if self.players.contains(&session) {
            self.downgrade(session, out);
        }
        self.spectators.retain(|&s| s != session);
        let name = self.names.remove(&session).unwrap_or_default();
        out.all(Notification::Parts(name));
    }

    fn upgrade(&mut self, session: SessionId, out: &mut Outbound) {
        self.spectators.retain(|&s| s != session);
        self.players.push(session);
        out.all(Notification::Upgrades(self.name(session)));
        out.all(Notification::Players(self.player_names()));
        out.to(session, Notification::Message(MessageKind::Playing));
    }

    /// Moves a player to the spectators: `leave`, an unsaved explosion, or
    /// leaving the room mid-game.
    fn downgrade(&mut self, session: SessionId, out: &mut Outbound) {
        let Some(index) = self.players.iter().position(|&p| p == session) else {
            return;
        };
        let was_current = self.phase == Phase::Playing && index == self.current;

        self.players.remove(index);
        self.spectators.push(session);
        self.hands.remove(&session);

        let name = self.name(session);
        out.all(Notification::Downgrades(name.clone()));
        out.all(Notification::Players(self.player_names()));

        if self.phase == Phase::Lobby {
            out.to(session, Notification::Message(MessageKind::Spectating));
            return;
        }

        out.to(
            session,
            Notification::Message(MessageKind::SpectatingExploded),
        );
        out.to(session, Notification::Hand(Vec::new()));
        if self.phase != Phase::Playing {
            return;
        }

        tracing::info!(player = %session, %name, remaining = self.players.len(), "player out");

        // Same player keeps (or gets) the turn.
        if index < self.current {
            self.current -= 1;
        }
        // Turn indices in a held snapshot no longer line up.
        self.snapshot = None;

        if let &[winner] = self.players.as_slice() {
            self.win(winner, out);
            return;
        }
        if self.players.is_empty() {
            return;
        }

        self.cancel_interaction_with(session, out);

        if was_current {
            self.defuse = DefuseStep::Idle;
            self.attack = false;
            self.next_turn(out);
        }
    }

    fn cancel_interaction_with(&mut self, gone: SessionId, out: &mut Outbound) {
        match self.interaction {
            Interaction::AwaitingTarget { asker, .. } if asker == gone => {}
            Interaction::AwaitingFavourItem { asker, target } if asker == gone => {
                out.to(target, Notification::QCancel);
            }
            Interaction::AwaitingFavourItem { asker, target } if target == gone => {
                out.all(Notification::Bcast(BcastEvent::FavourCancel));
                out.to(asker, Notification::Unlock);
            }
            Interaction::AwaitingStealItem { asker, .. } if asker == gone => {}
            Interaction::AwaitingStealItem { asker, target } if target == gone => {
                out.to(asker, Notification::QCancel);
            }
            _ => return,
        }
        self.interaction = Interaction::Idle;
    }

    fn win(&mut self, winner: SessionId, out: &mut Outbound) {
        self.phase = Phase::Won;
        self.interaction = Interaction::Idle;
        self.defuse = DefuseStep::Idle;
        let name = self.name(winner);
        tracing::info!(player = %winner, %name, "game won");
        out.all(Notification::Wins(name));
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    fn apply(
        &mut self,
        sender: SessionId,
        command: Command,
        out: &mut Outbound,
    ) -> Result<(), GameError> {
        match command {
            Command::Join => self.join(sender, out),
            Command::Leave => self.leave(sender, out),
            Command::Start => self.start(sender, out),
            Command::Draw => self.draw(sender, out),
            Command::Play(index) => self.play(sender, index, out),
            Command::PlayMultiple { count, card } => {
                self.play_multiple(sender, count, card, out)
            }
            Command::Answer { question, answer } => {
                self.answer(sender, question, &answer, out)
            }
            Command::Sort => self.sort(sender, out),
            // Room-wide; never forwarded by the room.
            Command::Chat(_) | Command::JoinLobby { .. } => Ok(()),
        }
    }

    fn join(&mut self, sender: SessionId, out: &mut Outbound) -> Result<(), GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::IllegalMove("game already started"));
        }
        if !self.spectators.contains(&sender) {
            return Err(GameError::IllegalMove("already a player"));
        }
        self.upgrade(sender, out);
        Ok(())
    }

    fn leave(&mut self, sender: SessionId, out: &mut Outbound) -> Result<(), GameError> {
        if !self.players.contains(&sender) {
            return Err(GameError::IllegalMove("not a player"));
        }
        self.downgrade(sender, out);
        Ok(())
    }

    fn start(&mut self, sender: SessionId, out: &mut Outbound) -> Result<(), GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::IllegalMove("game already started"));
        }
        let count = self.players.len();
        if count < MIN_PLAYERS {
            out.to(sender, Notification::Bcast(BcastEvent::MinPlayers));
            return Ok(());
        }
        if count > MAX_PLAYERS {
            out.all(Notification::Bcast(BcastEvent::MaxPlayers));
            return Ok(());
        }
        if count == MAX_PLAYERS {
            out.all(Notification::Bcast(BcastEvent::HighPlayers));
        }

        self.phase = Phase::Playing;
        self.attack = false;
        self.defuse = DefuseStep::Idle;
        self.interaction = Interaction::Idle;
        self.snapshot = None;
        out.all(Notification::ClearMessage);
        out.all(Notification::Bcast(BcastEvent::Starting));

        self.players.shuffle(&mut rand::rng());
        self.current = 0;
        out.all(Notification::Players(self.player_names()));
        out.all(Notification::NowPlaying(self.name(self.players[0])));

        let mut deck = Deck::base();
        self.hands = self
            .players
            .iter()
            .map(|&p| (p, deck.deal_hand(count)))
            .collect();
        deck.add_extra_cards(count);
        self.deck = deck;

        for &player in &self.players {
            out.to(player, Notification::Hand(self.hand_cards(player)));
        }
        out.all(Notification::DrawPile(true));

        tracing::info!(players = count, deck = self.deck.len(), "game started");
        Ok(())
    }

    /// Checks that `sender` is the current player of a running game.
    fn require_turn(&self, sender: SessionId) -> Result<(), GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::IllegalMove("no game in progress"));
        }
        if !self.players.contains(&sender) {
            return Err(GameError::IllegalMove("not a player"));
        }
        if self.current_player() != Some(sender) {
            return Err(GameError::IllegalMove("not your turn"));
        }
        Ok(())
    }

    fn draw(&mut self, sender: SessionId, out: &mut Outbound) -> Result<(), GameError> {
        self.require_turn(sender)?;
        if self.is_defusing() {
            return Err(GameError::IllegalMove("defusing"));
        }
        if !self.interaction.is_idle() {
            return Err(GameError::IllegalMove("question pending"));
        }
        let Some(card) = self.deck.draw() else {
            return Err(GameError::IllegalMove("draw pile empty"));
        };
        self.snapshot = None;

        let name = self.name(sender);
        if card == Card::Exploding {
            out.all(Notification::Exploded(name));
            let saved = self.hands.get(&sender).is_some_and(|h| h.contains(Card::Defuse));
            if !saved {
                self.downgrade(sender, out);
                return Ok(());
            }
            self.defuse = DefuseStep::Drawn;
            out.to(sender, Notification::Defusing);
            self.next_turn(out);
            return Ok(());
        }

        let hand = self.hands.entry(sender).or_default();
        hand.push(card);
        out.to(sender, Notification::Hand(hand.cards().to_vec()));
        out.to(sender, Notification::Drew(card));
        out.all_except(&[sender], Notification::DrewOther(name));
        self.increment_turn();
        self.next_turn(out);
        Ok(())
    }

    fn play(
        &mut self,
        sender: SessionId,
        index: usize,
        out: &mut Outbound,
    ) -> Result<(), GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::IllegalMove("no game in progress"));
        }
        let card = self
            .hands
            .get(&sender)
            .and_then(|h| h.get(index))
            .ok_or(GameError::IllegalMove("no such card"))?;
        match self.defuse {
            DefuseStep::Idle => {}
            DefuseStep::Drawn if card == Card::Defuse => {}
            _ => return Err(GameError::IllegalMove("defusing")),
        }
        if !self.interaction.is_idle() && card != Card::Nope {
            return Err(GameError::IllegalMove("question pending"));
        }
        if card != Card::Nope && self.current_player() != Some(sender) {
            return Err(GameError::IllegalMove("not your turn"));
        }

        let hand = self.hands.entry(sender).or_default();
        hand.remove_at(index);
        out.to(sender, Notification::Hand(hand.cards().to_vec()));
        out.all(Notification::Played {
            name: self.name(sender),
            card,
        });
        effect_of(card)(self, sender, out);
        self.settle_favour(out);
        Ok(())
    }

    /// Cancels a pending favour whose target has nothing left to give.
    fn settle_favour(&mut self, out: &mut Outbound) {
        let Interaction::AwaitingFavourItem { asker, target } = self.interaction else {
            return;
        };
        if self.holds_cards(target) {
            return;
        }
        self.interaction = Interaction::Idle;
        out.all(Notification::Bcast(BcastEvent::FavourCancel));
        out.to(asker, Notification::Unlock);
        out.to(target, Notification::QCancel);
    }

    fn play_multiple(
        &mut self,
        sender: SessionId,
        count: u8,
        card: Card,
        out: &mut Outbound,
    ) -> Result<(), GameError> {
        self.require_turn(sender)?;
        if self.is_defusing() {
            return Err(GameError::IllegalMove("defusing"));
        }
        if !self.interaction.is_idle() {
            return Err(GameError::IllegalMove("question pending"));
        }
        let kind = match count {
            2 => TargetKind::Random,
            3 => TargetKind::Steal,
            _ => return Err(GameError::IllegalMove("combo must be 2 or 3 cards")),
        };
        let hand = self.hands.entry(sender).or_default();
        if hand.count(card) < usize::from(count) {
            return Err(GameError::IllegalMove("not enough matching cards"));
        }

        for _ in 0..count {
            hand.remove_card(card);
        }
        out.to(sender, Notification::Hand(hand.cards().to_vec()));
        out.all(Notification::PlayedMultiple {
            name: self.name(sender),
            count,
            card,
        });
        self.snapshot = None;
        self.interaction = Interaction::AwaitingTarget {
            asker: sender,
            kind,
        };
        out.to(sender, Notification::ask(kind.question()));
        Ok(())
    }

    fn answer(
        &mut self,
        sender: SessionId,
        question: Question,
        answer: &str,
        out: &mut Outbound,
    ) -> Result<(), GameError> {
        match question {
            Question::DefusePos => self.answer_defuse_pos(sender, answer, out),
            Question::FavourWho => self.answer_favour_who(sender, answer, out),
            Question::FavourWhat => return self.answer_favour_what(sender, answer, out),
            Question::RandomWho => self.answer_random_who(sender, answer, out),
            Question::StealWho => self.answer_steal_who(sender, answer, out),
            Question::StealWhat => self.answer_steal_what(sender, answer, out),
        }
        Ok(())
    }

    fn answer_defuse_pos(&mut self, sender: SessionId, answer: &str, out: &mut Outbound) {
        if self.defuse != DefuseStep::Placing || self.current_player() != Some(sender) {
            return;
        }
        let Ok(depth) = answer.parse::<usize>() else {
            out.to(sender, Notification::ask(Question::DefusePos));
            return;
        };
        // Past the bottom lands at the bottom.
        self.deck.insert_at_depth(depth, Card::Exploding);
        self.defuse = DefuseStep::Idle;
        self.increment_turn();
        self.next_turn(out);
    }

    /// Resolves a target name for `asker`. `None` means re-prompt.
    fn pick_target(&self, asker: SessionId, answer: &str) -> Option<SessionId> {
        self.player_by_name(answer).filter(|&t| t != asker)
    }

    /// Drops a card-taking question when no other player holds a card, so
    /// the asker is never left waiting on an answer that cannot exist.
    fn drop_if_nobody_to_ask(&mut self, asker: SessionId, out: &mut Outbound) -> bool {
        let someone = self
            .players
            .iter()
            .any(|&p| p != asker && self.holds_cards(p));
        if !someone {
            self.interaction = Interaction::Idle;
            out.to(asker, Notification::QCancel);
        }
        !someone
    }

    fn answer_favour_who(&mut self, sender: SessionId, answer: &str, out: &mut Outbound) {
        if !self.interaction.awaiting_target(sender, TargetKind::Favour)
            || self.drop_if_nobody_to_ask(sender, out)
        {
            return;
        }
        let target = self
            .pick_target(sender, answer)
            .filter(|&t| self.holds_cards(t));
        let Some(target) = target else {
            out.to(sender, Notification::ask(Question::FavourWho));
            return;
        };
        self.interaction = Interaction::AwaitingFavourItem {
            asker: sender,
            target,
        };
        let (asker_name, target_name) = (self.name(sender), self.name(target));
        out.all_except(
            &[target],
            Notification::Favoured {
                asker: asker_name.clone(),
                target: target_name,
            },
        );
        out.to(
            target,
            Notification::Ask {
                question: Question::FavourWhat,
                arg: Some(asker_name),
            },
        );
        out.to(sender, Notification::Lock);
    }

    fn answer_favour_what(
        &mut self,
        sender: SessionId,
        answer: &str,
        out: &mut Outbound,
    ) -> Result<(), GameError> {
        let Interaction::AwaitingFavourItem { asker, target } = self.interaction else {
            return Err(GameError::IllegalMove("no favour pending"));
        };
        if target != sender {
            return Err(GameError::IllegalMove("favour not asked of you"));
        }
        let index: usize = answer
            .parse()
            .map_err(|_| GameError::IllegalMove("bad card index"))?;
        let card = self
            .hands
            .get_mut(&target)
            .and_then(|h| h.remove_at(index))
            .ok_or(GameError::IllegalMove("no such card"))?;
        self.hands.entry(asker).or_default().push(card);
        self.interaction = Interaction::Idle;

        let (asker_name, target_name) = (self.name(asker), self.name(target));
        out.to(target, Notification::Hand(self.hand_cards(target)));
        out.to(asker, Notification::Hand(self.hand_cards(asker)));
        out.to(asker, Notification::Unlock);
        out.to(
            asker,
            Notification::FavourRecv {
                from: target_name.clone(),
                card,
            },
        );
        out.to(
            target,
            Notification::FavourGave {
                to: asker_name.clone(),
                card,
            },
        );
        out.all_except(
            &[asker, target],
            Notification::FavourComplete {
                asker: asker_name,
                target: target_name,
            },
        );
        Ok(())
    }

    fn answer_random_who(&mut self, sender: SessionId, answer: &str, out: &mut Outbound) {
        if !self.interaction.awaiting_target(sender, TargetKind::Random)
            || self.drop_if_nobody_to_ask(sender, out)
        {
            return;
        }
        let taken = self
            .pick_target(sender, answer)
            .and_then(|t| Some((t, self.hands.get_mut(&t)?.take_random()?)));
        let Some((target, card)) = taken else {
            out.to(sender, Notification::ask(Question::RandomWho));
            return;
        };
        self.hands.entry(sender).or_default().push(card);
        self.interaction = Interaction::Idle;

        let (asker_name, target_name) = (self.name(sender), self.name(target));
        out.all_except(
            &[sender, target],
            Notification::Randomed {
                asker: asker_name.clone(),
                target: target_name.clone(),
            },
        );
        out.to(
            target,
            Notification::RandomGave {
                to: asker_name,
                card,
            },
        );
        out.to(
            sender,
            Notification::RandomRecv {
                from: target_name,
                card,
            },
        );
        out.to(sender, Notification::Hand(self.hand_cards(sender)));
        out.to(target, Notification::Hand(self.hand_cards(target)));
    }

    fn answer_steal_who(&mut self, sender: SessionId, answer: &str, out: &mut Outbound) {
        if !self.interaction.awaiting_target(sender, TargetKind::Steal) {
            return;
        }
        let Some(target) = self.pick_target(sender, answer) else {
            out.to(sender, Notification::ask(Question::StealWho));
            return;
        };
        self.interaction = Interaction::AwaitingStealItem {
            asker: sender,
            target,
        };
        out.to(sender, Notification::ask(Question::StealWhat));
    }

    fn answer_steal_what(&mut self, sender: SessionId, answer: &str, out: &mut Outbound) {
        let Interaction::AwaitingStealItem { asker, target } = self.interaction else {
            return;
        };
        if asker != sender {
            return;
        }
        self.interaction = Interaction::Idle;

        let (asker_name, target_name) = (self.name(asker), self.name(target));
        let stolen = answer.parse::<Card>().ok().filter(|&card| {
            self.hands
                .get_mut(&target)
                .is_some_and(|h| h.remove_card(card))
        });
        let Some(card) = stolen else {
            out.all(Notification::StealNo {
                asker: asker_name,
                target: target_name,
                card: answer.to_owned(),
            });
            return;
        };
        self.hands.entry(asker).or_default().push(card);
        out.to(target, Notification::Hand(self.hand_cards(target)));
        out.to(asker, Notification::Hand(self.hand_cards(asker)));
        out.all(Notification::StealYes {
            asker: asker_name,
            target: target_name,
            card,
        });
    }

    fn sort(&mut self, sender: SessionId, out: &mut Outbound) -> Result<(), GameError> {
        if !self.players.contains(&sender) {
            return Err(GameError::IllegalMove("not a player"));
        }
        let hand = self.hands.entry(sender).or_default();
        hand.sort();
        out.to(sender, Notification::Hand(hand.cards().to_vec()));
        Ok(())
    }

    // -----------------------------------------------------------------
    // Turn bookkeeping
    // -----------------------------------------------------------------

    /// Ends the current turn. An attacked player keeps the turn once.
    pub(crate) fn increment_turn(&mut self) {
        if self.attack {
            self.attack = false;
        } else {
            self.current += 1;
        }
    }

    /// Wraps the turn pointer and announces whose turn it is.
    pub(crate) fn next_turn(&mut self, out: &mut Outbound) {
        if self.players.is_empty() {
            return;
        }
        if self.current >= self.players.len() {
            self.current = 0;
        }
        out.all(Notification::NowPlaying(self.name(self.players[self.current])));
        out.all(Notification::DrawPile(!self.deck.is_empty()));
    }

    pub(crate) fn capture(&self) -> Snapshot {
        Snapshot {
            deck: self.deck.clone(),
            current: self.current,
            attack: self.attack,
        }
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.deck = snapshot.deck;
        self.current = snapshot.current;
        self.attack = snapshot.attack;
    }

    // -----------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------

    fn name(&self, session: SessionId) -> String {
        self.names.get(&session).cloned().unwrap_or_default()
    }

    fn player_by_name(&self, name: &str) -> Option<SessionId> {
        self.players
            .iter()
            .copied()
            .find(|p| self.names.get(p).is_some_and(|n| n == name))
    }

    fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|&p| self.name(p)).collect()
    }

    fn spectator_names(&self) -> Vec<String> {
        self.spectators.iter().map(|&s| self.name(s)).collect()
    }

    fn holds_cards(&self, session: SessionId) -> bool {
        self.hands.get(&session).is_some_and(|h| !h.is_empty())
    }

    fn hand_cards(&self, session: SessionId) -> Vec<Card> {
        self.hands
            .get(&session)
            .map(|h| h.cards().to_vec())
            .unwrap_or_default()
    }
}

/// The exploding-cats game, hosted by a room.
pub struct CatsGame;

impl GameLogic for CatsGame {
    type State = CatsState;

    fn init() -> CatsState {
        CatsState::new()
    }

    fn on_join(
        state: &mut CatsState,
        session: SessionId,
        name: &str,
    ) -> Vec<(Recipient, Notification)> {
        let mut out = Outbound::new();
        state.admit(session, name, &mut out);
        out.into_vec()
    }

    fn on_part(
        state: &mut CatsState,
        session: SessionId,
    ) -> Vec<(Recipient, Notification)> {
        let mut out = Outbound::new();
        state.remove(session, &mut out);
        out.into_vec()
    }

    fn handle_command(
        state: &mut CatsState,
        sender: SessionId,
        command: Command,
    ) -> Vec<(Recipient, Notification)> {
        let verb = command.verb();
        let mut out = Outbound::new();
        match state.apply(sender, command, &mut out) {
            Ok(()) => out.into_vec(),
            Err(e) => {
                tracing::debug!(%sender, verb, error = %e, "rejected");
                vec![(
                    Recipient::Session(sender),
                    Notification::Error(ErrorReason::IllegalMove),
                )]
            }
        }
    }

    fn is_finished(state: &CatsState) -> bool {
        state.phase == Phase::Won
    }

    fn on_reset(_state: &CatsState) -> Vec<(Recipient, Notification)> {
        let mut out = Outbound::new();
        out.all(Notification::Hand(Vec::new()));
        out.all(Notification::DrawPile(false));
        out.all(Notification::NoDiscard);
        out.all(Notification::Bcast(BcastEvent::NewGame));
        out.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use crate::DEFUSES_IN_PLAY;

    type Notices = Vec<(Recipient, Notification)>;

    fn lines_for(notices: &Notices, who: SessionId) -> Vec<String> {
        notices
            .iter()
            .filter(|(r, _)| r.includes(who))
            .map(|(_, n)| n.to_string())
            .collect()
    }

    fn cmd(state: &mut CatsState, who: SessionId, line: &str) -> Notices {
        let command: Command = line.parse().unwrap();
        CatsGame::handle_command(state, who, command)
    }

    fn is_illegal(notices: &Notices) -> bool {
        matches!(
            notices.as_slice(),
            [(_, Notification::Error(ErrorReason::IllegalMove))]
        )
    }

    /// A lobby where every name has joined the game.
    fn lobby(names: &[&str]) -> (CatsState, Vec<SessionId>) {
        let mut state = CatsGame::init();
        let ids: Vec<SessionId> = (1..=names.len() as u64).map(SessionId).collect();
        for (&id, name) in ids.iter().zip(names) {
            CatsGame::on_join(&mut state, id, name);
            cmd(&mut state, id, "join");
        }
        (state, ids)
    }

    /// A started game with a fixed turn order, deck (last card on top) and
    /// hands.
    fn rigged(
        names: &[&str],
        deck: Vec<Card>,
        hands: &[Vec<Card>],
    ) -> (CatsState, Vec<SessionId>) {
        let (mut state, ids) = lobby(names);
        cmd(&mut state, ids[0], "start");
        state.players = ids.clone();
        state.current = 0;
        state.deck = Deck::from_cards(deck);
        state.hands = ids
            .iter()
            .copied()
            .zip(hands.iter().cloned().map(Hand::from_cards))
            .collect();
        (state, ids)
    }

    fn filler(n: usize) -> Vec<Card> {
        vec![Card::Random1; n]
    }

    // -- Lobby ----------------------------------------------------------

    #[test]
    fn test_join_room_syncs_newcomer() {
        let mut state = CatsGame::init();
        let (a, b) = (SessionId(1), SessionId(2));
        let first = CatsGame::on_join(&mut state, a, "alice");
        assert_eq!(
            lines_for(&first, a),
            ["joins alice", "spectators alice", "players", "message spectating"]
        );

        cmd(&mut state, a, "join");
        let second = CatsGame::on_join(&mut state, b, "bob");
        assert_eq!(lines_for(&second, a), ["joins bob"]);
        assert_eq!(
            lines_for(&second, b),
            ["joins bob", "spectators bob", "players alice", "message spectating"]
        );
    }

    #[test]
    fn test_join_and_leave_game() {
        let mut state = CatsGame::init();
        let a = SessionId(1);
        CatsGame::on_join(&mut state, a, "alice");

        let out = cmd(&mut state, a, "join");
        assert_eq!(
            lines_for(&out, a),
            ["upgrades alice", "players alice", "message playing"]
        );
        assert!(is_illegal(&cmd(&mut state, a, "join")));

        let out = cmd(&mut state, a, "leave");
        assert_eq!(
            lines_for(&out, a),
            ["downgrades alice", "players", "message spectating"]
        );
        assert!(is_illegal(&cmd(&mut state, a, "leave")));
        assert!(is_illegal(&cmd(&mut state, a, "sort")));
        assert_eq!(state.spectators(), &[a]);
    }

    #[test]
    fn test_start_needs_two_players() {
        let (mut state, ids) = lobby(&["alice"]);
        let watcher = SessionId(9);
        CatsGame::on_join(&mut state, watcher, "wendy");

        let out = cmd(&mut state, ids[0], "start");
        assert_eq!(lines_for(&out, ids[0]), ["bcast min_players"]);
        assert!(lines_for(&out, watcher).is_empty());
        assert_eq!(state.phase(), Phase::Lobby);
    }

    #[test]
    fn test_start_rejects_seven_players() {
        let (mut state, ids) = lobby(&["a", "b", "c", "d", "e", "f", "g"]);
        let out = cmd(&mut state, ids[3], "start");
        for &id in &ids {
            assert_eq!(lines_for(&out, id), ["bcast max_players"]);
        }
        assert_eq!(state.phase(), Phase::Lobby);
    }

    #[test]
    fn test_start_six_players_warns_then_starts() {
        let (mut state, ids) = lobby(&["a", "b", "c", "d", "e", "f"]);
        let out = cmd(&mut state, ids[0], "start");
        assert_eq!(lines_for(&out, ids[0])[0], "bcast high_players");
        assert_eq!(state.phase(), Phase::Playing);
        for &id in &ids {
            assert_eq!(state.hand(id).unwrap().len(), 7);
        }
        assert_eq!(state.deck().count(Card::Exploding), 5);
        assert_eq!(state.deck().count(Card::Defuse), 0);
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    #[case(5)]
    fn test_start_deals_and_builds_deck(#[case] players: usize) {
        let names = ["a", "b", "c", "d", "e"];
        let (mut state, ids) = lobby(&names[..players]);
        let out = cmd(&mut state, ids[0], "start");

        let lines = lines_for(&out, ids[0]);
        assert_eq!(lines[0], "clear_message");
        assert_eq!(lines[1], "bcast starting");
        assert!(lines[2].starts_with("players "));
        assert!(lines[3].starts_with("now_playing "));
        assert!(lines[4].starts_with("hand defuse "));
        assert_eq!(lines.last().unwrap(), "draw_pile yes");

        let mut defuses = state.deck().count(Card::Defuse);
        for &id in &ids {
            let hand = state.hand(id).unwrap();
            assert_eq!(hand.len(), 8);
            assert_eq!(hand.count(Card::Defuse), 1);
            defuses += 1;
        }
        assert_eq!(defuses, DEFUSES_IN_PLAY);
        assert_eq!(state.deck().count(Card::Exploding), players - 1);
        assert_eq!(state.current_player(), Some(state.players()[0]));
    }

    #[test]
    fn test_late_joiner_spectates_running_game() {
        let (mut state, _ids) = lobby(&["alice", "bob"]);
        state.apply(SessionId(1), Command::Start, &mut Outbound::new()).unwrap();

        let carol = SessionId(3);
        let out = CatsGame::on_join(&mut state, carol, "carol");
        let lines = lines_for(&out, carol);
        assert_eq!(lines[3], "message spectating_started");
        assert_eq!(lines[4], "draw_pile yes");
        assert!(is_illegal(&cmd(&mut state, carol, "join")));
        assert!(is_illegal(&cmd(&mut state, carol, "start")));
    }

    // -- Drawing --------------------------------------------------------

    #[test]
    fn test_draw_passes_the_turn() {
        let (mut state, ids) = rigged(
            &["alice", "bob"],
            vec![Card::Skip, Card::See3],
            &[vec![Card::Defuse], vec![Card::Defuse]],
        );
        let (a, b) = (ids[0], ids[1]);

        assert!(is_illegal(&cmd(&mut state, b, "draw")));

        let out = cmd(&mut state, a, "draw");
        assert_eq!(
            lines_for(&out, a),
            ["hand defuse see3", "drew see3", "now_playing bob", "draw_pile yes"]
        );
        assert_eq!(
            lines_for(&out, b),
            ["drew_other alice", "now_playing bob", "draw_pile yes"]
        );
        assert_eq!(state.current_player(), Some(b));

        let out = cmd(&mut state, b, "draw");
        assert_eq!(lines_for(&out, a)[1..], ["now_playing alice", "draw_pile no"]);
        assert!(is_illegal(&cmd(&mut state, a, "draw")));
    }

    #[test]
    fn test_unsaved_explosion_ends_two_player_game() {
        // One exploding card on top of four spare defuses.
        let mut deck = vec![Card::Defuse; 4];
        deck.push(Card::Exploding);
        let (mut state, ids) = rigged(
            &["alpha", "beta"],
            deck,
            &[vec![Card::Skip], vec![Card::Defuse]],
        );
        let (a, b) = (ids[0], ids[1]);

        let out = cmd(&mut state, a, "draw");
        assert_eq!(
            lines_for(&out, a),
            [
                "exploded alpha",
                "downgrades alpha",
                "players beta",
                "message spectating_exploded",
                "hand",
                "wins beta",
            ]
        );
        assert_eq!(
            lines_for(&out, b),
            ["exploded alpha", "downgrades alpha", "players beta", "wins beta"]
        );
        assert!(CatsGame::is_finished(&state));
        assert_eq!(state.players(), &[b]);
        assert_eq!(state.hand(a), None);
    }

    #[test]
    fn test_defuse_and_place_exploding_card() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            vec![Card::Skip, Card::Nope, Card::Exploding],
            &[vec![Card::Defuse, Card::Skip], vec![Card::Nope]],
        );
        let (a, b) = (ids[0], ids[1]);

        let out = cmd(&mut state, a, "draw");
        assert_eq!(
            lines_for(&out, a),
            ["exploded a", "defusing", "now_playing a", "draw_pile yes"]
        );
        assert!(state.is_defusing());

        assert!(is_illegal(&cmd(&mut state, a, "draw")));
        assert!(is_illegal(&cmd(&mut state, a, "play 1")));
        assert!(is_illegal(&cmd(&mut state, b, "play 0")));
        // No position can be given before the defuse is played.
        assert!(cmd(&mut state, a, "a defuse_pos 0").is_empty());

        let out = cmd(&mut state, a, "play 0");
        assert_eq!(lines_for(&out, a), ["hand skip", "played a defuse", "q defuse_pos"]);

        assert_eq!(lines_for(&cmd(&mut state, a, "a defuse_pos top"), a), ["q defuse_pos"]);
        assert_eq!(lines_for(&cmd(&mut state, a, "a defuse_pos -1"), a), ["q defuse_pos"]);

        let out = cmd(&mut state, a, "a defuse_pos 99");
        assert_eq!(lines_for(&out, a), ["now_playing b", "draw_pile yes"]);
        assert!(!state.is_defusing());
        assert_eq!(state.deck().cards(), &[Card::Exploding, Card::Skip, Card::Nope]);
        assert_eq!(state.current_player(), Some(b));
    }

    // -- Playing cards --------------------------------------------------

    #[test]
    fn test_rejected_play_changes_nothing() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(3),
            &[vec![Card::Skip], vec![Card::Skip]],
        );
        let deck_before = state.deck().clone();

        assert!(is_illegal(&cmd(&mut state, ids[1], "play 0")));
        assert!(is_illegal(&cmd(&mut state, ids[0], "play 5")));
        assert_eq!(state.hand(ids[1]).unwrap().cards(), &[Card::Skip]);
        assert_eq!(state.deck(), &deck_before);
        assert_eq!(state.current_player(), Some(ids[0]));
    }

    #[test]
    fn test_nope_without_snapshot_is_noop() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(2),
            &[vec![Card::Nope], vec![]],
        );
        let out = cmd(&mut state, ids[0], "play 0");
        assert_eq!(lines_for(&out, ids[1]), ["played a nope", "bcast no_nope"]);
        assert_eq!(state.current_player(), Some(ids[0]));
    }

    #[test]
    fn test_nope_twice_is_double_negation() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(4),
            &[vec![Card::Skip], vec![Card::Nope, Card::Nope]],
        );
        let (a, b) = (ids[0], ids[1]);

        cmd(&mut state, a, "play 0");
        assert_eq!(state.current_player(), Some(b));

        let out = cmd(&mut state, b, "play 0");
        assert!(lines_for(&out, a).contains(&"now_playing a".to_owned()));
        assert_eq!(state.current_player(), Some(a));

        cmd(&mut state, b, "play 0");
        assert_eq!(state.current_player(), Some(b));
        assert_eq!(state.deck().len(), 4);
    }

    #[test]
    fn test_nope_reverts_shuffle() {
        let original = vec![
            Card::Skip,
            Card::Nope,
            Card::Attack,
            Card::See3,
            Card::Favour,
            Card::Shuffle,
            Card::Random1,
            Card::Random2,
            Card::Random3,
            Card::Random4,
        ];
        let (mut state, ids) = rigged(
            &["a", "b"],
            original.clone(),
            &[vec![Card::Shuffle], vec![Card::Nope]],
        );
        cmd(&mut state, ids[0], "play 0");
        cmd(&mut state, ids[1], "play 0");
        assert_eq!(state.deck().cards(), original.as_slice());
    }

    #[test]
    fn test_draw_clears_snapshot() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(4),
            &[vec![Card::Skip], vec![Card::Nope]],
        );
        cmd(&mut state, ids[0], "play 0");
        cmd(&mut state, ids[1], "draw");
        let out = cmd(&mut state, ids[1], "play 0");
        assert!(lines_for(&out, ids[0]).contains(&"bcast no_nope".to_owned()));
    }

    #[test]
    fn test_attack_gives_next_player_two_turns() {
        let (mut state, ids) = rigged(
            &["a", "b", "c"],
            filler(6),
            &[vec![Card::Attack], vec![], vec![]],
        );
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        let out = cmd(&mut state, a, "play 0");
        assert_eq!(lines_for(&out, c)[1], "now_playing b");
        assert!(state.is_attack());

        cmd(&mut state, b, "draw");
        assert_eq!(state.current_player(), Some(b));
        assert!(!state.is_attack());

        cmd(&mut state, b, "draw");
        assert_eq!(state.current_player(), Some(c));
    }

    #[test]
    fn test_attack_while_attacked_caps_at_two_turns() {
        let (mut state, ids) = rigged(
            &["a", "b", "c"],
            filler(6),
            &[vec![Card::Attack], vec![Card::Attack], vec![]],
        );
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        cmd(&mut state, a, "play 0");
        cmd(&mut state, b, "play 0");
        assert_eq!(state.current_player(), Some(b));
        assert!(!state.is_attack());

        cmd(&mut state, b, "draw");
        assert_eq!(state.current_player(), Some(c));
    }

    #[test]
    fn test_skip_wraps_turn_order() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(2),
            &[vec![], vec![Card::Skip]],
        );
        cmd(&mut state, ids[0], "draw");
        let out = cmd(&mut state, ids[1], "play 0");
        assert_eq!(lines_for(&out, ids[0])[1..], ["now_playing a", "draw_pile yes"]);
    }

    #[test]
    fn test_see3_shows_top_first() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            vec![Card::Skip, Card::Nope, Card::Attack, Card::See3],
            &[vec![Card::See3], vec![]],
        );
        let out = cmd(&mut state, ids[0], "play 0");
        assert_eq!(
            lines_for(&out, ids[0]),
            ["hand", "played a see3", "seen see3 attack nope"]
        );
        assert_eq!(lines_for(&out, ids[1]), ["played a see3"]);
        assert_eq!(state.deck().len(), 4);
    }

    #[test]
    fn test_sort_hand() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(1),
            &[vec![Card::Random2, Card::Skip, Card::Defuse], vec![]],
        );
        // Any player may sort, on their turn or not.
        let out = cmd(&mut state, ids[0], "sort");
        assert_eq!(lines_for(&out, ids[0]), ["hand defuse skip random2"]);
        assert!(lines_for(&out, ids[1]).is_empty());
    }

    // -- Combos and questions -------------------------------------------

    #[test]
    fn test_pair_needs_two_matching_cards() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(2),
            &[vec![Card::Random1, Card::Skip], vec![Card::Nope]],
        );
        assert!(is_illegal(&cmd(&mut state, ids[0], "play_multiple 2 random1")));
        assert!(is_illegal(&cmd(&mut state, ids[0], "play_multiple 4 skip")));
        assert_eq!(state.hand(ids[0]).unwrap().len(), 2);
        assert!(state.interaction().is_idle());
    }

    #[test]
    fn test_pair_takes_random_card() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(2),
            &[vec![Card::Random1, Card::Skip, Card::Random1], vec![Card::Nope]],
        );
        let (a, b) = (ids[0], ids[1]);

        let out = cmd(&mut state, a, "play_multiple 2 random1");
        assert_eq!(
            lines_for(&out, a),
            ["hand skip", "played_multiple a 2 random1", "q random_who"]
        );
        assert!(is_illegal(&cmd(&mut state, a, "draw")));
        assert!(is_illegal(&cmd(&mut state, a, "play 0")));

        assert_eq!(lines_for(&cmd(&mut state, a, "a random_who a"), a), ["q random_who"]);
        assert_eq!(lines_for(&cmd(&mut state, a, "a random_who zed"), a), ["q random_who"]);
        // Only the asker's answer counts.
        assert!(cmd(&mut state, b, "a random_who a").is_empty());

        let out = cmd(&mut state, a, "a random_who b");
        assert_eq!(lines_for(&out, a), ["random_recv b nope", "hand skip nope"]);
        assert_eq!(lines_for(&out, b), ["random_gave a nope", "hand"]);
        assert!(state.interaction().is_idle());
        assert_eq!(state.current_player(), Some(a));
    }

    #[test]
    fn test_pair_against_empty_hand_reprompts() {
        let (mut state, ids) = rigged(
            &["a", "b", "c"],
            filler(2),
            &[vec![Card::Skip, Card::Skip], vec![], vec![Card::Nope]],
        );
        cmd(&mut state, ids[0], "play_multiple 2 skip");
        let out = cmd(&mut state, ids[0], "a random_who b");
        assert_eq!(lines_for(&out, ids[0]), ["q random_who"]);
        assert!(!state.interaction().is_idle());

        let out = cmd(&mut state, ids[0], "a random_who c");
        assert_eq!(lines_for(&out, ids[2]), ["random_gave a nope", "hand"]);
        assert!(state.interaction().is_idle());
    }

    #[test]
    fn test_pair_with_no_cards_left_to_take_is_dropped() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(2),
            &[vec![Card::Random1, Card::Random1], vec![]],
        );
        let (a, b) = (ids[0], ids[1]);
        cmd(&mut state, a, "play_multiple 2 random1");

        let out = cmd(&mut state, a, "a random_who b");
        assert_eq!(lines_for(&out, a), ["q_cancel"]);
        assert!(state.interaction().is_idle());

        let out = cmd(&mut state, a, "draw");
        assert!(!is_illegal(&out));
        assert_eq!(state.current_player(), Some(b));
    }

    #[test]
    fn test_favour_with_no_cards_left_to_give_is_dropped() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(2),
            &[vec![Card::Favour, Card::Random1], vec![]],
        );
        let (a, b) = (ids[0], ids[1]);
        cmd(&mut state, a, "play 0");

        let out = cmd(&mut state, a, "a favour_who b");
        assert_eq!(lines_for(&out, a), ["q_cancel"]);
        assert!(lines_for(&out, b).is_empty());
        assert!(state.interaction().is_idle());

        let out = cmd(&mut state, a, "draw");
        assert!(!is_illegal(&out));
        assert_eq!(state.current_player(), Some(b));
    }

    #[test]
    fn test_favour_skips_empty_handed_target() {
        let (mut state, ids) = rigged(
            &["a", "b", "c"],
            filler(2),
            &[vec![Card::Favour], vec![], vec![Card::Skip]],
        );
        let (a, c) = (ids[0], ids[2]);
        cmd(&mut state, a, "play 0");

        assert_eq!(lines_for(&cmd(&mut state, a, "a favour_who b"), a), ["q favour_who"]);
        let out = cmd(&mut state, a, "a favour_who c");
        assert_eq!(lines_for(&out, c), ["q favour_what a"]);
    }

    #[test]
    fn test_favour_target_noping_last_card_cancels_favour() {
        let (mut state, ids) = rigged(
            &["a", "b", "c"],
            filler(2),
            &[vec![Card::Favour], vec![Card::Nope], vec![Card::Skip]],
        );
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        cmd(&mut state, a, "play 0");
        cmd(&mut state, a, "a favour_who b");

        let out = cmd(&mut state, b, "play 0");
        assert_eq!(
            lines_for(&out, a),
            ["played b nope", "bcast no_nope", "bcast favour_cancel", "unlock"]
        );
        assert_eq!(
            lines_for(&out, b),
            ["hand", "played b nope", "bcast no_nope", "bcast favour_cancel", "q_cancel"]
        );
        assert_eq!(
            lines_for(&out, c),
            ["played b nope", "bcast no_nope", "bcast favour_cancel"]
        );
        assert!(state.interaction().is_idle());
        assert!(!is_illegal(&cmd(&mut state, a, "draw")));
    }

    #[test]
    fn test_favour_exchange() {
        let (mut state, ids) = rigged(
            &["a", "b", "c"],
            filler(2),
            &[vec![Card::Favour], vec![Card::Attack, Card::Skip], vec![]],
        );
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        let out = cmd(&mut state, a, "play 0");
        assert_eq!(lines_for(&out, a), ["hand", "played a favour", "q favour_who"]);
        assert_eq!(lines_for(&cmd(&mut state, a, "a favour_who a"), a), ["q favour_who"]);

        let out = cmd(&mut state, a, "a favour_who b");
        assert_eq!(lines_for(&out, a), ["favoured a b", "lock"]);
        assert_eq!(lines_for(&out, b), ["q favour_what a"]);
        assert_eq!(lines_for(&out, c), ["favoured a b"]);

        assert!(is_illegal(&cmd(&mut state, c, "a favour_what 0")));
        assert!(is_illegal(&cmd(&mut state, b, "a favour_what 5")));
        assert!(is_illegal(&cmd(&mut state, b, "a favour_what x")));

        let out = cmd(&mut state, b, "a favour_what 1");
        assert_eq!(lines_for(&out, a), ["hand skip", "unlock", "favour_recv b skip"]);
        assert_eq!(lines_for(&out, b), ["hand attack", "favour_gave a skip"]);
        assert_eq!(lines_for(&out, c), ["favour_complete a b"]);
        assert!(state.interaction().is_idle());
    }

    #[test]
    fn test_triple_steals_named_card() {
        let (mut state, ids) = rigged(
            &["a", "b"],
            filler(2),
            &[vec![Card::Skip; 6], vec![Card::Defuse]],
        );
        let (a, b) = (ids[0], ids[1]);

        cmd(&mut state, a, "play_multiple 3 skip");
        assert_eq!(lines_for(&cmd(&mut state, a, "a steal_who b"), a), ["q steal_what"]);
        let out = cmd(&mut state, a, "a steal_what nope");
        assert_eq!(lines_for(&out, b), ["steal_n a b nope"]);
        assert!(state.interaction().is_idle());

        cmd(&mut state, a, "play_multiple 3 skip");
        cmd(&mut state, a, "a steal_who b");
        let out = cmd(&mut state, a, "a steal_what defuse");
        assert_eq!(lines_for(&out, b), ["hand", "steal_y a b defuse"]);
        assert_eq!(lines_for(&out, a), ["hand defuse", "steal_y a b defuse"]);
    }

    // -- Elimination ----------------------------------------------------

    #[test]
    fn test_leaving_before_current_keeps_turn() {
        let (mut state, ids) = rigged(&["a", "b", "c"], filler(4), &[vec![], vec![], vec![]]);
        state.current = 2;

        let out = cmd(&mut state, ids[0], "leave");
        assert_eq!(lines_for(&out, ids[1]), ["downgrades a", "players b c"]);
        assert_eq!(
            lines_for(&out, ids[0]),
            ["downgrades a", "players b c", "message spectating_exploded", "hand"]
        );
        assert_eq!(state.current_player(), Some(ids[2]));
    }

    #[test]
    fn test_current_player_leaving_passes_turn() {
        let (mut state, ids) = rigged(&["a", "b", "c"], filler(4), &[vec![], vec![], vec![]]);
        let out = cmd(&mut state, ids[0], "leave");
        assert_eq!(
            lines_for(&out, ids[1]),
            ["downgrades a", "players b c", "now_playing b", "draw_pile yes"]
        );
        assert_eq!(state.current_player(), Some(ids[1]));
    }

    #[test]
    fn test_favour_target_leaving_cancels_favour() {
        let (mut state, ids) = rigged(
            &["a", "b", "c"],
            filler(4),
            &[vec![Card::Favour], vec![Card::Skip], vec![]],
        );
        let (a, b) = (ids[0], ids[1]);
        cmd(&mut state, a, "play 0");
        cmd(&mut state, a, "a favour_who b");

        let out = CatsGame::on_part(&mut state, b);
        assert_eq!(
            lines_for(&out, a),
            ["downgrades b", "players a c", "bcast favour_cancel", "unlock", "parts b"]
        );
        assert!(state.interaction().is_idle());
        assert!(!state.spectators().contains(&b));
    }

    #[test]
    fn test_favour_asker_leaving_cancels_question() {
        let (mut state, ids) = rigged(
            &["a", "b", "c"],
            filler(4),
            &[vec![Card::Favour], vec![Card::Skip], vec![]],
        );
        let (a, b) = (ids[0], ids[1]);
        cmd(&mut state, a, "play 0");
        cmd(&mut state, a, "a favour_who b");

        let out = CatsGame::on_part(&mut state, a);
        let lines = lines_for(&out, b);
        assert!(lines.contains(&"q_cancel".to_owned()));
        assert!(lines.contains(&"now_playing b".to_owned()));
        assert!(state.interaction().is_idle());
    }

    #[test]
    fn test_reset_tokens() {
        let state = CatsGame::init();
        let out = CatsGame::on_reset(&state);
        assert_eq!(
            lines_for(&out, SessionId(1)),
            ["hand", "draw_pile no", "no_discard", "bcast new_game"]
        );
    }
}
