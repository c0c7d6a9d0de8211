//! What each card does once it has been played.
//!
//! Every effect either captures a snapshot (reversible by `nope`) or
//! clears the one being held, so a `nope` can never reach further back
//! than the last reversible action.

use boomcats_protocol::{BcastEvent, Card, Notification, Question, SessionId};

use crate::engine::{CatsState, DefuseStep};
use crate::interaction::{Interaction, TargetKind};
use crate::outbound::Outbound;

/// A card's effect, run after the card has left the hand and `played` has
/// been broadcast.
pub(crate) type Effect = fn(&mut CatsState, SessionId, &mut Outbound);

/// The effect table.
pub(crate) fn effect_of(card: Card) -> Effect {
    match card {
        Card::Defuse => defuse,
        Card::Favour => favour,
        Card::Shuffle => shuffle,
        Card::Nope => nope,
        Card::Skip => skip,
        Card::Attack => attack,
        Card::See3 => see3,
        Card::Random1
        | Card::Random2
        | Card::Random3
        | Card::Random4
        | Card::Random5
        | Card::Exploding => inert,
    }
}

fn defuse(state: &mut CatsState, player: SessionId, out: &mut Outbound) {
    if state.defuse == DefuseStep::Drawn {
        state.defuse = DefuseStep::Placing;
        out.to(player, Notification::ask(Question::DefusePos));
    } else {
        state.snapshot = None;
    }
}

fn favour(state: &mut CatsState, player: SessionId, out: &mut Outbound) {
    state.snapshot = None;
    let kind = TargetKind::Favour;
    state.interaction = Interaction::AwaitingTarget {
        asker: player,
        kind,
    };
    out.to(player, Notification::ask(kind.question()));
}

fn shuffle(state: &mut CatsState, _player: SessionId, _out: &mut Outbound) {
    state.snapshot = Some(state.capture());
    state.deck.shuffle();
}

fn nope(state: &mut CatsState, _player: SessionId, out: &mut Outbound) {
    let Some(previous) = state.snapshot.take() else {
        out.all(Notification::Bcast(BcastEvent::NoNope));
        return;
    };
    // Keep what is being undone so the next nope can redo it.
    let undone = state.capture();
    state.restore(previous);
    state.snapshot = Some(undone);
    state.next_turn(out);
}

fn skip(state: &mut CatsState, _player: SessionId, out: &mut Outbound) {
    state.snapshot = Some(state.capture());
    state.increment_turn();
    state.next_turn(out);
}

fn attack(state: &mut CatsState, _player: SessionId, out: &mut Outbound) {
    state.snapshot = Some(state.capture());
    if state.attack {
        // Countering an attack only cancels the extra turn; nobody ever
        // owes more than two.
        state.attack = false;
    } else {
        state.current += 1;
        state.attack = true;
    }
    state.next_turn(out);
}

fn see3(state: &mut CatsState, player: SessionId, out: &mut Outbound) {
    out.to(player, Notification::Seen(state.deck.peek(3)));
    state.snapshot = None;
}

fn inert(state: &mut CatsState, _player: SessionId, _out: &mut Outbound) {
    state.snapshot = None;
}
