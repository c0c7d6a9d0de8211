//! Outbound notifications.
//!
//! Each variant renders to exactly one line of space-separated tokens via
//! `Display`. The leading token is the contract clients switch on, so the
//! strings here must not change.

use std::fmt;

use strum_macros::Display;

use crate::{Card, Question};

/// Reason carried by `err <reason>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorReason {
    UsernameExists,
    IllegalMove,
}

/// Status banner carried by `message <state>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    Playing,
    Spectating,
    SpectatingStarted,
    SpectatingExploded,
}

/// Room-wide event carried by `bcast <event>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BcastEvent {
    Starting,
    MinPlayers,
    MaxPlayers,
    HighPlayers,
    NoNope,
    NewGame,
    FavourCancel,
}

/// A notification sent from the server to one or more sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Version(u32),
    Error(ErrorReason),
    Joins(String),
    Parts(String),
    Upgrades(String),
    Downgrades(String),
    Players(Vec<String>),
    Spectators(Vec<String>),
    Message(MessageKind),
    ClearMessage,
    Bcast(BcastEvent),
    NowPlaying(String),
    DrawPile(bool),
    /// The recipient's whole hand; empty clears it.
    Hand(Vec<Card>),
    /// Private: the card the recipient just drew.
    Drew(Card),
    /// Public: someone drew a card (which one is not revealed).
    DrewOther(String),
    Played { name: String, card: Card },
    PlayedMultiple { name: String, count: u8, card: Card },
    /// `q <question> [arg]`
    Ask { question: Question, arg: Option<String> },
    Lock,
    Unlock,
    QCancel,
    Favoured { asker: String, target: String },
    FavourRecv { from: String, card: Card },
    FavourGave { to: String, card: Card },
    FavourComplete { asker: String, target: String },
    Randomed { asker: String, target: String },
    RandomGave { to: String, card: Card },
    RandomRecv { from: String, card: Card },
    /// Steal attempt that missed; `card` is the asker's text verbatim.
    StealNo { asker: String, target: String, card: String },
    StealYes { asker: String, target: String, card: Card },
    /// Private: the top cards of the deck, next draw first.
    Seen(Vec<Card>),
    Exploded(String),
    Defusing,
    Wins(String),
    Chat { name: String, text: String },
    NoDiscard,
}

impl Notification {
    /// Shorthand for `q <question>` without an argument.
    pub fn ask(question: Question) -> Self {
        Self::Ask { question, arg: None }
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    verb: &str,
    items: &[T],
) -> fmt::Result {
    f.write_str(verb)?;
    for item in items {
        write!(f, " {item}")?;
    }
    Ok(())
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version(n) => write!(f, "version {n}"),
            Self::Error(reason) => write!(f, "err {reason}"),
            Self::Joins(name) => write!(f, "joins {name}"),
            Self::Parts(name) => write!(f, "parts {name}"),
            Self::Upgrades(name) => write!(f, "upgrades {name}"),
            Self::Downgrades(name) => write!(f, "downgrades {name}"),
            Self::Players(names) => write_list(f, "players", names),
            Self::Spectators(names) => write_list(f, "spectators", names),
            Self::Message(kind) => write!(f, "message {kind}"),
            Self::ClearMessage => f.write_str("clear_message"),
            Self::Bcast(event) => write!(f, "bcast {event}"),
            Self::NowPlaying(name) => write!(f, "now_playing {name}"),
            Self::DrawPile(true) => f.write_str("draw_pile yes"),
            Self::DrawPile(false) => f.write_str("draw_pile no"),
            Self::Hand(cards) => write_list(f, "hand", cards),
            Self::Drew(card) => write!(f, "drew {card}"),
            Self::DrewOther(name) => write!(f, "drew_other {name}"),
            Self::Played { name, card } => write!(f, "played {name} {card}"),
            Self::PlayedMultiple { name, count, card } => {
                write!(f, "played_multiple {name} {count} {card}")
            }
            Self::Ask { question, arg: None } => write!(f, "q {question}"),
            Self::Ask { question, arg: Some(arg) } => {
                write!(f, "q {question} {arg}")
            }
            Self::Lock => f.write_str("lock"),
            Self::Unlock => f.write_str("unlock"),
            Self::QCancel => f.write_str("q_cancel"),
            Self::Favoured { asker, target } => {
                write!(f, "favoured {asker} {target}")
            }
            Self::FavourRecv { from, card } => {
                write!(f, "favour_recv {from} {card}")
            }
            Self::FavourGave { to, card } => write!(f, "favour_gave {to} {card}"),
            Self::FavourComplete { asker, target } => {
                write!(f, "favour_complete {asker} {target}")
            }
            Self::Randomed { asker, target } => {
                write!(f, "randomed {asker} {target}")
            }
            Self::RandomGave { to, card } => write!(f, "random_gave {to} {card}"),
            Self::RandomRecv { from, card } => {
                write!(f, "random_recv {from} {card}")
            }
            Self::StealNo { asker, target, card } => {
                write!(f, "steal_n {asker} {target} {card}")
            }
            Self::StealYes { asker, target, card } => {
                write!(f, "steal_y {asker} {target} {card}")
            }
            Self::Seen(cards) => write_list(f, "seen", cards),
            Self::Exploded(name) => write!(f, "exploded {name}"),
            Self::Defusing => f.write_str("defusing"),
            Self::Wins(name) => write!(f, "wins {name}"),
            Self::Chat { name, text } => write!(f, "chat {name} {text}"),
            Self::NoDiscard => f.write_str("no_discard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_notifications() {
        let players = Notification::Players(vec!["alice".into(), "bob".into()]);
        assert_eq!(players.to_string(), "players alice bob");
        assert_eq!(Notification::Spectators(vec![]).to_string(), "spectators");
        assert_eq!(Notification::Hand(vec![]).to_string(), "hand");
        assert_eq!(
            Notification::Hand(vec![Card::Defuse, Card::See3]).to_string(),
            "hand defuse see3"
        );
    }

    #[test]
    fn test_enum_payload_tokens() {
        assert_eq!(
            Notification::Error(ErrorReason::UsernameExists).to_string(),
            "err username_exists"
        );
        assert_eq!(
            Notification::Message(MessageKind::SpectatingExploded).to_string(),
            "message spectating_exploded"
        );
        assert_eq!(
            Notification::Bcast(BcastEvent::NoNope).to_string(),
            "bcast no_nope"
        );
        assert_eq!(Notification::DrawPile(false).to_string(), "draw_pile no");
    }

    #[test]
    fn test_question_notifications() {
        assert_eq!(
            Notification::ask(Question::DefusePos).to_string(),
            "q defuse_pos"
        );
        let favour_what = Notification::Ask {
            question: Question::FavourWhat,
            arg: Some("alice".into()),
        };
        assert_eq!(favour_what.to_string(), "q favour_what alice");
    }

    #[test]
    fn test_exchange_notifications() {
        let no = Notification::StealNo {
            asker: "a".into(),
            target: "b".into(),
            card: "joker".into(),
        };
        assert_eq!(no.to_string(), "steal_n a b joker");
        let played = Notification::PlayedMultiple {
            name: "a".into(),
            count: 3,
            card: Card::Random2,
        };
        assert_eq!(played.to_string(), "played_multiple a 3 random2");
        let chat = Notification::Chat {
            name: "a".into(),
            text: "gg  wp".into(),
        };
        assert_eq!(chat.to_string(), "chat a gg  wp");
    }
}
