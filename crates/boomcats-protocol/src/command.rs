//! Inbound command grammar.
//!
//! Every client message is one line of space-separated tokens. Before a
//! session is attached to a room only [`Command::JoinLobby`] means
//! anything; afterwards the room and game handle the rest.

use std::str::FromStr;

use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::{Card, ProtocolError};

/// The sub-questions a player can be asked during a turn.
///
/// The server sends `q <question> [arg]` and the client answers with
/// `a <question> <answer>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Question {
    /// Where to re-insert the exploding card (depth from the top).
    DefusePos,
    /// Which player to ask for a favour.
    FavourWho,
    /// Which card (hand index) to give away.
    FavourWhat,
    /// Which player to take a random card from.
    RandomWho,
    /// Which player to steal a named card from.
    StealWho,
    /// Which card (by name) to steal.
    StealWhat,
}

/// A decoded client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `join_lobby <room> <name>` — attach to a room under a display name.
    JoinLobby { room: String, name: String },
    /// `chat <text…>` — room-wide chat, text kept verbatim.
    Chat(String),
    /// `join` — spectator becomes a player (lobby only).
    Join,
    /// `leave` — player becomes a spectator.
    Leave,
    /// `start` — deal and begin the game.
    Start,
    /// `draw` — take the top card and end the turn.
    Draw,
    /// `play <handIndex>`
    Play(usize),
    /// `play_multiple <count> <card>` — pair or triple combo.
    PlayMultiple { count: u8, card: Card },
    /// `a <question> <answer>`
    Answer { question: Question, answer: String },
    /// `sort` — reorder own hand for display.
    Sort,
}

impl Command {
    /// Returns the verb token, for logging.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::JoinLobby { .. } => "join_lobby",
            Self::Chat(_) => "chat",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Start => "start",
            Self::Draw => "draw",
            Self::Play(_) => "play",
            Self::PlayMultiple { .. } => "play_multiple",
            Self::Answer { .. } => "a",
            Self::Sort => "sort",
        }
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        let verb = fields
            .next()
            .ok_or_else(|| ProtocolError::malformed("empty line"))?;

        let command = match verb {
            "join_lobby" => {
                let room = arg(&mut fields, "room")?;
                let name = arg(&mut fields, "name")?;
                if fields.next().is_some() {
                    return Err(ProtocolError::malformed(
                        "join_lobby takes exactly two arguments",
                    ));
                }
                Self::JoinLobby {
                    room: room.to_owned(),
                    name: name.to_owned(),
                }
            }
            "chat" => {
                let text = line
                    .trim_start()
                    .strip_prefix("chat")
                    .and_then(|rest| rest.strip_prefix(' '))
                    .unwrap_or("");
                Self::Chat(text.to_owned())
            }
            "join" => Self::Join,
            "leave" => Self::Leave,
            "start" => Self::Start,
            "draw" => Self::Draw,
            "sort" => Self::Sort,
            "play" => Self::Play(parse_arg(&mut fields, "hand index")?),
            "play_multiple" => {
                let count = parse_arg(&mut fields, "count")?;
                let card = parse_arg(&mut fields, "card")?;
                Self::PlayMultiple { count, card }
            }
            "a" => {
                let question = parse_arg(&mut fields, "question")?;
                let answer = arg(&mut fields, "answer")?;
                Self::Answer {
                    question,
                    answer: answer.to_owned(),
                }
            }
            other => {
                return Err(ProtocolError::malformed(format!(
                    "unknown command {other:?}"
                )));
            }
        };
        Ok(command)
    }
}

fn arg<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<&'a str, ProtocolError> {
    fields
        .next()
        .ok_or_else(|| ProtocolError::malformed(format!("missing {what}")))
}

fn parse_arg<'a, T: FromStr>(
    fields: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<T, ProtocolError> {
    let raw = arg(fields, what)?;
    raw.parse()
        .map_err(|_| ProtocolError::malformed(format!("invalid {what} {raw:?}")))
}
