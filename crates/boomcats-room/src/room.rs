//! Room actor: an isolated Tokio task that owns one hosted game.
//!
//! Each room runs in its own task and is reached only through its command
//! queue. Commands are processed strictly in arrival order, and every
//! notification a command produces is queued to member outboxes before the
//! next command is looked at.
//!
//! Processing one command is wrapped in `catch_unwind`. A panic in game
//! code is a *room fault*: members are kicked, the room removes itself from
//! the registry and stops. Other rooms keep running.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Weak;

use boomcats_protocol::{
    Codec, Command, LineCodec, Notification, Recipient, RoomId, SessionId,
};
use boomcats_session::Outbox;
use tokio::sync::{mpsc, oneshot};

use crate::{GameLogic, RoomConfig, RoomError, RoomRegistry, RoomState};

/// Commands sent to a room actor through its queue.
pub(crate) enum RoomCommand {
    /// Add a session to the room under a display name.
    Join {
        session_id: SessionId,
        name: String,
        outbox: Outbox,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Remove a session from the room.
    Part {
        session_id: SessionId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// A decoded command from a member.
    Dispatch {
        session_id: SessionId,
        command: Command,
    },

    /// Request room metadata.
    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },

    /// Posted by the win timer: replace the finished game.
    NewGame,

    /// Kick everyone and stop.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub name: String,
    pub state: RoomState,
    /// Members in join order.
    pub members: Vec<String>,
}

/// Handle to a running room actor.
///
/// Cheap to clone. Every method fails with [`RoomError::Unavailable`] once
/// the actor has stopped.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl std::fmt::Debug for RoomCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Join { session_id, name, .. } => {
                write!(f, "Join({session_id}, {name})")
            }
            Self::Part { session_id, .. } => write!(f, "Part({session_id})"),
            Self::Dispatch {
                session_id,
                command,
            } => write!(f, "Dispatch({session_id}, {})", command.verb()),
            Self::GetInfo { .. } => write!(f, "GetInfo"),
            Self::NewGame => write!(f, "NewGame"),
            Self::Shutdown => write!(f, "Shutdown"),
        }
    }
}

impl RoomHandle {
    /// Returns the room instance's unique ID.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Returns `true` once the actor has stopped accepting commands.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Asks the room to admit `session_id` as `name`.
    ///
    /// # Errors
    /// - [`RoomError::NameCollision`] — a member already uses `name`
    /// - [`RoomError::AlreadyInRoom`] — the session is already a member
    /// - [`RoomError::Unavailable`] — the room has stopped
    pub async fn join(
        &self,
        session_id: SessionId,
        name: String,
        outbox: Outbox,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                session_id,
                name,
                outbox,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Removes `session_id` from the room.
    pub async fn part(&self, session_id: SessionId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Part {
                session_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Queues a member's command (fire-and-forget).
    ///
    /// Waits only when the room's queue is full.
    pub async fn dispatch(
        &self,
        session_id: SessionId,
        command: Command,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Dispatch {
                session_id,
                command,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Requests the current room info.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Tells the room to kick everyone and stop.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// One attached session.
struct Member {
    session_id: SessionId,
    name: String,
    outbox: Outbox,
}

/// What the run loop does after a command.
enum Flow {
    Continue,
    Stop(&'static str),
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<G: GameLogic> {
    room_id: RoomId,
    name: String,
    state: RoomState,
    config: RoomConfig,
    codec: LineCodec,
    /// Members in join order.
    members: Vec<Member>,
    game: G::State,
    /// Members whose outbox rejected a line during the current command.
    unresponsive: Vec<SessionId>,
    receiver: mpsc::Receiver<RoomCommand>,
    /// For posting `NewGame` back to ourselves without keeping the queue
    /// open.
    self_sender: mpsc::WeakSender<RoomCommand>,
    registry: Weak<RoomRegistry<G>>,
}

impl<G: GameLogic> RoomActor<G> {
    /// Runs the actor loop until the room empties, faults, or is shut down.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, room = %self.name, "room actor started");

        let mut faulted = false;
        while let Some(cmd) = self.receiver.recv().await {
            tracing::trace!(room_id = %self.room_id, ?cmd, "processing");
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| self.process(cmd)));
            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop(reason)) => {
                    tracing::info!(room_id = %self.room_id, reason, "room stopping");
                    break;
                }
                Err(payload) => {
                    tracing::error!(
                        room_id = %self.room_id,
                        room = %self.name,
                        panic = panic_message(payload.as_ref()),
                        "room fault, tearing down"
                    );
                    self.kick_all();
                    faulted = true;
                    break;
                }
            }
        }

        self.state = RoomState::Destroying;
        // Refuse anything queued from here on. Dropped replies surface as
        // `Unavailable`.
        self.receiver.close();
        if faulted {
            self.refuse_pending();
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.deregister(&self.name, self.room_id).await;
        }
        tracing::info!(room_id = %self.room_id, room = %self.name, "room actor stopped");
    }

    fn process(&mut self, cmd: RoomCommand) -> Flow {
        let had_members = !self.members.is_empty();

        match cmd {
            RoomCommand::Join {
                session_id,
                name,
                outbox,
                reply,
            } => {
                let result = self.handle_join(session_id, name, outbox);
                let _ = reply.send(result);
            }
            RoomCommand::Part { session_id, reply } => {
                let result = self.handle_part(session_id);
                let _ = reply.send(result);
            }
            RoomCommand::Dispatch {
                session_id,
                command,
            } => self.handle_dispatch(session_id, command),
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::NewGame => self.start_new_game(),
            RoomCommand::Shutdown => {
                self.kick_all();
                return Flow::Stop("shutdown requested");
            }
        }

        self.drop_unresponsive();

        if had_members && self.members.is_empty() {
            return Flow::Stop("room emptied");
        }
        Flow::Continue
    }

    fn handle_join(
        &mut self,
        session_id: SessionId,
        name: String,
        outbox: Outbox,
    ) -> Result<(), RoomError> {
        if self.members.iter().any(|m| m.session_id == session_id) {
            return Err(RoomError::AlreadyInRoom(session_id, self.room_id));
        }
        if self.members.iter().any(|m| m.name == name) {
            return Err(RoomError::NameCollision(name));
        }

        self.members.push(Member {
            session_id,
            name: name.clone(),
            outbox,
        });
        tracing::info!(
            room_id = %self.room_id,
            %session_id,
            %name,
            members = self.members.len(),
            "member joined"
        );

        let notices = G::on_join(&mut self.game, session_id, &name);
        self.deliver(notices);
        self.check_finished();
        Ok(())
    }

    fn handle_part(&mut self, session_id: SessionId) -> Result<(), RoomError> {
        if !self.members.iter().any(|m| m.session_id == session_id) {
            return Err(RoomError::NotInRoom(session_id, self.room_id));
        }

        // The leaver still sees its own `parts` line.
        let notices = G::on_part(&mut self.game, session_id);
        self.deliver(notices);

        if let Some(pos) =
            self.members.iter().position(|m| m.session_id == session_id)
        {
            let member = self.members.remove(pos);
            member.outbox.kick();
            tracing::info!(
                room_id = %self.room_id,
                %session_id,
                name = %member.name,
                members = self.members.len(),
                "member parted"
            );
        }

        self.check_finished();
        Ok(())
    }

    fn handle_dispatch(&mut self, session_id: SessionId, command: Command) {
        let Some(name) = self
            .members
            .iter()
            .find(|m| m.session_id == session_id)
            .map(|m| m.name.clone())
        else {
            tracing::warn!(
                room_id = %self.room_id,
                %session_id,
                "command from non-member, ignoring"
            );
            return;
        };

        match command {
            Command::Chat(text) => {
                self.deliver(vec![(
                    Recipient::All,
                    Notification::Chat { name, text },
                )]);
            }
            Command::JoinLobby { .. } => {
                tracing::debug!(
                    room_id = %self.room_id,
                    %session_id,
                    "join_lobby while attached, ignoring"
                );
            }
            command if !self.state.accepts_game_commands() => {
                tracing::debug!(
                    room_id = %self.room_id,
                    %session_id,
                    verb = command.verb(),
                    state = %self.state,
                    "game command while concluding, ignoring"
                );
            }
            command => {
                let notices =
                    G::handle_command(&mut self.game, session_id, command);
                self.deliver(notices);
                self.check_finished();
            }
        }
    }

    /// Moves to `Concluding` and arms the win timer once the game reports
    /// a winner.
    fn check_finished(&mut self) {
        if self.state != RoomState::Active || !G::is_finished(&self.game) {
            return;
        }
        self.state = RoomState::Concluding;

        let delay = self.config.win_delay();
        let weak = self.self_sender.clone();
        tracing::info!(
            room_id = %self.room_id,
            delay_ms = self.config.win_delay_ms,
            "game finished, new game scheduled"
        );
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(sender) = weak.upgrade() {
                let _ = sender.send(RoomCommand::NewGame).await;
            }
        });
    }

    /// Replaces the finished game and re-admits every member in join order.
    fn start_new_game(&mut self) {
        if self.state != RoomState::Concluding {
            return;
        }
        let notices = G::on_reset(&self.game);
        self.deliver(notices);

        self.game = G::init();
        self.state = RoomState::Active;

        let roster: Vec<(SessionId, String)> = self
            .members
            .iter()
            .map(|m| (m.session_id, m.name.clone()))
            .collect();
        for (session_id, name) in roster {
            let notices = G::on_join(&mut self.game, session_id, &name);
            self.deliver(notices);
        }
        tracing::info!(
            room_id = %self.room_id,
            members = self.members.len(),
            "new game started"
        );
    }

    /// Encodes each notification once and queues it to every addressed
    /// member. A member whose outbox refuses is marked for removal.
    fn deliver(&mut self, notices: Vec<(Recipient, Notification)>) {
        for (recipient, notification) in notices {
            let line = self.codec.encode(&notification);
            for member in &self.members {
                if !recipient.includes(member.session_id) {
                    continue;
                }
                if let Err(e) = member.outbox.deliver(line.clone()) {
                    if !self.unresponsive.contains(&member.session_id) {
                        tracing::warn!(
                            room_id = %self.room_id,
                            session_id = %member.session_id,
                            error = %e,
                            "dropping member"
                        );
                        self.unresponsive.push(member.session_id);
                    }
                }
            }
        }
    }

    /// Parts every member marked unresponsive. Parting can mark more.
    fn drop_unresponsive(&mut self) {
        while let Some(session_id) = self.unresponsive.pop() {
            // Already removed if it was marked twice.
            let _ = self.handle_part(session_id);
        }
    }

    /// Answers queued joins and parts with [`RoomError::Fault`].
    fn refuse_pending(&mut self) {
        while let Ok(cmd) = self.receiver.try_recv() {
            match cmd {
                RoomCommand::Join { reply, .. }
                | RoomCommand::Part { reply, .. } => {
                    let _ = reply.send(Err(RoomError::Fault(self.room_id)));
                }
                _ => {}
            }
        }
    }

    fn kick_all(&mut self) {
        for member in self.members.drain(..) {
            member.outbox.kick();
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id,
            name: self.name.clone(),
            state: self.state,
            members: self.members.iter().map(|m| m.name.clone()).collect(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `config.channel_size` bounds the queue; senders wait when it fills up.
pub(crate) fn spawn_room<G: GameLogic>(
    room_id: RoomId,
    name: String,
    config: RoomConfig,
    registry: Weak<RoomRegistry<G>>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let actor = RoomActor::<G> {
        room_id,
        name,
        state: RoomState::Active,
        config,
        codec: LineCodec::default(),
        members: Vec::new(),
        game: G::init(),
        unresponsive: Vec::new(),
        receiver: rx,
        self_sender: tx.downgrade(),
        registry,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
