//! Room registry: creates, tracks, and routes sessions to rooms by name.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use boomcats_protocol::{RoomId, SessionId};
use boomcats_session::Outbox;
use tokio::sync::Mutex;

use crate::room::spawn_room;
use crate::{GameLogic, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// How often `join` retries after racing with a room that is stopping.
const JOIN_ATTEMPTS: usize = 3;

/// All live rooms, keyed by name.
///
/// Shared as `Arc<RoomRegistry<G>>` between connection handlers; each room
/// actor holds a weak reference so it can remove itself when it stops.
/// The map lock is only held for lookups and inserts, never across a call
/// into a room.
pub struct RoomRegistry<G: GameLogic> {
    config: RoomConfig,
    rooms: Mutex<HashMap<String, RoomHandle>>,
    _game: PhantomData<fn() -> G>,
}

impl<G: GameLogic> RoomRegistry<G> {
    /// Creates an empty registry whose rooms use `config`.
    pub fn new(config: RoomConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            rooms: Mutex::new(HashMap::new()),
            _game: PhantomData,
        })
    }

    /// Creates a room named `name`.
    ///
    /// # Errors
    /// [`RoomError::AlreadyExists`] if a live room already has that name.
    pub async fn create(
        self: &Arc<Self>,
        name: &str,
    ) -> Result<RoomHandle, RoomError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.get(name).is_some_and(|h| !h.is_closed()) {
            return Err(RoomError::AlreadyExists(name.to_owned()));
        }
        let handle = self.spawn(name);
        rooms.insert(name.to_owned(), handle.clone());
        Ok(handle)
    }

    /// Returns the room named `name`, if it is live.
    pub async fn lookup(&self, name: &str) -> Option<RoomHandle> {
        let rooms = self.rooms.lock().await;
        rooms.get(name).filter(|h| !h.is_closed()).cloned()
    }

    /// Returns the room named `name`, creating it if needed.
    pub async fn get_or_create(self: &Arc<Self>, name: &str) -> RoomHandle {
        let mut rooms = self.rooms.lock().await;
        match rooms.get(name) {
            Some(handle) if !handle.is_closed() => handle.clone(),
            _ => {
                let handle = self.spawn(name);
                rooms.insert(name.to_owned(), handle.clone());
                handle
            }
        }
    }

    /// Joins `session_id` to the room `room` as `name`, creating the room
    /// on first use.
    ///
    /// A room can stop between lookup and join (its last member left). The
    /// stale entry is then dropped and a fresh room is created.
    ///
    /// # Errors
    /// - [`RoomError::NameCollision`] — `name` is taken in that room
    /// - [`RoomError::AlreadyInRoom`] — the session is already a member
    /// - [`RoomError::Unavailable`] / [`RoomError::Fault`] — the room kept
    ///   stopping under us
    pub async fn join(
        self: &Arc<Self>,
        room: &str,
        session_id: SessionId,
        name: &str,
        outbox: &Outbox,
    ) -> Result<RoomHandle, RoomError> {
        let mut last_err = None;
        for _ in 0..JOIN_ATTEMPTS {
            let handle = self.get_or_create(room).await;
            match handle.join(session_id, name.to_owned(), outbox.clone()).await {
                Ok(()) => return Ok(handle),
                Err(e @ (RoomError::Unavailable(_) | RoomError::Fault(_))) => {
                    let room_id = handle.room_id();
                    tracing::debug!(%room_id, room, error = %e, "room stopped during join, retrying");
                    self.deregister(room, room_id).await;
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or(RoomError::NotFound(room.to_owned())))
    }

    /// Shuts down the room named `name` and removes it.
    pub async fn delete(&self, name: &str) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .lock()
            .await
            .remove(name)
            .ok_or_else(|| RoomError::NotFound(name.to_owned()))?;
        let _ = handle.shutdown().await;
        tracing::info!(room_id = %handle.room_id(), room = name, "room deleted");
        Ok(())
    }

    /// Removes `name` only if it still maps to the instance `room_id`.
    ///
    /// Called by a stopping actor; a newer room that reused the name is
    /// left alone.
    pub(crate) async fn deregister(&self, name: &str, room_id: RoomId) {
        let mut rooms = self.rooms.lock().await;
        if rooms.get(name).is_some_and(|h| h.room_id() == room_id) {
            rooms.remove(name);
            tracing::debug!(%room_id, room = name, "room deregistered");
        }
    }

    /// Returns the number of registered rooms.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Returns metadata for every live room, sorted by name.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        let handles: Vec<RoomHandle> =
            self.rooms.lock().await.values().cloned().collect();
        let mut infos = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(info) = handle.info().await {
                infos.push(info);
            }
        }
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Shuts down every room.
    pub async fn shutdown_all(&self) {
        let handles: Vec<RoomHandle> =
            self.rooms.lock().await.drain().map(|(_, h)| h).collect();
        for handle in handles {
            let _ = handle.shutdown().await;
        }
    }

    fn spawn(self: &Arc<Self>, name: &str) -> RoomHandle {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        tracing::info!(%room_id, room = name, "room created");
        spawn_room::<G>(
            room_id,
            name.to_owned(),
            self.config.clone(),
            Arc::downgrade(self),
        )
    }
}
