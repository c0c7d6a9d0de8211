//! # boomcats
//!
//! A WebSocket server hosting rooms of exploding cats.
//!
//! Every room is an actor owning one game; connections speak a
//! line-oriented text protocol, join a room with
//! `join_lobby <room> <name>`, and from then on every line they send is a
//! command for that room. The game itself plugs in through the
//! [`GameLogic`] trait.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use boomcats::prelude::*;
//! use boomcats_game::CatsGame;
//!
//! let config = ServerConfig::from_json_file("boomcats.json")?;
//! let server = BoomcatsServerBuilder::new()
//!     .config(config)
//!     .build::<CatsGame>()
//!     .await?;
//! server.run().await
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::BoomcatsError;
pub use server::{BoomcatsServer, BoomcatsServerBuilder};

pub use boomcats_room::GameLogic;

pub mod prelude {
    //! Everything needed to configure and run a server.

    pub use crate::{
        BoomcatsError, BoomcatsServer, BoomcatsServerBuilder, ConfigError,
        GameLogic, ServerConfig,
    };
    pub use boomcats_protocol::{Command, Notification, Recipient, SessionId};
    pub use boomcats_room::{RoomConfig, RoomRegistry};
    pub use boomcats_session::SessionConfig;
}
