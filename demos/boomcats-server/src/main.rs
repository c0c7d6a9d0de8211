//! Runs an exploding-cats server.
//!
//! Configuration comes from a JSON file named by `BOOMCATS_CONFIG` or the
//! first argument; `BOOMCATS_BIND` overrides the listen address. Logging
//! follows `RUST_LOG` (default `info`).

use boomcats::prelude::*;
use boomcats_game::CatsGame;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn load_config() -> Result<ServerConfig, ConfigError> {
    let path = std::env::var("BOOMCATS_CONFIG")
        .ok()
        .or_else(|| std::env::args().nth(1));
    let mut config = match path {
        Some(path) => {
            tracing::info!(%path, "loading config");
            ServerConfig::from_json_file(&path)?
        }
        None => ServerConfig::default(),
    };
    if let Ok(bind) = std::env::var("BOOMCATS_BIND") {
        config.bind_addr = bind;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;
    tracing::info!(addr = %config.bind_addr, "starting boomcats server");

    let server = BoomcatsServerBuilder::new()
        .config(config)
        .build::<CatsGame>()
        .await?;
    let rooms = server.rooms();

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(rooms = rooms.room_count().await, "shutting down");
            rooms.shutdown_all().await;
        }
    }
    Ok(())
}
