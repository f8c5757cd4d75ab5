//! Live chess match server.
//!
//! Clients connect over TCP and exchange newline-delimited JSON frames.
//!
//! ```bash
//! PLUM_BIND_ADDRESS=0.0.0.0:7878 cargo run -- --demo
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use plum_chess_server::game_state::chess_types::Color;
use plum_chess_server::server::config::ServerConfig;
use plum_chess_server::server::transport::serve;
use plum_chess_server::session::connection_registry::ConnectionRegistry;
use plum_chess_server::session::handler::SessionHandler;
use plum_chess_server::session::memory_store::MemoryStore;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "plum_chess_server")]
#[command(about = "Serves live chess matches to connected clients")]
struct Args {
    /// TCP listen address.
    #[arg(long, env = "PLUM_BIND_ADDRESS", default_value = "127.0.0.1:7878")]
    bind_address: String,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "PLUM_LOG", default_value = "plum_chess_server=info")]
    log_filter: String,

    /// Create a demo match with two seated players and print their tokens.
    #[arg(long, env = "PLUM_DEMO")]
    demo: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            bind_address: args.bind_address,
            log_filter: args.log_filter,
            demo: args.demo,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from(Args::parse());
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let store = Arc::new(MemoryStore::new());
    if config.demo {
        seed_demo(&store)?;
    }

    let registry = Arc::new(ConnectionRegistry::new());
    let handler = Arc::new(SessionHandler::new(registry, store.clone(), store));

    let listener = TcpListener::bind(config.socket_addr()?)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    tracing::info!(address = %config.bind_address, "plum chess server listening");

    tokio::select! {
        _ = serve(listener, handler) => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
        }
    }

    tracing::info!("plum chess server shutdown");
    Ok(())
}

fn seed_demo(store: &MemoryStore) -> Result<()> {
    let match_id = store.create_match("demo");
    store.claim_seat(match_id, Color::Light, "white")?;
    store.claim_seat(match_id, Color::Dark, "black")?;
    for username in ["white", "black", "observer"] {
        let token = store.issue_token(username);
        tracing::info!(%match_id, username, token, "demo token");
    }
    Ok(())
}
