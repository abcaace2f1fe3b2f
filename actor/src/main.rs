//! Actor - online self-play arena for Dropfour
//!
//! A long-running process that:
//! 1. Trains an MCTS engine in the background before every move of a live game
//! 2. Pits it against a naive agent that searches with one iteration and no memory
//! 3. Logs results and periodically writes `<data_dir>/actor_stats.json`

use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::atomic::Ordering;
use tokio::signal;
use tracing::{error, info, warn};

mod arena;
mod config;
mod schedule;
mod stats;

use crate::arena::Arena;
use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let max_games_description = match config.game_limit() {
        Some(n) => n.to_string(),
        None => "unlimited".to_string(),
    };
    info!(
        max_games = config.max_games,
        "Actor {} will play {} games", config.actor_id, max_games_description
    );

    let mut arena = Arena::new(config);

    // Setup graceful shutdown
    let shutdown = arena.shutdown_handle();
    let shutdown_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, finishing current game...");
                shutdown.store(true, Ordering::Relaxed);
            }
            Err(e) => warn!("Failed to listen for ctrl+c: {}", e),
        }
    });

    // Search is CPU-bound; keep it off the async workers
    let run_result = tokio::task::spawn_blocking(move || arena.run())
        .await
        .map_err(|e| anyhow!("Arena task panicked: {}", e))?;

    shutdown_handle.abort();

    match run_result {
        Ok(()) => {
            info!("Actor completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Actor failed: {}", e);
            Err(e)
        }
    }
}
