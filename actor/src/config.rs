//! Configuration for the Actor service
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_actor_id() -> String {
    CENTRAL_CONFIG.actor.actor_id.clone()
}

fn default_max_games() -> i64 {
    CENTRAL_CONFIG.actor.max_games
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.actor.seed
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_log_interval() -> u32 {
    CENTRAL_CONFIG.actor.log_interval
}

fn default_stats_interval() -> u32 {
    CENTRAL_CONFIG.actor.stats_interval
}

fn default_data_dir() -> String {
    CENTRAL_CONFIG.common.data_dir.clone()
}

fn default_exploration_constant() -> f64 {
    CENTRAL_CONFIG.mcts.exploration_constant
}

fn default_max_train_per_step() -> u32 {
    CENTRAL_CONFIG.training.max_train_per_step
}

fn default_train_ceiling() -> u64 {
    CENTRAL_CONFIG.training.train_ceiling
}

#[derive(Parser, Debug, Clone)]
#[command(name = "actor")]
#[command(about = "Dropfour Actor - online self-play arena")]
#[command(
    long_about = "Plays a continuously trained MCTS engine against a naive one-iteration agent.
Before every move the trained engine runs a background search whose budget tapers as
its statistics table matures.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Unique actor identifier
    #[arg(long, default_value_t = default_actor_id())]
    pub actor_id: String,

    /// Maximum games to play (-1 for unlimited)
    #[arg(long, default_value_t = default_max_games(), allow_negative_numbers = true)]
    pub max_games: i64,

    /// Seed for the arena's random number generator
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Log progress every N games (0 to disable)
    #[arg(long, default_value_t = default_log_interval())]
    pub log_interval: u32,

    /// Write the stats snapshot every N games (0 = only at shutdown)
    #[arg(long, default_value_t = default_stats_interval())]
    pub stats_interval: u32,

    /// Data directory for the stats snapshot
    #[arg(long, default_value_t = default_data_dir())]
    pub data_dir: String,

    /// UCT exploration constant for the trained engine
    #[arg(long, default_value_t = default_exploration_constant())]
    pub exploration_constant: f64,

    /// Background training iterations per move while the engine is young
    #[arg(long, default_value_t = default_max_train_per_step())]
    pub max_train_per_step: u32,

    /// Total iterations after which training drops to one per move
    #[arg(long, default_value_t = default_train_ceiling())]
    pub train_ceiling: u64,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.actor_id.is_empty() {
            return Err(anyhow!("actor_id cannot be empty"));
        }

        if self.max_train_per_step == 0 {
            return Err(anyhow!("max_train_per_step must be greater than 0"));
        }

        if self.train_ceiling == 0 {
            return Err(anyhow!("train_ceiling must be greater than 0"));
        }

        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(anyhow!(
                "exploration_constant must be a finite, non-negative number (got {})",
                self.exploration_constant
            ));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Path to the JSON stats snapshot
    pub fn stats_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("actor_stats.json")
    }

    /// Game limit, or `None` when running until interrupted
    pub fn game_limit(&self) -> Option<u64> {
        u64::try_from(self.max_games).ok().filter(|&n| n > 0)
    }
}
