//! Default configuration values loaded from config.defaults.toml.
//!
//! The TOML file is embedded at compile time so the binary and any tooling
//! reading the same file agree on defaults.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    training: TrainingDefaults,
    actor: ActorDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    data_dir: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    exploration_constant: f64,
}

#[derive(Debug, Deserialize)]
struct TrainingDefaults {
    max_train_per_step: u32,
    train_ceiling: u64,
}

#[derive(Debug, Deserialize)]
struct ActorDefaults {
    actor_id: String,
    max_games: i64,
    seed: u64,
    log_interval: u32,
    stats_interval: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn data_dir() -> &'static str {
    &DEFAULTS.common.data_dir
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn exploration_constant() -> f64 {
    DEFAULTS.mcts.exploration_constant
}

// Training
pub fn max_train_per_step() -> u32 {
    DEFAULTS.training.max_train_per_step
}
pub fn train_ceiling() -> u64 {
    DEFAULTS.training.train_ceiling
}

// Actor
pub fn actor_id() -> &'static str {
    &DEFAULTS.actor.actor_id
}
pub fn max_games() -> i64 {
    DEFAULTS.actor.max_games
}
pub fn seed() -> u64 {
    DEFAULTS.actor.seed
}
pub fn log_interval() -> u32 {
    DEFAULTS.actor.log_interval
}
pub fn stats_interval() -> u32 {
    DEFAULTS.actor.stats_interval
}
