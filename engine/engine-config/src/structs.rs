//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// ============================================================================

fn d_data_dir() -> String {
    defaults::data_dir().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_exploration_constant() -> f64 {
    defaults::exploration_constant()
}
fn d_max_train_per_step() -> u32 {
    defaults::max_train_per_step()
}
fn d_train_ceiling() -> u64 {
    defaults::train_ceiling()
}
fn d_actor_id() -> String {
    defaults::actor_id().into()
}
fn d_max_games() -> i64 {
    defaults::max_games()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_log_interval() -> u32 {
    defaults::log_interval()
}
fn d_stats_interval() -> u32 {
    defaults::stats_interval()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub actor: ActorConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_data_dir")]
    pub data_dir: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// Tree search configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    /// Weight of the exploration term in the UCT score
    #[serde(default = "d_exploration_constant")]
    pub exploration_constant: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: defaults::exploration_constant(),
        }
    }
}

/// Background training schedule for the learning engine
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrainingConfig {
    /// Training iterations per step while the engine is young
    #[serde(default = "d_max_train_per_step")]
    pub max_train_per_step: u32,
    /// Total iterations after which training drops to one per step
    #[serde(default = "d_train_ceiling")]
    pub train_ceiling: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_train_per_step: defaults::max_train_per_step(),
            train_ceiling: defaults::train_ceiling(),
        }
    }
}

/// Actor (self-play arena) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ActorConfig {
    #[serde(default = "d_actor_id")]
    pub actor_id: String,
    /// Games to play before exiting (-1 = unlimited)
    #[serde(default = "d_max_games")]
    pub max_games: i64,
    #[serde(default = "d_seed")]
    pub seed: u64,
    #[serde(default = "d_log_interval")]
    pub log_interval: u32,
    /// Games between stats snapshots (0 = only at shutdown)
    #[serde(default = "d_stats_interval")]
    pub stats_interval: u32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            actor_id: defaults::actor_id().into(),
            max_games: defaults::max_games(),
            seed: defaults::seed(),
            log_interval: defaults::log_interval(),
            stats_interval: defaults::stats_interval(),
        }
    }
}
