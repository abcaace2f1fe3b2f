//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by DROPFOUR_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("DROPFOUR_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from DROPFOUR_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "DROPFOUR_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files fall back to the built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, i64, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: DROPFOUR_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.data_dir, "DROPFOUR_COMMON_DATA_DIR");
    env_override!(config, common.log_level, "DROPFOUR_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.exploration_constant,
        "DROPFOUR_MCTS_EXPLORATION_CONSTANT",
        parse
    );

    // Training
    env_override!(
        config,
        training.max_train_per_step,
        "DROPFOUR_TRAINING_MAX_TRAIN_PER_STEP",
        parse
    );
    env_override!(
        config,
        training.train_ceiling,
        "DROPFOUR_TRAINING_TRAIN_CEILING",
        parse
    );

    // Actor
    env_override!(config, actor.actor_id, "DROPFOUR_ACTOR_ACTOR_ID");
    env_override!(config, actor.max_games, "DROPFOUR_ACTOR_MAX_GAMES", parse);
    env_override!(config, actor.seed, "DROPFOUR_ACTOR_SEED", parse);
    env_override!(
        config,
        actor.log_interval,
        "DROPFOUR_ACTOR_LOG_INTERVAL",
        parse
    );
    env_override!(
        config,
        actor.stats_interval,
        "DROPFOUR_ACTOR_STATS_INTERVAL",
        parse
    );

    config
}
