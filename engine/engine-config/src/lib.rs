//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic shared by the
//! search engine and the self-play actor.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`DROPFOUR_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! DROPFOUR_<SECTION>_<KEY>=value
//!
//! Examples:
//!     DROPFOUR_COMMON_DATA_DIR=/data
//!     DROPFOUR_MCTS_EXPLORATION_CONSTANT=1.0
//!     DROPFOUR_TRAINING_MAX_TRAIN_PER_STEP=250
//!     DROPFOUR_ACTOR_MAX_GAMES=1000
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;

#[cfg(test)]
mod tests;
