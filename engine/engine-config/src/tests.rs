//! Tests for the configuration module.

use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.data_dir, "./data");
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.actor.actor_id, "actor-1");
    assert_eq!(config.actor.max_games, -1);
    assert_eq!(config.actor.seed, 42);
    assert_eq!(config.training.max_train_per_step, 100);
    assert_eq!(config.training.train_ceiling, 3_000_000);
}

#[test]
fn test_dropfour_env_overrides() {
    std::env::set_var("DROPFOUR_ACTOR_ACTOR_ID", "env-actor");
    std::env::set_var("DROPFOUR_TRAINING_MAX_TRAIN_PER_STEP", "7");
    std::env::set_var("DROPFOUR_MCTS_EXPLORATION_CONSTANT", "0.5");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.actor.actor_id, "env-actor");
    assert_eq!(config.training.max_train_per_step, 7);
    assert!((config.mcts.exploration_constant - 0.5).abs() < f64::EPSILON);

    std::env::remove_var("DROPFOUR_ACTOR_ACTOR_ID");
    std::env::remove_var("DROPFOUR_TRAINING_MAX_TRAIN_PER_STEP");
    std::env::remove_var("DROPFOUR_MCTS_EXPLORATION_CONSTANT");
}

#[test]
fn test_unparseable_env_override_is_ignored() {
    std::env::set_var("DROPFOUR_ACTOR_STATS_INTERVAL", "often");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.actor.stats_interval, 10);

    std::env::remove_var("DROPFOUR_ACTOR_STATS_INTERVAL");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
data_dir = "/custom/data"

[actor]
actor_id = "my-actor"
max_games = 100

[training]
max_train_per_step = 250
train_ceiling = 10000
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.data_dir, "/custom/data");
    assert_eq!(config.actor.actor_id, "my-actor");
    assert_eq!(config.actor.max_games, 100);
    assert_eq!(config.training.max_train_per_step, 250);
    assert_eq!(config.training.train_ceiling, 10_000);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[mcts]
exploration_constant = 2.0
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert!((config.mcts.exploration_constant - 2.0).abs() < f64::EPSILON);
    assert_eq!(config.common.data_dir, "./data"); // Default
    assert_eq!(config.actor.actor_id, "actor-1"); // Default
    assert_eq!(config.training.max_train_per_step, 100); // Default
}

#[test]
fn test_load_from_path() {
    let path = std::env::temp_dir().join(format!("dropfour-config-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[actor]\nlog_interval = 3").unwrap();
    drop(file);

    let config = load_from_path(&path);
    assert_eq!(config.actor.log_interval, 3);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_load_from_malformed_path_uses_defaults() {
    let path = std::env::temp_dir().join(format!("dropfour-bad-{}.toml", std::process::id()));
    std::fs::write(&path, "[actor\nlog_interval = ").unwrap();

    let config = load_from_path(&path);
    assert_eq!(config.actor.log_interval, 10);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_load_from_missing_path_uses_defaults() {
    let config = load_from_path(std::path::Path::new("/nonexistent/dropfour.toml"));
    assert_eq!(config.common.log_level, "info");
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.common.data_dir, cloned.common.data_dir);
    assert_eq!(config.actor.actor_id, cloned.actor.actor_id);
}
