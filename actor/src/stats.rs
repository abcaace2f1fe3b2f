//! Arena statistics tracking and persistence.
//!
//! This module tracks game outcomes between the trained engine and the naive
//! agent along with the trained engine's search counters. Stats are written to a
//! JSON file so a dashboard or a shell can follow a long run.

use mcts::SearchStats;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

use crate::arena::{Agent, GameOutcome};

/// Aggregated arena statistics.
#[derive(Debug)]
pub struct ArenaStats {
    games_played: u64,
    trained_wins: u64,
    naive_wins: u64,
    draws: u64,
    /// Sum of game lengths for average calculation
    total_moves: u64,
    /// Start time for rate calculations
    start_time: Instant,
    /// Path to write stats file
    stats_path: PathBuf,
    actor_id: String,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArenaStatsSnapshot {
    pub actor_id: String,
    pub games_played: u64,
    pub trained_wins: u64,
    pub naive_wins: u64,
    pub draws: u64,
    pub trained_win_rate: f64,
    pub avg_game_length: f64,
    pub games_per_second: f64,
    pub runtime_seconds: f64,
    /// Distinct positions in the trained engine's table
    pub expanded: usize,
    /// Search iterations run by the trained engine
    pub iterations: u64,
    pub timestamp: u64,
}

impl ArenaStats {
    /// Create new stats tracker writing to `stats_path`.
    pub fn new(stats_path: impl Into<PathBuf>, actor_id: &str) -> Self {
        let stats_path = stats_path.into();

        // Ensure data directory exists
        if let Some(dir) = stats_path.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                warn!("Failed to create data directory: {}", e);
            }
        }

        Self {
            games_played: 0,
            trained_wins: 0,
            naive_wins: 0,
            draws: 0,
            total_moves: 0,
            start_time: Instant::now(),
            stats_path,
            actor_id: actor_id.to_string(),
        }
    }

    /// Record a completed game.
    pub fn record_game(&mut self, outcome: &GameOutcome) {
        self.games_played += 1;
        self.total_moves += u64::from(outcome.moves);

        match outcome.winner {
            Some(Agent::Trained) => self.trained_wins += 1,
            Some(Agent::Naive) => self.naive_wins += 1,
            None => self.draws += 1,
        }
    }

    /// Get a snapshot of current stats combined with the engine's counters.
    pub fn snapshot(&self, engine: &SearchStats) -> ArenaStatsSnapshot {
        let runtime = self.start_time.elapsed().as_secs_f64();

        let ratio = |num: f64, den: f64| if den > 0.0 { num / den } else { 0.0 };
        let games = self.games_played as f64;

        ArenaStatsSnapshot {
            actor_id: self.actor_id.clone(),
            games_played: self.games_played,
            trained_wins: self.trained_wins,
            naive_wins: self.naive_wins,
            draws: self.draws,
            trained_win_rate: ratio(self.trained_wins as f64, games),
            avg_game_length: ratio(self.total_moves as f64, games),
            games_per_second: ratio(games, runtime),
            runtime_seconds: runtime,
            expanded: engine.expanded,
            iterations: engine.iterations,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Write stats to JSON file (atomic write-then-rename).
    pub fn write_stats(&self, engine: &SearchStats) {
        let snapshot = self.snapshot(engine);

        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize arena stats: {}", e);
                return;
            }
        };

        // Write to temp file then rename (atomic on most filesystems)
        let temp_path = self.stats_path.with_extension("json.tmp");
        match fs::File::create(&temp_path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(json.as_bytes()) {
                    warn!("Failed to write arena stats: {}", e);
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to create temp stats file: {}", e);
                return;
            }
        }

        if let Err(e) = fs::rename(&temp_path, &self.stats_path) {
            warn!("Failed to rename stats file: {}", e);
            let _ = fs::remove_file(&temp_path);
            return;
        }

        debug!("Wrote arena stats to {}", self.stats_path.display());
    }

    #[cfg(test)]
    pub fn stats_path(&self) -> &std::path::Path {
        &self.stats_path
    }

    pub fn games_played(&self) -> u64 {
        self.games_played
    }
}
