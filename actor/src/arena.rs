//! Self-play arena: a continuously trained engine against a naive agent.
//!
//! Before every move, whoever is to play, the trained engine runs a background
//! search on the live board. Its result is thrown away; only the statistics table
//! benefits. The trained side then answers with a single-iteration search against
//! its accumulated table, while the naive side uses a fresh engine every move.

use anyhow::{Context, Result};
use engine_core::Player;
use games_connect4::State;
use indicatif::{ProgressBar, ProgressStyle};
use mcts::{naive_move, MctsConfig, MctsSearch};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fmt;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::schedule::TrainingSchedule;
use crate::stats::ArenaStats;

/// The two sides of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    Trained,
    Naive,
}

impl Agent {
    pub fn other(self) -> Self {
        match self {
            Agent::Trained => Agent::Naive,
            Agent::Naive => Agent::Trained,
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Agent::Trained => write!(f, "trained"),
            Agent::Naive => write!(f, "naive"),
        }
    }
}

/// Result of one finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    /// `None` for a draw
    pub winner: Option<Agent>,
    pub moves: u32,
}

pub struct Arena {
    config: Config,
    trained: MctsSearch<State>,
    schedule: TrainingSchedule,
    rng: ChaCha20Rng,
    stats: ArenaStats,
    /// Side that makes the first move of the next game
    opener: Agent,
    shutdown_signal: Arc<AtomicBool>,
}

impl Arena {
    pub fn new(config: Config) -> Self {
        let mcts_config =
            MctsConfig::default().with_exploration_constant(config.exploration_constant);
        let schedule = TrainingSchedule::new(config.max_train_per_step, config.train_ceiling);
        let stats = ArenaStats::new(config.stats_path(), &config.actor_id);

        info!(
            exploration_constant = config.exploration_constant,
            max_train_per_step = config.max_train_per_step,
            train_ceiling = config.train_ceiling,
            seed = config.seed,
            "Arena initialized"
        );

        Self {
            rng: ChaCha20Rng::seed_from_u64(config.seed),
            trained: MctsSearch::new(mcts_config),
            schedule,
            stats,
            opener: Agent::Trained,
            shutdown_signal: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Flag that stops [`Arena::run`] after the game in progress.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown_signal)
    }

    /// Play games until the configured limit or a shutdown request.
    pub fn run(&mut self) -> Result<()> {
        let limit = self.config.game_limit();
        info!(
            actor_id = %self.config.actor_id,
            max_games = self.config.max_games,
            "Arena starting main loop"
        );

        // Progress bar for bounded runs (only when stderr is a TTY)
        let progress = match limit {
            Some(n) if std::io::IsTerminal::is_terminal(&std::io::stderr()) => {
                let pb = ProgressBar::new(n);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")
                        .context("invalid progress bar template")?
                        .progress_chars("#>-"),
                );
                Some(pb)
            }
            _ => None,
        };

        loop {
            if self.shutdown_signal.load(Ordering::Relaxed) {
                info!("Shutdown signal received, stopping arena");
                break;
            }

            if let Some(n) = limit {
                if self.stats.games_played() >= n {
                    info!("Reached maximum games ({}), stopping", n);
                    break;
                }
            }

            let game_start = Instant::now();
            let outcome = self.play_game()?;
            let game_num = self.stats.games_played();

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            debug!(
                game = game_num,
                winner = ?outcome.winner,
                moves = outcome.moves,
                duration = game_start.elapsed().as_secs_f64(),
                "Game completed"
            );

            if self.config.log_interval > 0 && game_num % u64::from(self.config.log_interval) == 0 {
                let log = || self.log_progress(game_num);
                match progress {
                    // Suspend progress bar while logging to avoid visual glitches
                    Some(ref pb) => pb.suspend(log),
                    None => log(),
                }
            }

            if self.config.stats_interval > 0
                && game_num % u64::from(self.config.stats_interval) == 0
            {
                self.stats.write_stats(&self.trained.stats());
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        self.stats.write_stats(&self.trained.stats());
        info!("Arena stopped\n{}", self.trained.stats());
        Ok(())
    }

    fn log_progress(&self, game_num: u64) {
        let snapshot = self.stats.snapshot(&self.trained.stats());
        info!(
            games = game_num,
            trained_wins = snapshot.trained_wins,
            naive_wins = snapshot.naive_wins,
            draws = snapshot.draws,
            win_rate = format!("{:.3}", snapshot.trained_win_rate),
            expanded = snapshot.expanded,
            iterations = snapshot.iterations,
            "Arena progress"
        );
    }

    /// Play one game from the empty board and record its outcome.
    pub fn play_game(&mut self) -> Result<GameOutcome> {
        let mut board = State::new();
        let mut to_move = self.opener;
        let mut moves = 0u32;

        loop {
            self.train(&board)?;

            let column = match to_move {
                Agent::Naive => naive_move(&board, &mut self.rng)?,
                Agent::Trained => self.trained.search(&board, 1, &mut self.rng)?,
            };
            board = board
                .apply(column)
                .with_context(|| format!("{} agent chose column {}", to_move, column))?;
            moves += 1;

            if board.is_terminal() {
                break;
            }
            to_move = to_move.other();
        }

        // Only the player who just moved can have completed a line
        let winner = board.winner().map(|_| to_move);
        self.trained.record_game(winner == Some(Agent::Trained));
        self.opener = to_move.other();

        let outcome = GameOutcome { winner, moves };
        self.stats.record_game(&outcome);

        let colour = match board.winner() {
            Some(Player::First) => "R",
            Some(Player::Second) => "Y",
            None => "-",
        };
        info!(
            game = self.stats.games_played(),
            winner = %winner.map_or_else(|| "draw".to_string(), |a| a.to_string()),
            colour,
            moves,
            "Game over"
        );
        debug!("Final board:\n{}", board);

        Ok(outcome)
    }

    /// Background search whose move is discarded.
    fn train(&mut self, board: &State) -> Result<()> {
        let budget = self.schedule.budget(self.trained.stats().iterations);
        self.trained.search(board, budget, &mut self.rng)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn trained(&self) -> &MctsSearch<State> {
        &self.trained
    }

    #[cfg(test)]
    pub fn opener(&self) -> Agent {
        self.opener
    }
}
