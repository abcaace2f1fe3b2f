//! Online Monte Carlo Tree Search (MCTS) over a persistent statistics table.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the `engine-core` Game trait.
//!
//! # Overview
//!
//! Unlike a per-move search tree, the engine keeps one table of `(wins, visits)`
//! keyed by canonical position and keeps growing it across calls. Transposed
//! positions share an entry. Each iteration consists of four phases:
//!
//! 1. **Selection**: descend through fully explored positions using UCT
//! 2. **Expansion**: register a single untried child, picked in random order
//! 3. **Rollout**: play random legal moves until the game ends
//! 4. **Backpropagation**: count a visit on every position of the path and a win
//!    where the player who moved into it won the rollout
//!
//! # Usage
//!
//! ```rust
//! use games_connect4::State;
//! use mcts::{naive_move, MctsConfig, MctsSearch};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let mut engine = MctsSearch::<State>::new(MctsConfig::default());
//!
//! let board = State::new();
//! let column = engine.search(&board, 100, &mut rng).unwrap();
//! assert!(board.is_legal(column));
//!
//! // An engine with no history plays a random legal move
//! let reply = naive_move(&board.apply(column).unwrap(), &mut rng).unwrap();
//! assert!(reply < 7);
//!
//! println!("{}", engine.stats());
//! ```

pub mod config;
pub mod path;
pub mod search;
pub mod stats;

// Re-export main types
pub use config::MctsConfig;
pub use path::{NodeId, PathNode, SearchPath};
pub use search::{naive_move, rollout, MctsSearch, SearchError, SearchStats};
pub use stats::{StatsEntry, StatsTable};
