//! Core traits and types for the dropfour engine
//!
//! This crate provides the abstractions the search engine is written against:
//! - `Game`: typed trait for two-player, perfect-information, zero-sum games
//! - `Player`: which side is to move or has won
//! - `MoveError`: rejection of an action that is not playable

pub mod typed;

// Re-export main types for convenience
pub use typed::{Game, MoveError, Player};
