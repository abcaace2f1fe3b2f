//! Typed Game trait for two-player, perfect-information games
//!
//! The search engine never looks inside a position. It only asks a game for
//! legal actions, the successor produced by an action, terminal status and a
//! canonical key under which statistics for the position are shared.

use std::fmt::Debug;
use std::hash::Hash;

/// One of the two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// The side that makes the opening move.
    First,
    /// The side that replies.
    Second,
}

impl Player {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    #[inline]
    pub fn is_first(self) -> bool {
        self == Player::First
    }
}

/// Main trait for game implementations
///
/// Positions are values: `apply` never mutates `self`, it returns the
/// successor. This keeps search paths free of back-references and lets the
/// caller hold on to a live position while the engine explores copies of it.
///
/// # Type Parameters
///
/// * `Key` - Fixed-width canonical encoding of a position. Two positions that
///   should share search statistics must produce equal keys.
///
/// # Example
///
/// ```rust
/// use engine_core::{Game, MoveError, Player};
///
/// /// Players alternately take one or two stones; taking the last one wins.
/// #[derive(Debug, Clone)]
/// struct Nim {
///     stones: u8,
///     to_move: Player,
///     last: Option<u8>,
/// }
///
/// impl Game for Nim {
///     type Key = (u8, bool);
///     const NUM_ACTIONS: u8 = 2;
///
///     fn is_legal(&self, action: u8) -> bool {
///         action < 2 && action < self.stones
///     }
///
///     fn apply(&self, action: u8) -> Result<Self, MoveError> {
///         if !self.is_legal(action) {
///             return Err(MoveError::IllegalMove { action });
///         }
///         Ok(Nim {
///             stones: self.stones - action - 1,
///             to_move: self.to_move.opponent(),
///             last: Some(action),
///         })
///     }
///
///     fn is_terminal(&self) -> bool {
///         self.stones == 0
///     }
///
///     fn to_move(&self) -> Player {
///         self.to_move
///     }
///
///     fn winner(&self) -> Option<Player> {
///         self.is_terminal().then(|| self.to_move.opponent())
///     }
///
///     fn last_move(&self) -> Option<u8> {
///         self.last
///     }
///
///     fn canonical_key(&self) -> Self::Key {
///         (self.stones, self.to_move.is_first())
///     }
/// }
///
/// let game = Nim { stones: 3, to_move: Player::First, last: None };
/// assert_eq!(game.legal_actions(), vec![0, 1]);
/// let next = game.apply(1).unwrap();
/// assert_eq!(next.stones, 1);
/// assert_eq!(next.to_move(), Player::Second);
/// ```
pub trait Game: Clone + Debug + Send + Sync + 'static {
    /// Canonical position key used to index search statistics.
    type Key: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Size of the action space. Actions are numbered `0..NUM_ACTIONS`.
    const NUM_ACTIONS: u8;

    /// Whether `action` can be played from this position.
    fn is_legal(&self, action: u8) -> bool;

    /// Produce the position reached by playing `action`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::IllegalMove`] if `is_legal(action)` is false. The
    /// receiver is left untouched either way.
    fn apply(&self, action: u8) -> Result<Self, MoveError>;

    /// Whether the game is over (a win or no playable action remains).
    fn is_terminal(&self) -> bool;

    /// The side whose turn it is.
    fn to_move(&self) -> Player;

    /// The winning side, if any. `None` for ongoing games and draws.
    fn winner(&self) -> Option<Player>;

    /// The action that produced this position, `None` for the initial one.
    fn last_move(&self) -> Option<u8>;

    /// Canonical key for statistics lookup.
    fn canonical_key(&self) -> Self::Key;

    /// All legal actions in increasing order.
    fn legal_actions(&self) -> Vec<u8> {
        (0..Self::NUM_ACTIONS)
            .filter(|&action| self.is_legal(action))
            .collect()
    }

    /// Whether the first player is the winner of this position.
    #[inline]
    fn first_player_won(&self) -> bool {
        self.winner() == Some(Player::First)
    }
}

/// Error type for rejected actions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Illegal move: action {action} cannot be played in this position")]
    IllegalMove { action: u8 },
}
