//! Connect 4 position model for the dropfour engine
//!
//! Connect 4 is a two-player connection game where players drop discs into a
//! 7-column, 6-row vertically suspended grid. The first to line up four discs
//! horizontally, vertically or diagonally wins.
//!
//! # Board Layout
//!
//! Cells are stored in row-major order, with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//!
//! # Perspectives
//!
//! The grid is kept twice, once as seen by each player: a disc is
//! [`Cell::Mine`] in its owner's view and [`Cell::Theirs`] in the other.
//! The [`CanonicalKey`] of a position is the view of the player about to
//! move, so a configuration reached by either side, through any move order,
//! maps onto the same search statistics.
//!
//! # Usage
//!
//! ```rust
//! use games_connect4::State;
//!
//! let state = State::new().apply(3).unwrap().apply(3).unwrap();
//! assert!(state.turn_is_first_player());
//! assert_eq!(state.last_move(), Some(3));
//! assert!(!state.is_terminal());
//! ```

use std::fmt;

use engine_core::{Game, MoveError, Player};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Contents of one cell, relative to whoever owns the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Mine,
    Theirs,
}

impl Cell {
    /// Symbol used by the canonical key encoding.
    #[inline]
    pub const fn symbol(self) -> u8 {
        match self {
            Cell::Empty => b'0',
            Cell::Mine => b'+',
            Cell::Theirs => b'-',
        }
    }
}

/// Fixed-width, turn-relative encoding of a position.
///
/// One symbol per cell in row-major order: `0` empty, `+` a disc of the
/// player to move, `-` an opponent disc. Lookups hash 42 bytes inline and
/// never allocate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalKey([u8; BOARD_SIZE]);

impl CanonicalKey {
    fn from_view(view: &[Cell; BOARD_SIZE]) -> Self {
        let mut bytes = [0u8; BOARD_SIZE];
        for (byte, cell) in bytes.iter_mut().zip(view.iter()) {
            *byte = cell.symbol();
        }
        Self(bytes)
    }

    /// Raw key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; BOARD_SIZE] {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            write!(f, "{}", byte as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalKey({})", self)
    }
}

/// Starting cell ranges and step for one line orientation.
///
/// Every start in `rows x cols` leaves room for four cells along
/// `(row_step, col_step)`, so the scan never leaves the grid.
struct Orientation {
    rows: (usize, usize),
    cols: (usize, usize),
    row_step: isize,
    col_step: isize,
}

const ORIENTATIONS: [Orientation; 4] = [
    // Vertical
    Orientation {
        rows: (0, 3),
        cols: (0, COLS),
        row_step: 1,
        col_step: 0,
    },
    // Horizontal
    Orientation {
        rows: (0, ROWS),
        cols: (0, 4),
        row_step: 0,
        col_step: 1,
    },
    // Diagonal rising to the left (\)
    Orientation {
        rows: (0, 3),
        cols: (3, COLS),
        row_step: 1,
        col_step: -1,
    },
    // Diagonal rising to the right (/)
    Orientation {
        rows: (0, 3),
        cols: (0, 4),
        row_step: 1,
        col_step: 1,
    },
];

/// Whether the owner of `view` has four of their own discs in a line.
fn has_four_in_a_row(view: &[Cell; BOARD_SIZE]) -> bool {
    ORIENTATIONS.iter().any(|o| {
        (o.rows.0..o.rows.1).any(|row| {
            (o.cols.0..o.cols.1).any(|col| {
                (0..4isize).all(|k| {
                    let r = row as isize + k * o.row_step;
                    let c = col as isize + k * o.col_step;
                    view[State::pos(c as usize, r as usize)] == Cell::Mine
                })
            })
        })
    })
}

/// Connect4 game state
///
/// An immutable-once-created snapshot: [`State::apply`] returns a new value
/// and never touches the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Whether the first player (who opened the game) moves next
    turn_is_first_player: bool,
    /// Number of discs in each column, full at `ROWS`
    column_heights: [u8; COLS],
    /// Board as seen by the first player
    first_view: [Cell; BOARD_SIZE],
    /// Board as seen by the second player
    second_view: [Cell; BOARD_SIZE],
    first_player_has_won: bool,
    second_player_has_won: bool,
    last_move: Option<u8>,
}

impl State {
    /// Create an empty board with the first player to move
    pub fn new() -> Self {
        Self {
            turn_is_first_player: true,
            column_heights: [0; COLS],
            first_view: [Cell::Empty; BOARD_SIZE],
            second_view: [Cell::Empty; BOARD_SIZE],
            first_player_has_won: false,
            second_player_has_won: false,
            last_move: None,
        }
    }

    /// Convert column and row to board index
    #[inline]
    pub fn pos(col: usize, row: usize) -> usize {
        row * COLS + col
    }

    /// Whether a disc can be dropped in `column`.
    #[inline]
    pub fn is_legal(&self, column: u8) -> bool {
        (column as usize) < COLS && self.column_heights[column as usize] < ROWS as u8
    }

    /// Drop a disc for the player to move and return the resulting state.
    ///
    /// # Errors
    ///
    /// [`MoveError::IllegalMove`] if the column is full or out of range.
    pub fn apply(&self, column: u8) -> Result<State, MoveError> {
        if !self.is_legal(column) {
            return Err(MoveError::IllegalMove { action: column });
        }

        let col = column as usize;
        let pos = Self::pos(col, self.column_heights[col] as usize);
        let mut next = self.clone();

        let (mover, opponent) = if self.turn_is_first_player {
            (&mut next.first_view, &mut next.second_view)
        } else {
            (&mut next.second_view, &mut next.first_view)
        };
        mover[pos] = Cell::Mine;
        opponent[pos] = Cell::Theirs;

        // Flags only ever go false -> true, and only while nobody has won,
        // so at most one of them can be set.
        if !self.has_winner() {
            if self.turn_is_first_player {
                next.first_player_has_won = has_four_in_a_row(&next.first_view);
            } else {
                next.second_player_has_won = has_four_in_a_row(&next.second_view);
            }
        }

        next.turn_is_first_player = !self.turn_is_first_player;
        next.last_move = Some(column);
        next.column_heights[col] += 1;

        Ok(next)
    }

    /// True once every column is full or either player has four in a row.
    pub fn is_terminal(&self) -> bool {
        self.has_winner() || self.is_full()
    }

    /// Whether all 42 cells are occupied
    pub fn is_full(&self) -> bool {
        self.column_heights.iter().all(|&h| h >= ROWS as u8)
    }

    fn has_winner(&self) -> bool {
        self.first_player_has_won || self.second_player_has_won
    }

    /// The side with four in a row, if any.
    pub fn winner(&self) -> Option<Player> {
        if self.first_player_has_won {
            Some(Player::First)
        } else if self.second_player_has_won {
            Some(Player::Second)
        } else {
            None
        }
    }

    #[inline]
    pub fn turn_is_first_player(&self) -> bool {
        self.turn_is_first_player
    }

    #[inline]
    pub fn first_player_has_won(&self) -> bool {
        self.first_player_has_won
    }

    #[inline]
    pub fn second_player_has_won(&self) -> bool {
        self.second_player_has_won
    }

    /// Column of the disc that produced this state.
    #[inline]
    pub fn last_move(&self) -> Option<u8> {
        self.last_move
    }

    #[inline]
    pub fn column_heights(&self) -> &[u8; COLS] {
        &self.column_heights
    }

    /// The board as seen by `player`.
    pub fn perspective(&self, player: Player) -> &[Cell; BOARD_SIZE] {
        match player {
            Player::First => &self.first_view,
            Player::Second => &self.second_view,
        }
    }

    /// Number of discs on the board
    pub fn moves_played(&self) -> u32 {
        self.column_heights.iter().map(|&h| h as u32).sum()
    }

    /// Key of the view belonging to the player about to move.
    pub fn canonical_key(&self) -> CanonicalKey {
        if self.turn_is_first_player {
            CanonicalKey::from_view(&self.first_view)
        } else {
            CanonicalKey::from_view(&self.second_view)
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders rows top-down: `R` first player, `Y` second player, `0` empty.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let symbol = match self.first_view[Self::pos(col, row)] {
                    Cell::Empty => '0',
                    Cell::Mine => 'R',
                    Cell::Theirs => 'Y',
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Game for State {
    type Key = CanonicalKey;
    const NUM_ACTIONS: u8 = COLS as u8;

    fn is_legal(&self, action: u8) -> bool {
        State::is_legal(self, action)
    }

    fn apply(&self, action: u8) -> Result<Self, MoveError> {
        State::apply(self, action)
    }

    fn is_terminal(&self) -> bool {
        State::is_terminal(self)
    }

    fn to_move(&self) -> Player {
        if self.turn_is_first_player {
            Player::First
        } else {
            Player::Second
        }
    }

    fn winner(&self) -> Option<Player> {
        State::winner(self)
    }

    fn last_move(&self) -> Option<u8> {
        self.last_move
    }

    fn canonical_key(&self) -> Self::Key {
        State::canonical_key(self)
    }
}
