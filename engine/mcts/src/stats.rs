//! Persistent win/visit statistics keyed by canonical position.
//!
//! The table is the engine's only long-lived memory. Entries are created lazily
//! with `(0, 0)` and are never removed, so knowledge gathered in one search is
//! reused by every later search that reaches the same position.

use std::collections::hash_map::{Entry, HashMap};
use std::hash::Hash;

/// Accumulated results for one canonical position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsEntry {
    /// Passes in which the player who moved into this position went on to win
    pub wins: u32,
    /// Backpropagation passes that touched this position
    pub visits: u32,
}

impl StatsEntry {
    /// Fraction of visits that were wins, as a real number.
    ///
    /// Returns 0.0 for an unvisited entry.
    #[inline]
    pub fn win_ratio(&self) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(self.visits)
    }

    /// UCT score of this entry as a child of a node with `parent_visits`.
    ///
    /// `win_ratio + c * sqrt(ln(parent_visits) / visits)`. An unvisited child
    /// scores infinity so it is always tried before any visited sibling.
    #[inline]
    pub fn uct_score(&self, parent_visits: u32, exploration_constant: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visit_ratio = f64::from(parent_visits).ln() / f64::from(self.visits);
        self.win_ratio() + exploration_constant * visit_ratio.sqrt()
    }

    #[inline]
    fn record(&mut self, won: bool) {
        self.visits += 1;
        if won {
            self.wins += 1;
        }
    }
}

/// Mapping from canonical key to [`StatsEntry`].
#[derive(Debug, Clone)]
pub struct StatsTable<K> {
    entries: HashMap<K, StatsEntry>,
}

impl<K: Copy + Eq + Hash> StatsTable<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert `(0, 0)` for `key` if absent. Returns true when a new entry was created.
    pub fn register(&mut self, key: K) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(StatsEntry::default());
                true
            }
        }
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<&StatsEntry> {
        self.entries.get(key)
    }

    /// Count one pass through `key`. Returns false if the key was never registered.
    pub fn record(&mut self, key: &K, won: bool) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.record(won);
                true
            }
            None => false,
        }
    }

    /// Number of distinct positions registered.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Copy + Eq + Hash> Default for StatsTable<K> {
    fn default() -> Self {
        Self::new()
    }
}
