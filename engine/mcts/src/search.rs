//! MCTS search implementation.
//!
//! Each iteration runs the four classic phases against the shared statistics table:
//! 1. Selection: descend through fully explored positions by UCT score
//! 2. Expansion: register one untried child, chosen in random order
//! 3. Rollout: play uniformly random moves until the game ends
//! 4. Backpropagation: count the result on every position of the path
//!
//! The table outlives any single call, so repeated searches keep refining the
//! same statistics (online self-play).

use std::fmt;

use engine_core::{Game, MoveError};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::path::{PathNode, SearchPath};
use crate::stats::{StatsEntry, StatsTable};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("Iteration count must be at least 1")]
    InvalidIterationCount,

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Position {0} is missing from the statistics table")]
    UnregisteredKey(String),

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Read-only counters describing everything an engine has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Distinct positions in the statistics table
    pub expanded: usize,
    /// Iterations completed across all searches
    pub iterations: u64,
    /// Games reported through [`MctsSearch::record_game`]
    pub games_played: u64,
    /// Of those, games this engine won
    pub games_won: u64,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Expanded: {}", self.expanded)?;
        writeln!(f, "Total Iterations: {}", self.iterations)?;
        writeln!(f, "Games Played: {}", self.games_played)?;
        write!(f, "Wins: {}", self.games_won)
    }
}

/// Online MCTS engine owning a persistent statistics table.
#[derive(Debug)]
pub struct MctsSearch<G: Game> {
    table: StatsTable<G::Key>,
    config: MctsConfig,
    iterations: u64,
    games_played: u64,
    games_won: u64,
}

impl<G: Game> MctsSearch<G> {
    /// Create an engine with an empty table.
    pub fn new(config: MctsConfig) -> Self {
        Self {
            table: StatsTable::new(),
            config,
            iterations: 0,
            games_played: 0,
            games_won: 0,
        }
    }

    /// Run `iterations` playouts from `root` and return a column.
    ///
    /// The column is the depth-1 move of the last completed iteration, not an
    /// argmax over the root's children. A zero budget is rejected before the
    /// table is touched.
    pub fn search(
        &mut self,
        root: &G,
        iterations: u32,
        rng: &mut ChaCha20Rng,
    ) -> Result<u8, SearchError> {
        if iterations == 0 {
            return Err(SearchError::InvalidIterationCount);
        }

        let mut chosen = None;
        for _ in 0..iterations {
            chosen = self.iterate(root, rng)?;
            self.iterations += 1;
        }

        debug!(
            iterations,
            expanded = self.table.len(),
            action = ?chosen,
            "MCTS search complete"
        );

        chosen.ok_or(SearchError::NoLegalMoves)
    }

    /// Run one select -> expand -> rollout -> backpropagate pass.
    fn iterate(&mut self, root: &G, rng: &mut ChaCha20Rng) -> Result<Option<u8>, SearchError> {
        let mut path = SearchPath::new(root.clone());
        self.table.register(path.leaf().key);

        // Selection
        while self.fully_explored(&path.leaf().state)? {
            let child = self.best_child(path.leaf())?;
            path.push(child);
        }

        // Expansion
        if let Some(child) = self.expand(&path.leaf().state, rng)? {
            path.push(child);
        }

        let depth = path.len();
        let first_won = rollout(&path.leaf().state, rng)?;
        let action = self.backpropagate(path, first_won)?;

        trace!(depth, first_won, action = ?action, "MCTS iteration complete");

        Ok(action)
    }

    /// True when `state` is not terminal and every legal child is in the table.
    fn fully_explored(&self, state: &G) -> Result<bool, SearchError> {
        if state.is_terminal() {
            return Ok(false);
        }
        for action in state.legal_actions() {
            let child = state.apply(action)?;
            if !self.table.contains(&child.canonical_key()) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Child with the highest UCT score. Columns are scanned in ascending order and
    /// only a strictly greater score replaces the incumbent, so ties go to the
    /// lowest column.
    fn best_child(&self, parent: &PathNode<G>) -> Result<PathNode<G>, SearchError> {
        let parent_visits = self.entry(&parent.key)?.visits;
        let c = self.config.exploration_constant;

        let mut best: Option<(f64, PathNode<G>)> = None;
        for action in parent.state.legal_actions() {
            let child = PathNode::new(parent.state.apply(action)?);
            let score = self.entry(&child.key)?.uct_score(parent_visits, c);

            let better = match &best {
                Some((best_score, _)) => score > *best_score,
                None => true,
            };
            if better {
                best = Some((score, child));
            }
        }

        best.map(|(_, node)| node).ok_or(SearchError::NoLegalMoves)
    }

    /// Register the first legal child, in shuffled column order, that the table has
    /// not seen. Returns `None` for terminal states or when every child is known.
    fn expand(
        &mut self,
        state: &G,
        rng: &mut ChaCha20Rng,
    ) -> Result<Option<PathNode<G>>, SearchError> {
        if state.is_terminal() {
            return Ok(None);
        }

        for action in shuffled_actions::<G>(rng) {
            if !state.is_legal(action) {
                continue;
            }
            let child = PathNode::new(state.apply(action)?);
            if self.table.register(child.key) {
                return Ok(Some(child));
            }
        }

        Ok(None)
    }

    /// Walk the path from leaf to root, counting one visit per node and a win for
    /// every node whose mover matches the rollout winner. Returns the move of the
    /// depth-1 node, if the path reached that deep.
    fn backpropagate(
        &mut self,
        mut path: SearchPath<G>,
        first_won: bool,
    ) -> Result<Option<u8>, SearchError> {
        let mut action = None;

        while let Some((depth, node)) = path.pop() {
            let won = first_won == node.moved_by_first_player();
            if !self.table.record(&node.key, won) {
                return Err(SearchError::UnregisteredKey(format!("{:?}", node.key)));
            }
            if depth == 1 {
                action = node.state.last_move();
            }
        }

        Ok(action)
    }

    fn entry(&self, key: &G::Key) -> Result<&StatsEntry, SearchError> {
        self.table
            .get(key)
            .ok_or_else(|| SearchError::UnregisteredKey(format!("{:?}", key)))
    }

    /// Count a finished game for telemetry.
    pub fn record_game(&mut self, won: bool) {
        self.games_played += 1;
        if won {
            self.games_won += 1;
        }
    }

    /// Snapshot of the engine's counters.
    pub fn stats(&self) -> SearchStats {
        SearchStats {
            expanded: self.table.len(),
            iterations: self.iterations,
            games_played: self.games_played,
            games_won: self.games_won,
        }
    }

    /// Get the statistics table (for inspection/debugging).
    pub fn table(&self) -> &StatsTable<G::Key> {
        &self.table
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl<G: Game> Default for MctsSearch<G> {
    fn default() -> Self {
        Self::new(MctsConfig::default())
    }
}

/// Result of a uniformly random playout from `state`: true if the first player won.
///
/// A drawn playout counts as a first-player loss.
pub fn rollout<G: Game>(state: &G, rng: &mut ChaCha20Rng) -> Result<bool, SearchError> {
    let mut current = state.clone();

    while !current.is_terminal() {
        let action = shuffled_actions::<G>(rng)
            .into_iter()
            .find(|&a| current.is_legal(a))
            .ok_or(SearchError::NoLegalMoves)?;
        current = current.apply(action)?;
    }

    Ok(current.first_player_won())
}

/// Move of an agent with no prior knowledge: a fresh engine given one iteration.
pub fn naive_move<G: Game>(root: &G, rng: &mut ChaCha20Rng) -> Result<u8, SearchError> {
    MctsSearch::<G>::default().search(root, 1, rng)
}

fn shuffled_actions<G: Game>(rng: &mut ChaCha20Rng) -> Vec<u8> {
    let mut actions: Vec<u8> = (0..G::NUM_ACTIONS).collect();
    actions.shuffle(rng);
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_connect4::State;
    use rand::SeedableRng;

    fn play(columns: &[u8]) -> State {
        columns
            .iter()
            .fold(State::new(), |s, &c| s.apply(c).unwrap())
    }

    /// Give every child of `root` the stats returned by `stats_for(column)`.
    fn seed_children(
        engine: &mut MctsSearch<State>,
        root: &State,
        stats_for: impl Fn(u8) -> (u32, u32),
    ) {
        let root_key = root.canonical_key();
        engine.table.register(root_key);

        for col in root.legal_actions() {
            let key = root.apply(col).unwrap().canonical_key();
            let (wins, visits) = stats_for(col);
            engine.table.register(key);
            for i in 0..visits {
                engine.table.record(&key, i < wins);
                engine.table.record(&root_key, false);
            }
        }
    }

    fn child_entry(engine: &MctsSearch<State>, root: &State, col: u8) -> StatsEntry {
        let key = root.apply(col).unwrap().canonical_key();
        *engine.table().get(&key).unwrap()
    }

    #[test]
    fn test_single_iteration_on_fresh_engine() {
        let mut engine = MctsSearch::<State>::default();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let root = State::new();

        let col = engine.search(&root, 1, &mut rng).unwrap();
        assert!(col < 7);

        // Root plus one expanded child
        assert_eq!(engine.table().len(), 2);
        let root_entry = engine.table().get(&root.canonical_key()).unwrap();
        assert_eq!(root_entry.visits, 1);

        let child = child_entry(&engine, &root, col);
        assert_eq!(child.visits, 1);
        assert_eq!(root_entry.wins + child.wins, 1);
        assert_eq!(engine.stats().iterations, 1);
    }

    #[test]
    fn test_zero_iterations_rejected_without_mutation() {
        let mut engine = MctsSearch::<State>::default();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let root = State::new();

        engine.search(&root, 25, &mut rng).unwrap();
        let before = engine.stats();
        let root_before = *engine.table().get(&root.canonical_key()).unwrap();

        assert_eq!(
            engine.search(&root, 0, &mut rng),
            Err(SearchError::InvalidIterationCount)
        );
        assert_eq!(engine.stats(), before);
        assert_eq!(
            engine.table().get(&root.canonical_key()),
            Some(&root_before)
        );
    }

    #[test]
    fn test_zero_iterations_on_fresh_engine() {
        let mut engine = MctsSearch::<State>::default();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let result = engine.search(&State::new(), 0, &mut rng);
        assert_eq!(result, Err(SearchError::InvalidIterationCount));
        assert!(engine.table().is_empty());
    }

    #[test]
    fn test_visit_and_win_accounting() {
        let mut engine = MctsSearch::<State>::default();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let root = State::new();
        let n = 200;

        engine.search(&root, n, &mut rng).unwrap();

        let root_entry = *engine.table().get(&root.canonical_key()).unwrap();
        assert_eq!(root_entry.visits, n);

        // Every pass goes through exactly one depth-1 child, and exactly one of the
        // root and that child is credited with the win
        let children: Vec<StatsEntry> = (0..7).map(|c| child_entry(&engine, &root, c)).collect();
        let child_visits: u32 = children.iter().map(|e| e.visits).sum();
        let child_wins: u32 = children.iter().map(|e| e.wins).sum();
        assert_eq!(child_visits, n);
        assert_eq!(child_wins + root_entry.wins, n);

        for entry in &children {
            assert!(entry.wins <= entry.visits);
        }
        assert_eq!(engine.stats().iterations, u64::from(n));
    }

    #[test]
    fn test_root_children_all_tried_first() {
        let mut engine = MctsSearch::<State>::default();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let root = State::new();

        // Until the root is fully explored each pass expands a new root child
        engine.search(&root, 7, &mut rng).unwrap();
        for col in 0..7 {
            assert_eq!(child_entry(&engine, &root, col).visits, 1, "col={}", col);
        }
        assert_eq!(engine.table().len(), 8);
    }

    #[test]
    fn test_fully_explored() {
        let mut engine = MctsSearch::<State>::default();
        let root = State::new();

        assert!(!engine.fully_explored(&root).unwrap());
        seed_children(&mut engine, &root, |_| (0, 1));
        assert!(engine.fully_explored(&root).unwrap());

        // Terminal positions never count as fully explored
        let won = play(&[3, 0, 3, 0, 3, 0, 3]);
        assert!(!engine.fully_explored(&won).unwrap());
    }

    #[test]
    fn test_best_child_ties_go_to_lowest_column() {
        let mut engine = MctsSearch::<State>::default();
        let root = State::new();
        seed_children(&mut engine, &root, |_| (1, 2));

        let best = engine.best_child(&PathNode::new(root)).unwrap();
        assert_eq!(best.state.last_move(), Some(0));
    }

    #[test]
    fn test_best_child_tie_skips_full_column() {
        let mut engine = MctsSearch::<State>::default();
        let root = play(&[0, 0, 0, 0, 0, 0]);
        seed_children(&mut engine, &root, |_| (1, 2));

        let best = engine.best_child(&PathNode::new(root)).unwrap();
        assert_eq!(best.state.last_move(), Some(1));
    }

    #[test]
    fn test_best_child_uses_real_valued_win_ratio() {
        let mut engine = MctsSearch::<State>::new(MctsConfig::greedy());
        let root = State::new();
        // Column 5 won one of three; every other column won none
        seed_children(&mut engine, &root, |c| if c == 5 { (1, 3) } else { (0, 3) });

        let best = engine.best_child(&PathNode::new(root)).unwrap();
        assert_eq!(best.state.last_move(), Some(5));
    }

    #[test]
    fn test_best_child_prefers_less_visited_when_exploring() {
        let mut engine = MctsSearch::<State>::default();
        let root = State::new();
        // Same win ratio, but column 6 has far fewer visits
        seed_children(&mut engine, &root, |c| if c == 6 { (1, 2) } else { (10, 20) });

        let best = engine.best_child(&PathNode::new(root)).unwrap();
        assert_eq!(best.state.last_move(), Some(6));
    }

    #[test]
    fn test_best_child_missing_key_is_error() {
        let mut engine = MctsSearch::<State>::default();
        let root = State::new();
        engine.table.register(root.canonical_key());

        let err = engine.best_child(&PathNode::new(root)).unwrap_err();
        assert!(matches!(err, SearchError::UnregisteredKey(_)));
    }

    #[test]
    fn test_expand_registers_one_new_child() {
        let mut engine = MctsSearch::<State>::default();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let root = State::new();

        let mut seen = Vec::new();
        for _ in 0..7 {
            let child = engine.expand(&root, &mut rng).unwrap().unwrap();
            let col = child.state.last_move().unwrap();
            assert!(!seen.contains(&col));
            seen.push(col);
            assert_eq!(child_entry(&engine, &root, col), StatsEntry::default());
        }

        // Nothing left to expand
        assert!(engine.expand(&root, &mut rng).unwrap().is_none());
        assert_eq!(engine.table().len(), 7);
    }

    #[test]
    fn test_expand_terminal_returns_none() {
        let mut engine = MctsSearch::<State>::default();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let won = play(&[3, 0, 3, 0, 3, 0, 3]);

        assert!(engine.expand(&won, &mut rng).unwrap().is_none());
        assert!(engine.table().is_empty());
    }

    #[test]
    fn test_rollout_from_terminal_reports_winner() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert!(rollout(&play(&[3, 0, 3, 0, 3, 0, 3]), &mut rng).unwrap());
        assert!(!rollout(&play(&[0, 3, 1, 3, 0, 3, 1, 3]), &mut rng).unwrap());
    }

    #[test]
    fn test_rollout_reaches_terminal_from_empty_board() {
        for seed in 0..10 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            // Must terminate and not error
            rollout(&State::new(), &mut rng).unwrap();
        }
    }

    #[test]
    fn test_terminal_root_has_no_move() {
        let mut engine = MctsSearch::<State>::default();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let won = play(&[3, 0, 3, 0, 3, 0, 3]);

        let result = engine.search(&won, 3, &mut rng);
        assert_eq!(result, Err(SearchError::NoLegalMoves));

        // The passes still ran: the root was counted each time and its mover won
        let entry = engine.table().get(&won.canonical_key()).unwrap();
        assert_eq!(*entry, StatsEntry { wins: 3, visits: 3 });
        assert_eq!(engine.stats().iterations, 3);
    }

    #[test]
    fn test_finds_immediate_win() {
        let mut engine = MctsSearch::<State>::default();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        // First player to move, column 3 completes a vertical four
        let root = play(&[3, 0, 3, 0, 3, 0]);

        engine.search(&root, 1000, &mut rng).unwrap();

        let winning = child_entry(&engine, &root, 3);
        assert!(winning.visits > 0);
        assert_eq!(winning.wins, winning.visits);

        let most_visited = (0..7)
            .max_by_key(|&c| child_entry(&engine, &root, c).visits)
            .unwrap();
        assert_eq!(most_visited, 3);
    }

    #[test]
    fn test_search_is_deterministic_with_seed() {
        let root = play(&[3, 3]);
        let run = |seed| {
            let mut engine = MctsSearch::<State>::default();
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let moves: Vec<u8> = (0..5)
                .map(|_| engine.search(&root, 40, &mut rng).unwrap())
                .collect();
            (moves, engine.stats())
        };

        assert_eq!(run(9), run(9));
    }

    #[test]
    fn test_table_persists_across_searches() {
        let mut engine = MctsSearch::<State>::default();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let root = State::new();

        engine.search(&root, 10, &mut rng).unwrap();
        let expanded = engine.stats().expanded;
        engine.search(&root, 10, &mut rng).unwrap();

        assert!(engine.stats().expanded > expanded);
        assert_eq!(engine.table().get(&root.canonical_key()).unwrap().visits, 20);
    }

    #[test]
    fn test_naive_move_is_legal() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let root = play(&[0, 0, 0, 0, 0, 0]);
        for _ in 0..20 {
            let col = naive_move(&root, &mut rng).unwrap();
            assert!(root.is_legal(col));
        }
    }

    #[test]
    fn test_record_game_and_stats_display() {
        let mut engine = MctsSearch::<State>::default();
        engine.record_game(true);
        engine.record_game(false);

        let stats = engine.stats();
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.games_won, 1);

        let text = stats.to_string();
        assert!(text.contains("Total Expanded: 0"));
        assert!(text.contains("Games Played: 2"));
        assert!(text.ends_with("Wins: 1"));

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["games_won"], 1);
    }
}
