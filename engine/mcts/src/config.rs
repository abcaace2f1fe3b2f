//! MCTS configuration parameters.

/// Configuration for the online tree search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Exploration constant in the UCT formula.
    /// Higher values favour less visited children; the classic value is sqrt(2).
    pub exploration_constant: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
        }
    }
}

impl MctsConfig {
    /// Config with a pure exploitation bias (no exploration term).
    pub fn greedy() -> Self {
        Self {
            exploration_constant: 0.0,
        }
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }
}
