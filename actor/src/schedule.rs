//! Background training budget for the learning engine.
//!
//! Early on the engine gets a large search budget before every move so its table
//! fills quickly. The budget shrinks linearly with the total number of iterations
//! already run and bottoms out at a single iteration once the ceiling is reached.

/// Linear taper from `max_per_step` down to 1 over `ceiling` total iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingSchedule {
    max_per_step: u32,
    ceiling: u64,
}

impl TrainingSchedule {
    pub fn new(max_per_step: u32, ceiling: u64) -> Self {
        Self {
            max_per_step: max_per_step.max(1),
            ceiling: ceiling.max(1),
        }
    }

    /// Iterations to run this step given the engine's lifetime iteration count.
    pub fn budget(&self, total_iterations: u64) -> u32 {
        if total_iterations >= self.ceiling {
            return 1;
        }
        let remaining = 1.0 - total_iterations as f64 / self.ceiling as f64;
        let budget = (f64::from(self.max_per_step) * remaining).round() as u32;
        budget.max(1)
    }
}
