//! Dense Q-table for tabular temporal difference learning

use serde::{Deserialize, Serialize};

/// Index of the largest value, ties broken by the lowest index.
///
/// Returns 0 for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = idx;
        }
    }
    best
}

/// Q-table mapping (state, action) pairs to Q-values
///
/// Stored row-major: the values for one state are contiguous. The shape is
/// fixed at construction and every entry starts at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    /// Q-values, `state * action_count + action`
    values: Vec<f64>,
    state_count: usize,
    action_count: usize,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a zero-initialised Q-table
    pub fn new(
        state_count: usize,
        action_count: usize,
        learning_rate: f64,
        discount_factor: f64,
    ) -> Self {
        Self {
            values: vec![0.0; state_count * action_count],
            state_count,
            action_count,
            learning_rate,
            discount_factor,
        }
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Get Q-value for a state-action pair
    ///
    /// # Panics
    ///
    /// Panics if `state` or `action` is out of range.
    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.values[self.index(state, action)]
    }

    /// Set Q-value for a state-action pair
    ///
    /// # Panics
    ///
    /// Panics if `state` or `action` is out of range.
    pub fn set(&mut self, state: usize, action: usize, value: f64) {
        let idx = self.index(state, action);
        self.values[idx] = value;
    }

    fn index(&self, state: usize, action: usize) -> usize {
        assert!(
            state < self.state_count && action < self.action_count,
            "({state}, {action}) is outside the {}x{} Q-table",
            self.state_count,
            self.action_count
        );
        state * self.action_count + action
    }

    /// All action values of a state
    ///
    /// # Panics
    ///
    /// Panics if `state` is out of range.
    pub fn row(&self, state: usize) -> &[f64] {
        let start = state * self.action_count;
        &self.values[start..start + self.action_count]
    }

    /// Get maximum Q-value in a state
    pub fn max_q(&self, state: usize) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Select greedy action (highest Q-value, lowest index on ties)
    pub fn greedy_action(&self, state: usize) -> usize {
        argmax(self.row(state))
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← (1 - α)·Q(s,a) + α·[r + γ·max_a' Q(s',a')]
    ///
    /// The bootstrap term is taken from `next_state` even when the step ended
    /// the episode. Returns the new value.
    pub fn q_learning_update(
        &mut self,
        state: usize,
        action: usize,
        reward: f64,
        next_state: usize,
    ) -> f64 {
        let current_q = self.get(state, action);
        let max_next_q = self.max_q(next_state);
        let new_q = (1.0 - self.learning_rate) * current_q
            + self.learning_rate * (reward + self.discount_factor * max_next_q);
        self.set(state, action, new_q);
        new_q
    }

    /// Greedy action for every state
    pub fn policy(&self) -> Vec<usize> {
        (0..self.state_count)
            .map(|state| self.greedy_action(state))
            .collect()
    }

    /// Number of states that have at least one non-zero Q-value
    pub fn visited_states(&self) -> usize {
        (0..self.state_count)
            .filter(|&state| self.row(state).iter().any(|&v| v != 0.0))
            .count()
    }

    /// Total number of entries
    pub fn size(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new(4, 3, 0.5, 0.99);
        assert_eq!(qtable.size(), 12);
        assert!((0..4).all(|s| qtable.row(s) == [0.0, 0.0, 0.0]));
        assert_eq!(qtable.visited_states(), 0);
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new(4, 3, 0.5, 0.99);
        qtable.set(2, 1, 1.5);
        assert_eq!(qtable.get(2, 1), 1.5);
        assert_eq!(qtable.row(2), [0.0, 1.5, 0.0]);
        assert_eq!(qtable.visited_states(), 1);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::new(2, 3, 0.5, 0.99);
        qtable.set(0, 0, -0.5);
        qtable.set(0, 1, -1.5);
        qtable.set(0, 2, -0.8);
        assert_eq!(qtable.max_q(0), -0.5);
    }

    #[test]
    fn test_greedy_action_breaks_ties_low() {
        let mut qtable = QTable::new(2, 4, 0.5, 0.99);
        assert_eq!(qtable.greedy_action(0), 0);

        qtable.set(0, 1, 2.0);
        qtable.set(0, 3, 2.0);
        assert_eq!(qtable.greedy_action(0), 1);
        assert_eq!(qtable.policy(), vec![1, 0]);
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new(2, 3, 0.5, 0.99);
        qtable.set(1, 1, 1.0);
        qtable.set(1, 2, 2.0);

        // Q(0,1) = 0.5 * 0.0 + 0.5 * (0.0 + 0.99 * 2.0) = 0.99
        let updated = qtable.q_learning_update(0, 1, 0.0, 1);
        assert!((updated - 0.99).abs() < 1e-12);
        assert_eq!(qtable.get(0, 1), updated);
    }

    #[test]
    fn test_update_keeps_bootstrap_on_self_loop() {
        let mut qtable = QTable::new(1, 1, 1.0, 0.5);
        qtable.q_learning_update(0, 0, 1.0, 0);
        qtable.q_learning_update(0, 0, 1.0, 0);
        // 1.0, then 1.0 + 0.5 * 1.0
        assert!((qtable.get(0, 0) - 1.5).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "outside the 4x3 Q-table")]
    fn test_get_rejects_action_past_row_end() {
        let qtable = QTable::new(4, 3, 0.5, 0.99);
        qtable.get(0, 3);
    }

    #[test]
    #[should_panic]
    fn test_row_rejects_unknown_state() {
        let qtable = QTable::new(4, 3, 0.5, 0.99);
        qtable.row(4);
    }
}
