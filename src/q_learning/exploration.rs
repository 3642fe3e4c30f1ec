//! ε-greedy action selection

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::q_table::argmax;

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// An action pick and whether it came from the exploration branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionChoice {
    pub action: usize,
    pub explored: bool,
}

/// ε-greedy selector over a row of Q-values.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new() -> Self {
        Self {
            rng: build_rng(None),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: build_rng(Some(seed)),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
    }

    /// Draw u ~ U[0, 1); explore uniformly when u < ε, otherwise take the
    /// greedy action (lowest index among ties).
    pub fn select(&mut self, q_values: &[f64], epsilon: f64) -> ActionChoice {
        if !q_values.is_empty() && self.rng.random::<f64>() < epsilon {
            // Explore: random action
            ActionChoice {
                action: self.rng.random_range(0..q_values.len()),
                explored: true,
            }
        } else {
            // Exploit: greedy action based on Q-values
            ActionChoice {
                action: argmax(q_values),
                explored: false,
            }
        }
    }
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_epsilon_is_greedy() {
        let mut selector = EpsilonGreedy::with_seed(1);
        let q = [0.0, 3.0, -1.0, 3.0];
        for _ in 0..100 {
            let choice = selector.select(&q, 0.0);
            assert_eq!(choice, ActionChoice { action: 1, explored: false });
        }
    }

    #[test]
    fn test_full_epsilon_always_explores() {
        let mut selector = EpsilonGreedy::with_seed(2);
        let q = [0.0; 6];
        let mut seen = [false; 6];
        for _ in 0..600 {
            let choice = selector.select(&q, 1.0);
            assert!(choice.explored);
            seen[choice.action] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_explore_fraction_tracks_epsilon() {
        let mut selector = EpsilonGreedy::with_seed(42);
        let q = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let trials = 20_000;
        for epsilon in [0.1, 0.35, 0.8] {
            let explored = (0..trials)
                .filter(|_| selector.select(&q, epsilon).explored)
                .count();
            let fraction = explored as f64 / trials as f64;
            assert!(
                (fraction - epsilon).abs() < 0.02,
                "epsilon {epsilon}: observed {fraction}"
            );
        }
    }

    #[test]
    fn test_seeded_selectors_agree() {
        let q = [0.5, 0.1, 0.2];
        let mut a = EpsilonGreedy::with_seed(9);
        let mut b = EpsilonGreedy::with_seed(9);
        for _ in 0..50 {
            assert_eq!(a.select(&q, 0.5), b.select(&q, 0.5));
        }
    }
}
