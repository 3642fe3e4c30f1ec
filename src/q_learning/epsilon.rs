//! Exploration-rate schedules
//!
//! Epsilon is computed once per episode from the 1-indexed episode number.
//! Both schedules are clamped below by [`EPSILON_FLOOR`] so exploration never
//! switches off entirely.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest exploration rate any schedule returns.
pub const EPSILON_FLOOR: f64 = 0.001;

/// Named decay strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpsilonStrategy {
    Linear,
    Exponential,
}

impl EpsilonStrategy {
    pub const EXPECTED: &'static str = "linear, exponential";

    pub fn label(&self) -> &'static str {
        match self {
            EpsilonStrategy::Linear => "linear",
            EpsilonStrategy::Exponential => "exponential",
        }
    }
}

impl FromStr for EpsilonStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(EpsilonStrategy::Linear),
            "exponential" => Ok(EpsilonStrategy::Exponential),
            other => Err(Error::UnknownStrategy {
                input: other.to_string(),
                expected: Self::EXPECTED.to_string(),
            }),
        }
    }
}

impl fmt::Display for EpsilonStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved schedule, with everything it needs to produce epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EpsilonSchedule {
    /// `epsilon_start - (epsilon_start / total) * (episode - 1)`
    Linear,
    /// `epsilon_start * decay_rate^episode`
    Exponential { decay_rate: f64 },
}

impl EpsilonSchedule {
    /// Resolve a strategy name and optional decay rate.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownStrategy`] for names other than `linear` and
    ///   `exponential`
    /// * [`Error::MissingDecayRate`] for `exponential` without a decay rate
    /// * [`Error::InvalidConfiguration`] for a non-positive or non-finite
    ///   decay rate
    pub fn resolve(strategy: &str, decay_rate: Option<f64>) -> Result<Self> {
        match strategy.parse::<EpsilonStrategy>()? {
            EpsilonStrategy::Linear => Ok(EpsilonSchedule::Linear),
            EpsilonStrategy::Exponential => {
                let decay_rate = decay_rate.ok_or(Error::MissingDecayRate)?;
                if !decay_rate.is_finite() || decay_rate <= 0.0 {
                    return Err(Error::config(format!(
                        "decay rate must be positive and finite, got {decay_rate}"
                    )));
                }
                Ok(EpsilonSchedule::Exponential { decay_rate })
            }
        }
    }

    pub fn strategy(&self) -> EpsilonStrategy {
        match self {
            EpsilonSchedule::Linear => EpsilonStrategy::Linear,
            EpsilonSchedule::Exponential { .. } => EpsilonStrategy::Exponential,
        }
    }

    /// Exploration rate for `current_episode` (1-indexed) of `total_episodes`.
    pub fn epsilon(
        &self,
        epsilon_start: f64,
        total_episodes: usize,
        current_episode: usize,
    ) -> f64 {
        let raw = match *self {
            EpsilonSchedule::Linear => {
                let step = if total_episodes == 0 {
                    0.0
                } else {
                    epsilon_start / total_episodes as f64
                };
                epsilon_start - step * current_episode.saturating_sub(1) as f64
            }
            EpsilonSchedule::Exponential { decay_rate } => {
                epsilon_start * decay_rate.powf(current_episode as f64)
            }
        };
        raw.max(EPSILON_FLOOR)
    }
}

/// Exploration rate for one episode, resolving the strategy by name.
///
/// # Examples
///
/// ```
/// use cab_rl::q_learning::get_epsilon;
///
/// let first = get_epsilon(1.0, 100, 1, "linear", None)?;
/// assert!((first - 1.0).abs() < 1e-12);
///
/// let decayed = get_epsilon(1.0, 100, 10, "exponential", Some(0.9))?;
/// assert!((decayed - 0.9_f64.powi(10)).abs() < 1e-12);
///
/// assert!(get_epsilon(1.0, 100, 1, "exponential", None).is_err());
/// # Ok::<(), cab_rl::Error>(())
/// ```
pub fn get_epsilon(
    epsilon_start: f64,
    total_episodes: usize,
    current_episode: usize,
    strategy: &str,
    decay_rate: Option<f64>,
) -> Result<f64> {
    let schedule = EpsilonSchedule::resolve(strategy, decay_rate)?;
    Ok(schedule.epsilon(epsilon_start, total_episodes, current_episode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_boundaries() {
        let first = get_epsilon(1.0, 100, 1, "linear", None).unwrap();
        assert!((first - 1.0).abs() < 1e-12);

        let last = get_epsilon(1.0, 100, 100, "linear", None).unwrap();
        assert!((last - (1.0_f64 / 100.0).max(EPSILON_FLOOR)).abs() < 1e-12);
    }

    #[test]
    fn test_linear_is_monotone_and_floored() {
        let schedule = EpsilonSchedule::Linear;
        let mut previous = f64::INFINITY;
        for episode in 1..=300 {
            let eps = schedule.epsilon(0.5, 200, episode);
            assert!(eps <= previous);
            assert!(eps >= EPSILON_FLOOR);
            previous = eps;
        }
        assert_eq!(schedule.epsilon(0.5, 200, 250), EPSILON_FLOOR);
    }

    #[test]
    fn test_linear_ignores_decay_rate() {
        let with = get_epsilon(1.0, 10, 5, "linear", Some(0.5)).unwrap();
        let without = get_epsilon(1.0, 10, 5, "linear", None).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_exponential_decreases_to_floor() {
        let schedule = EpsilonSchedule::resolve("exponential", Some(0.99)).unwrap();
        let mut previous = 1.0;
        for episode in 1..=2000 {
            let eps = schedule.epsilon(1.0, 2000, episode);
            assert!(eps >= EPSILON_FLOOR);
            if previous > EPSILON_FLOOR {
                assert!(eps < previous, "episode {episode}: {eps} !< {previous}");
            }
            previous = eps;
        }
        assert_eq!(previous, EPSILON_FLOOR);
    }

    #[test]
    fn test_exponential_first_episode_already_decayed() {
        let eps = get_epsilon(1.0, 10, 1, "exponential", Some(0.5)).unwrap();
        assert!((eps - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_decay_rate() {
        let err = get_epsilon(1.0, 10, 1, "exponential", None).unwrap_err();
        assert!(matches!(err, Error::MissingDecayRate));
    }

    #[test]
    fn test_unknown_strategy() {
        let err = get_epsilon(1.0, 10, 1, "cosine", None).unwrap_err();
        assert!(matches!(err, Error::UnknownStrategy { ref input, .. } if input == "cosine"));
    }

    #[test]
    fn test_invalid_decay_rate() {
        let err = EpsilonSchedule::resolve("exponential", Some(0.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }
}
