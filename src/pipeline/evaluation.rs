//! Greedy rollouts of a learned Q-table

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, ports::Environment, q_learning::QTable};

/// Evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub episodes: usize,
    /// Reward value counted as a penalty
    pub penalty: f64,
    /// Rollouts stop after this many steps; greedy policies can cycle
    pub max_steps: usize,
    /// Record a rendered frame per step
    pub capture_frames: bool,
    pub seed: Option<u64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            episodes: 1,
            penalty: -30.0,
            max_steps: 200,
            capture_frames: false,
            seed: None,
        }
    }
}

/// One step of a recorded rollout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloutFrame {
    /// Rendered environment after the step, if the environment renders
    pub rendered: Option<String>,
    pub state: usize,
    pub action: usize,
    /// Reward accumulated so far in the episode
    pub total_reward: f64,
}

/// Result of one greedy episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolloutEpisode {
    pub steps: usize,
    pub penalties: usize,
    pub total_reward: f64,
    /// Stopped by `max_steps` rather than a terminal state
    pub truncated: bool,
    pub frames: Vec<RolloutFrame>,
}

/// Run greedy episodes following `q_table` without learning.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if the table and environment disagree on the
/// number of states or actions; environment errors propagate.
pub fn perform<E: Environment + ?Sized>(
    env: &mut E,
    q_table: &QTable,
    config: &EvaluationConfig,
) -> Result<Vec<RolloutEpisode>> {
    if q_table.state_count() != env.state_count() || q_table.action_count() != env.action_count()
    {
        return Err(Error::DimensionMismatch {
            q_states: q_table.state_count(),
            q_actions: q_table.action_count(),
            env_states: env.state_count(),
            env_actions: env.action_count(),
        });
    }

    if let Some(seed) = config.seed {
        env.set_rng_seed(seed)?;
    }

    let mut episodes = Vec::with_capacity(config.episodes);
    for episode in 1..=config.episodes {
        let rollout = run_greedy_episode(env, q_table, config)?;
        if rollout.truncated {
            warn!(
                "episode {episode} hit the {} step limit without finishing",
                config.max_steps
            );
        }
        info!(
            "episode {episode}: steps={} penalties={} reward={}",
            rollout.steps, rollout.penalties, rollout.total_reward
        );
        episodes.push(rollout);
    }

    Ok(episodes)
}

fn run_greedy_episode<E: Environment + ?Sized>(
    env: &mut E,
    q_table: &QTable,
    config: &EvaluationConfig,
) -> Result<RolloutEpisode> {
    let mut state = env.reset()?;
    let mut steps = 0;
    let mut penalties = 0;
    let mut total_reward = 0.0;
    let mut frames = Vec::new();
    let mut terminal = false;

    while !terminal && steps < config.max_steps {
        if state >= q_table.state_count() {
            return Err(Error::StateOutOfRange {
                state,
                state_count: q_table.state_count(),
            });
        }
        let action = q_table.greedy_action(state);
        let outcome = env.step(action)?;

        if outcome.reward == config.penalty {
            penalties += 1;
        }
        total_reward += outcome.reward;
        steps += 1;

        if config.capture_frames {
            frames.push(RolloutFrame {
                rendered: env.capture_frame()?,
                state: outcome.next_state,
                action,
                total_reward,
            });
        }

        state = outcome.next_state;
        terminal = outcome.terminal;
    }

    Ok(RolloutEpisode {
        steps,
        penalties,
        total_reward,
        truncated: !terminal,
        frames,
    })
}

/// Mean steps, penalties and reward over a set of rollouts.
pub fn rollout_means(episodes: &[RolloutEpisode]) -> (f64, f64, f64) {
    if episodes.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let n = episodes.len() as f64;
    (
        episodes.iter().map(|e| e.steps as f64).sum::<f64>() / n,
        episodes.iter().map(|e| e.penalties as f64).sum::<f64>() / n,
        episodes.iter().map(|e| e.total_reward).sum::<f64>() / n,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::StepOutcome;

    /// Line of `len` states; action 1 moves right, action 0 stays.
    /// Reaching the last state ends the episode.
    struct LineEnv {
        len: usize,
        current: usize,
    }

    impl Environment for LineEnv {
        fn state_count(&self) -> usize {
            self.len
        }

        fn action_count(&self) -> usize {
            2
        }

        fn reset(&mut self) -> Result<usize> {
            self.current = 0;
            Ok(0)
        }

        fn step(&mut self, action: usize) -> Result<StepOutcome> {
            if action == 1 {
                self.current += 1;
            }
            let terminal = self.current == self.len - 1;
            Ok(StepOutcome {
                next_state: self.current,
                reward: if terminal { 10.0 } else { -1.0 },
                terminal,
            })
        }

        fn capture_frame(&self) -> Result<Option<String>> {
            Ok(Some(format!("at {}", self.current)))
        }
    }

    fn forward_table(len: usize) -> QTable {
        let mut q = QTable::new(len, 2, 0.1, 0.9);
        for state in 0..len {
            q.set(state, 1, 1.0);
        }
        q
    }

    #[test]
    fn test_greedy_rollout_reaches_goal() {
        let mut env = LineEnv { len: 4, current: 0 };
        let config = EvaluationConfig {
            episodes: 2,
            capture_frames: true,
            ..EvaluationConfig::default()
        };
        let episodes = perform(&mut env, &forward_table(4), &config).unwrap();

        assert_eq!(episodes.len(), 2);
        let first = &episodes[0];
        assert_eq!(first.steps, 3);
        assert!(!first.truncated);
        assert!((first.total_reward - 8.0).abs() < 1e-12);
        assert_eq!(first.frames.len(), 3);
        assert_eq!(first.frames[2].rendered.as_deref(), Some("at 3"));
        assert!((first.frames[0].total_reward + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cycling_policy_is_truncated() {
        let mut env = LineEnv { len: 4, current: 0 };
        let q = QTable::new(4, 2, 0.1, 0.9);
        let config = EvaluationConfig {
            max_steps: 25,
            penalty: -1.0,
            ..EvaluationConfig::default()
        };
        let episodes = perform(&mut env, &q, &config).unwrap();

        assert!(episodes[0].truncated);
        assert_eq!(episodes[0].steps, 25);
        assert_eq!(episodes[0].penalties, 25);
        assert!(episodes[0].frames.is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut env = LineEnv { len: 4, current: 0 };
        let err = perform(&mut env, &forward_table(5), &EvaluationConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                q_states: 5,
                env_states: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_rollout_means() {
        let episode = |steps, reward| RolloutEpisode {
            steps,
            penalties: 0,
            total_reward: reward,
            truncated: false,
            frames: Vec::new(),
        };
        let (steps, penalties, reward) = rollout_means(&[episode(10, 50.0), episode(20, 40.0)]);
        assert_eq!(steps, 15.0);
        assert_eq!(penalties, 0.0);
        assert_eq!(reward, 45.0);
    }
}
