//! Tabular Q-learning training loop

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Environment, Observer},
    q_learning::{EpisodeStats, EpsilonGreedy, EpsilonSchedule, QTable},
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Learning rate α, in (0, 1]
    pub learning_rate: f64,

    /// Discount factor γ, in [0, 1]
    pub discount_factor: f64,

    /// Exploration rate of the first episode
    pub epsilon_start: f64,

    /// Epsilon schedule name (`linear` or `exponential`)
    pub strategy: String,

    /// Per-episode decay factor for the exponential schedule
    #[serde(default)]
    pub decay_rate: Option<f64>,

    /// Reward value counted as a penalty in the trace
    pub penalty: f64,

    /// Random seed
    #[serde(default)]
    pub seed: Option<u64>,

    /// Log progress every N episodes (0 disables)
    #[serde(default = "default_log_interval")]
    pub log_interval: usize,
}

fn default_log_interval() -> usize {
    100
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon_start: 1.0,
            strategy: "linear".to_string(),
            decay_rate: None,
            penalty: -30.0,
            seed: None,
            log_interval: default_log_interval(),
        }
    }
}

impl TrainingConfig {
    /// Check hyperparameters and resolve the epsilon schedule.
    ///
    /// # Errors
    ///
    /// Returns the schedule errors of [`EpsilonSchedule::resolve`], or
    /// [`Error::InvalidConfiguration`] for rates outside their ranges.
    pub fn validate(&self) -> Result<EpsilonSchedule> {
        let schedule = EpsilonSchedule::resolve(&self.strategy, self.decay_rate)?;

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::config(format!(
                "learning rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::config(format!(
                "discount factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if !self.epsilon_start.is_finite() || self.epsilon_start < 0.0 {
            return Err(Error::config(format!(
                "initial epsilon must be a non-negative number, got {}",
                self.epsilon_start
            )));
        }
        if !self.penalty.is_finite() {
            return Err(Error::config("penalty must be finite"));
        }

        Ok(schedule)
    }
}

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub q_table: QTable,
    /// One entry per episode, in order
    pub trace: Vec<EpisodeStats>,
}

/// Q-learning trainer for any [`Environment`]
pub struct QLearningTrainer {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
    selector: EpsilonGreedy,
}

impl QLearningTrainer {
    /// Create a new trainer
    pub fn new(config: TrainingConfig) -> Self {
        let selector = match config.seed {
            Some(seed) => EpsilonGreedy::with_seed(seed.wrapping_add(1)),
            None => EpsilonGreedy::new(),
        };
        Self {
            config,
            observers: Vec::new(),
            selector,
        }
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train a fresh Q-table on `env`.
    ///
    /// The configuration is validated before the environment is touched, so
    /// a bad strategy name fails without a single reset.
    pub fn run<E: Environment + ?Sized>(&mut self, env: &mut E) -> Result<TrainingOutcome> {
        let schedule = self.config.validate()?;

        // Both streams restart on every run.
        if let Some(seed) = self.config.seed {
            env.set_rng_seed(seed)?;
            self.selector.reseed(seed.wrapping_add(1));
        }

        let state_count = env.state_count();
        let mut q_table = QTable::new(
            state_count,
            env.action_count(),
            self.config.learning_rate,
            self.config.discount_factor,
        );
        let total = self.config.episodes;
        let mut trace = Vec::with_capacity(total);

        info!(
            "training for {total} episodes ({state_count} states, {} actions, {} epsilon from {})",
            env.action_count(),
            schedule.strategy(),
            self.config.epsilon_start
        );

        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        for episode in 1..=total {
            let epsilon = schedule.epsilon(self.config.epsilon_start, total, episode);
            let stats = self.run_episode(env, &mut q_table, episode, epsilon)?;

            for observer in &mut self.observers {
                observer.on_episode_end(&stats)?;
            }

            let interval = self.config.log_interval;
            if interval > 0 && episode % interval == 0 {
                info!(
                    "episode {episode}/{total}: steps={} penalties={} reward={} epsilon={:.4}",
                    stats.steps, stats.penalties, stats.total_reward, stats.epsilon
                );
            }
            trace.push(stats);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        info!(
            "training finished: {} of {} states visited",
            q_table.visited_states(),
            state_count
        );

        Ok(TrainingOutcome { q_table, trace })
    }

    fn run_episode<E: Environment + ?Sized>(
        &mut self,
        env: &mut E,
        q_table: &mut QTable,
        episode: usize,
        epsilon: f64,
    ) -> Result<EpisodeStats> {
        let state_count = q_table.state_count();
        let mut state = checked_state(env.reset()?, state_count)?;

        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let mut steps = 0;
        let mut penalties = 0;
        let mut total_reward = 0.0;

        loop {
            let choice = self.selector.select(q_table.row(state), epsilon);
            let outcome = env.step(choice.action)?;
            let next_state = checked_state(outcome.next_state, state_count)?;

            q_table.q_learning_update(state, choice.action, outcome.reward, next_state);

            if outcome.reward == self.config.penalty {
                penalties += 1;
            }
            total_reward += outcome.reward;

            for observer in &mut self.observers {
                observer.on_step(episode, steps, state, choice.action, &outcome)?;
            }

            steps += 1;
            state = next_state;
            if outcome.terminal {
                break;
            }
        }

        debug!("episode {episode} finished after {steps} steps");

        Ok(EpisodeStats {
            episode,
            steps,
            penalties,
            total_reward,
            epsilon,
        })
    }
}

fn checked_state(state: usize, state_count: usize) -> Result<usize> {
    if state < state_count {
        Ok(state)
    } else {
        Err(Error::StateOutOfRange { state, state_count })
    }
}

/// Train a Q-table with the given hyperparameters.
///
/// Shorthand for [`QLearningTrainer`] with default logging and no observers.
/// Returns the Q-table and the per-episode trace.
#[allow(clippy::too_many_arguments)]
pub fn q_learning<E: Environment + ?Sized>(
    env: &mut E,
    penalty: f64,
    episodes: usize,
    learning_rate: f64,
    discount_factor: f64,
    epsilon_start: f64,
    strategy: &str,
    decay_rate: Option<f64>,
) -> Result<(QTable, Vec<EpisodeStats>)> {
    let config = TrainingConfig {
        episodes,
        learning_rate,
        discount_factor,
        epsilon_start,
        strategy: strategy.to_string(),
        decay_rate,
        penalty,
        ..TrainingConfig::default()
    };
    let outcome = QLearningTrainer::new(config).run(env)?;
    Ok((outcome.q_table, outcome.trace))
}
