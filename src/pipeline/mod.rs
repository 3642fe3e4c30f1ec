//! Training and evaluation pipelines
//!
//! This module provides:
//! - The Q-learning training loop over any [`Environment`]
//! - Greedy rollouts of a learned Q-table
//! - Observers recording data during training

pub mod evaluation;
pub mod observers;
pub mod training;

pub use evaluation::{EvaluationConfig, RolloutEpisode, RolloutFrame, perform, rollout_means};
// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, MetricsObserver, Observation, ProgressObserver, StepObservation,
};
pub use training::{QLearningTrainer, TrainingConfig, TrainingOutcome, q_learning};

pub use crate::ports::{Environment, Observer};
