//! Tabular Q-learning on a configurable cab grid-world
//!
//! This crate provides:
//! - A Taxi-style cab MDP built from a text layout, with a precomputed
//!   deterministic transition table and text rendering
//! - Linear and exponential epsilon schedules
//! - A Q-learning trainer, greedy rollouts and training observers
//! - Persistence of Q-tables, traces and summaries

pub mod cab;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use cab::{Action, CabConfig, CabEnv, CabState, PassengerStatus, RenderMode, RewardSchedule};
pub use error::{Error, Result};
pub use pipeline::{QLearningTrainer, TrainingConfig, q_learning};
pub use q_learning::{QTable, get_epsilon};
