//! Tabular Q-learning
//!
//! Off-policy temporal difference control over integer-indexed states and
//! actions:
//!
//! ```text
//! Q(s,a) ← (1 − α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
//! ```
//!
//! ## Components
//!
//! - [`QTable`]: dense value table with greedy action and policy extraction
//! - [`EpsilonSchedule`] / [`get_epsilon`]: per-episode exploration rate
//! - [`EpsilonGreedy`]: seeded ε-greedy action selection
//! - [`EpisodeStats`] / [`TrainingSummary`]: the training trace
//! - [`SavedQTable`]: MessagePack persistence
//!
//! The training loop itself lives in [`crate::pipeline`].
//!
//! ## Usage Example
//!
//! ```no_run
//! use cab_rl::{CabConfig, pipeline::q_learning};
//!
//! let mut env = CabConfig::classic().build()?;
//! let (q_table, trace) = q_learning(&mut env, -30.0, 1000, 0.1, 0.9, 1.0, "linear", None)?;
//! println!("{} episodes, final policy for state 0: {}", trace.len(), q_table.greedy_action(0));
//! # Ok::<(), cab_rl::Error>(())
//! ```

pub mod epsilon;
pub mod exploration;
pub mod q_table;
pub mod serialization;
pub mod trace;

// Public re-exports
pub use epsilon::{EPSILON_FLOOR, EpsilonSchedule, EpsilonStrategy, get_epsilon};
pub use exploration::{ActionChoice, EpsilonGreedy};
pub use q_table::{QTable, argmax};
pub use serialization::SavedQTable;
pub use trace::{EpisodeStats, TrainingSummary, WindowStats, read_trace_csv, write_trace_csv};
