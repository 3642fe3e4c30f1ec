//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling training
//! logic to specific output formats or metrics.

use crate::{Result, ports::StepOutcome, q_learning::EpisodeStats};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during training.
/// Examples include:
/// - Progress bars for user feedback
/// - JSONL export for analysis
/// - Metrics tracking for evaluation
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each step, after the Q-value update
///    - `on_episode_end(stats)`
/// 3. `on_training_end()` - Once at the end
///
/// Episode numbers are 1-indexed, matching the trace.
///
/// # Examples
///
/// ```no_run
/// use cab_rl::{ports::Observer, q_learning::EpisodeStats};
///
/// struct PenaltyCounter {
///     penalties: usize,
/// }
///
/// impl Observer for PenaltyCounter {
///     fn on_episode_end(&mut self, stats: &EpisodeStats) -> cab_rl::Result<()> {
///         self.penalties += stats.penalties;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts, after the environment was reset.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called for each environment step.
    ///
    /// # Parameters
    ///
    /// * `episode` - Current episode (1-indexed)
    /// * `step` - Step number within the episode (0-based)
    /// * `state` - State the action was taken in
    /// * `action` - Action taken
    /// * `outcome` - What the environment returned
    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _state: usize,
        _action: usize,
        _outcome: &StepOutcome,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode reaches a terminal state.
    fn on_episode_end(&mut self, _stats: &EpisodeStats) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
