//! Environment port - the discrete MDP interface the trainer drives

use serde::{Deserialize, Serialize};

use crate::Result;

/// Result of one environment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub next_state: usize,
    pub reward: f64,
    pub terminal: bool,
}

/// Episodic environment with finite, integer-indexed states and actions.
///
/// # Design Philosophy
///
/// The trainer and the greedy evaluator only ever see state and action
/// indices, so any tabular MDP (the cab grid, a hand-built test chain) can be
/// plugged in behind this port.
///
/// # Examples
///
/// ```no_run
/// use cab_rl::{ports::Environment, CabConfig};
///
/// let mut env = CabConfig::classic().build()?;
/// let state = env.reset()?;
/// let outcome = env.step(0)?;
/// assert!(state < env.state_count());
/// assert!(outcome.next_state < env.state_count());
/// # Ok::<(), cab_rl::Error>(())
/// ```
pub trait Environment {
    /// Number of states.
    fn state_count(&self) -> usize;

    /// Number of actions available in every state.
    fn action_count(&self) -> usize;

    /// Start a new episode and return its initial state.
    fn reset(&mut self) -> Result<usize>;

    /// Apply an action to the current state.
    ///
    /// # Errors
    ///
    /// Implementations return an error for actions outside
    /// `0..action_count()` and when called before [`Environment::reset`].
    fn step(&mut self, action: usize) -> Result<StepOutcome>;

    /// Seed the environment's random number generator.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for deterministic environments.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Capture a textual snapshot of the current state, if the environment
    /// can render one.
    ///
    /// # Default Implementation
    ///
    /// Returns `Ok(None)`.
    fn capture_frame(&self) -> Result<Option<String>> {
        Ok(None)
    }
}
