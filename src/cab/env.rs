//! The cab environment

use std::{fmt, io::Write, str::FromStr};

use log::{debug, warn};
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::{
    action::Action,
    config::CabConfig,
    layout::Layout,
    render::Frame,
    state::{CabState, StateCodec},
    transitions::{
        RewardSchedule, TransitionTable, build_transition_table, initial_state_distribution,
    },
};
use crate::{
    error::{Error, Result},
    ports::{Environment, StepOutcome},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// How [`CabEnv::render`] delivers its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Print the coloured frame to standard output.
    #[default]
    Human,
    /// Return the coloured frame as a string.
    Ansi,
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(RenderMode::Human),
            "ansi" | "text" => Ok(RenderMode::Ansi),
            other => Err(Error::config(format!(
                "unknown render mode '{other}' (expected 'human' or 'ansi')"
            ))),
        }
    }
}

/// Cab grid-world MDP.
///
/// The transition table is built once in [`CabEnv::new`] and never changes.
/// Only the current state, the last action and the RNG mutate.
pub struct CabEnv {
    layout: Layout,
    codec: StateCodec,
    rewards: RewardSchedule,
    table: TransitionTable,
    initial_distribution: Vec<f64>,
    initial_states: Vec<usize>,
    current: Option<usize>,
    last_action: Option<Action>,
    rng: StdRng,
}

impl CabEnv {
    /// Build an environment from layout rows, location markers and rewards.
    ///
    /// # Errors
    ///
    /// Propagates layout parsing errors (see [`Layout::parse`]).
    pub fn new<S: AsRef<str>>(
        rows: &[S],
        markers: &[char],
        rewards: RewardSchedule,
    ) -> Result<Self> {
        let layout = Layout::parse(rows, markers)?;
        let codec = StateCodec::new(layout.num_rows(), layout.num_cols(), layout.num_locations());
        let table = build_transition_table(&layout, &rewards);
        let initial_distribution = initial_state_distribution(&codec);
        let initial_states = initial_distribution
            .iter()
            .enumerate()
            .filter(|(_, p)| **p > 0.0)
            .map(|(state, _)| state)
            .collect();

        if rewards.penalty == rewards.step {
            warn!(
                "penalty reward equals step reward ({}); penalty counts will include every step",
                rewards.step
            );
        }

        debug!(
            "cab grid {}x{} with locations {:?}",
            layout.num_rows(),
            layout.num_cols(),
            layout
                .locations()
                .iter()
                .map(|loc| (loc.marker, loc.row, loc.col))
                .collect::<Vec<_>>()
        );

        Ok(Self {
            layout,
            codec,
            rewards,
            table,
            initial_distribution,
            initial_states,
            current: None,
            last_action: None,
            rng: build_rng(None),
        })
    }

    /// Build an environment from a configuration record.
    pub fn from_config(config: &CabConfig) -> Result<Self> {
        Self::new(&config.layout, &config.locations, config.rewards)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn codec(&self) -> &StateCodec {
        &self.codec
    }

    pub fn rewards(&self) -> &RewardSchedule {
        &self.rewards
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.table
    }

    /// Probability of starting an episode in each state.
    pub fn initial_state_distribution(&self) -> &[f64] {
        &self.initial_distribution
    }

    /// Current state index, if an episode is running.
    pub fn current_state(&self) -> Option<usize> {
        self.current
    }

    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    pub fn encode(&self, state: &CabState) -> usize {
        self.codec.encode(state)
    }

    pub fn decode(&self, state: usize) -> Result<CabState> {
        self.codec.decode(state)
    }

    /// Sample a start state and make it current.
    pub fn reset(&mut self) -> Result<usize> {
        let state = *self
            .initial_states
            .choose(&mut self.rng)
            .ok_or_else(|| Error::layout("no valid initial state"))?;
        self.current = Some(state);
        self.last_action = None;
        Ok(state)
    }

    /// Start an episode from a chosen state instead of a sampled one.
    pub fn reset_to(&mut self, state: usize) -> Result<usize> {
        let state_count = self.codec.state_count();
        if state >= state_count {
            return Err(Error::StateOutOfRange { state, state_count });
        }
        self.current = Some(state);
        self.last_action = None;
        Ok(state)
    }

    /// Take `action` from the current state.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidAction`] if `action` is not one of the six actions
    /// * [`Error::NotReset`] if no episode has been started
    pub fn step(&mut self, action: usize) -> Result<StepOutcome> {
        let action = Action::try_from(action)?;
        let state = self.current.ok_or(Error::NotReset)?;
        let transition = self
            .table
            .get(state, action.index())
            .ok_or(Error::StateOutOfRange {
                state,
                state_count: self.table.state_count(),
            })?;

        self.current = Some(transition.next_state);
        self.last_action = Some(action);

        Ok(StepOutcome {
            next_state: transition.next_state,
            reward: transition.reward,
            terminal: transition.terminal,
        })
    }

    /// Presentation structure for the current state.
    pub fn frame(&self) -> Result<Frame> {
        let state = self.current.ok_or(Error::NotReset)?;
        let decoded = self.codec.decode(state)?;
        Ok(Frame::new(&self.layout, &decoded, self.last_action))
    }

    /// Render the current state.
    ///
    /// [`RenderMode::Human`] writes to standard output and returns `None`;
    /// [`RenderMode::Ansi`] returns the text instead.
    pub fn render(&self, mode: RenderMode) -> Result<Option<String>> {
        let text = self.frame()?.to_ansi();
        match mode {
            RenderMode::Ansi => Ok(Some(text)),
            RenderMode::Human => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(text.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|source| Error::Io {
                        operation: "write frame to stdout".to_string(),
                        source,
                    })?;
                Ok(None)
            }
        }
    }
}

impl fmt::Debug for CabEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CabEnv")
            .field("rows", &self.layout.num_rows())
            .field("cols", &self.layout.num_cols())
            .field("locations", &self.layout.num_locations())
            .field("rewards", &self.rewards)
            .field("current", &self.current)
            .finish()
    }
}

impl Environment for CabEnv {
    fn state_count(&self) -> usize {
        self.codec.state_count()
    }

    fn action_count(&self) -> usize {
        Action::COUNT
    }

    fn reset(&mut self) -> Result<usize> {
        CabEnv::reset(self)
    }

    fn step(&mut self, action: usize) -> Result<StepOutcome> {
        CabEnv::step(self, action)
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = build_rng(Some(seed));
        Ok(())
    }

    fn capture_frame(&self) -> Result<Option<String>> {
        self.render(RenderMode::Ansi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cab::state::PassengerStatus;

    fn env() -> CabEnv {
        CabConfig::classic().build().unwrap().with_seed(3)
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut env = env();
        assert!(matches!(env.step(0), Err(Error::NotReset)));
        assert!(matches!(env.render(RenderMode::Ansi), Err(Error::NotReset)));
    }

    #[test]
    fn test_invalid_action_fails() {
        let mut env = env();
        env.reset().unwrap();
        assert!(matches!(
            env.step(6),
            Err(Error::InvalidAction {
                action: 6,
                action_count: 6
            })
        ));
    }

    #[test]
    fn test_reset_samples_valid_start() {
        let mut env = env();
        for _ in 0..200 {
            let state = env.reset().unwrap();
            let decoded = env.decode(state).unwrap();
            match decoded.passenger {
                PassengerStatus::At(location) => assert_ne!(location, decoded.destination),
                PassengerStatus::InCab => panic!("passenger starts in cab: {decoded:?}"),
            }
        }
    }

    #[test]
    fn test_step_updates_current_state() {
        let mut env = env();
        let start = env.reset().unwrap();
        let outcome = env.step(Action::PickUp.index()).unwrap();
        assert_eq!(env.current_state(), Some(outcome.next_state));
        assert_eq!(env.last_action(), Some(Action::PickUp));
        let expected = env.transitions().get(start, Action::PickUp.index()).unwrap();
        assert_eq!(outcome.reward, expected.reward);
    }

    #[test]
    fn test_render_mode_parsing() {
        assert_eq!("human".parse::<RenderMode>().unwrap(), RenderMode::Human);
        assert_eq!("ANSI".parse::<RenderMode>().unwrap(), RenderMode::Ansi);
        assert!("rgb".parse::<RenderMode>().is_err());
    }

    #[test]
    fn test_render_does_not_change_state() {
        let mut env = env();
        let state = env.reset().unwrap();
        let text = env.render(RenderMode::Ansi).unwrap().unwrap();
        assert!(text.ends_with("\n\n"));
        assert_eq!(env.current_state(), Some(state));
    }
}
