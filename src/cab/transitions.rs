//! Transition table construction
//!
//! The cab MDP is deterministic, so every (state, action) pair has exactly one
//! outcome. The table is a flat array indexed by `state * action_count +
//! action`, fully populated before it is handed out.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    action::Action,
    layout::Layout,
    state::{CabState, PassengerStatus, StateCodec},
};

/// Rewards paid by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// Cost of every ordinary step, including wasted moves into walls
    pub step: f64,
    /// Paid for a pickup or drop-off that is not allowed
    pub penalty: f64,
    /// Paid for delivering the passenger to the destination
    pub final_reward: f64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            step: -1.0,
            penalty: -30.0,
            final_reward: 60.0,
        }
    }
}

/// One outcome of taking an action in a state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub probability: f64,
    pub next_state: usize,
    pub reward: f64,
    pub terminal: bool,
}

/// Dense, immutable (state, action) → [`Transition`] lookup.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    entries: Vec<Transition>,
    state_count: usize,
    action_count: usize,
}

impl TransitionTable {
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }

    /// Outcome of `action` in `state`, or `None` if either is out of range.
    pub fn get(&self, state: usize, action: usize) -> Option<&Transition> {
        if state >= self.state_count || action >= self.action_count {
            return None;
        }
        self.entries.get(state * self.action_count + action)
    }

    /// All outcomes for `state`, one per action.
    pub fn outcomes(&self, state: usize) -> &[Transition] {
        let start = (state * self.action_count).min(self.entries.len());
        let end = (start + self.action_count).min(self.entries.len());
        &self.entries[start..end]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn outcome(
    layout: &Layout,
    rewards: &RewardSchedule,
    state: &CabState,
    action: Action,
) -> (CabState, f64, bool) {
    let cab = state.position();
    let mut next = *state;

    match action {
        Action::South | Action::North | Action::East | Action::West => {
            let (row, col) = layout.move_target(state.row, state.col, action);
            next.row = row;
            next.col = col;
            (next, rewards.step, false)
        }
        Action::PickUp => match state.passenger {
            PassengerStatus::At(location) if layout.location_position(location) == Some(cab) => {
                next.passenger = PassengerStatus::InCab;
                (next, rewards.step, false)
            }
            _ => (next, rewards.penalty, false),
        },
        Action::DropOff => {
            if !state.passenger_in_cab() {
                return (next, rewards.penalty, false);
            }
            if layout.location_position(state.destination) == Some(cab) {
                next.passenger = PassengerStatus::At(state.destination);
                (next, rewards.final_reward, true)
            } else if let Some(location) = layout.location_at(state.row, state.col) {
                next.passenger = PassengerStatus::At(location);
                (next, rewards.step, false)
            } else {
                (next, rewards.penalty, false)
            }
        }
    }
}

/// Build the complete transition table for a layout and reward schedule.
pub fn build_transition_table(layout: &Layout, rewards: &RewardSchedule) -> TransitionTable {
    let codec = StateCodec::new(layout.num_rows(), layout.num_cols(), layout.num_locations());
    let state_count = codec.state_count();
    let action_count = Action::COUNT;

    let mut entries = Vec::with_capacity(state_count * action_count);
    for state in codec.states() {
        for action in Action::ALL {
            let (next, reward, terminal) = outcome(layout, rewards, &state, action);
            entries.push(Transition {
                probability: 1.0,
                next_state: codec.encode(&next),
                reward,
                terminal,
            });
        }
    }

    debug!(
        "built transition table: {state_count} states x {action_count} actions ({} entries)",
        entries.len()
    );

    TransitionTable {
        entries,
        state_count,
        action_count,
    }
}

/// Initial-state distribution: uniform over states where the passenger waits
/// at a location other than the destination, zero elsewhere.
pub fn initial_state_distribution(codec: &StateCodec) -> Vec<f64> {
    let mut weights: Vec<f64> = codec
        .states()
        .map(|state| match state.passenger {
            PassengerStatus::At(location) if location != state.destination => 1.0,
            _ => 0.0,
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter_mut().for_each(|w| *w /= total);
    }
    weights
}
