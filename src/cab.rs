//! Cab grid-world environment
//!
//! A Taxi-style MDP: a cab drives around a walled grid, picks a passenger up
//! at one named location and drops them off at another. The layout, the set
//! of named locations and the reward schedule are plain configuration data.

pub mod action;
pub mod config;
pub mod env;
pub mod layout;
pub mod render;
pub mod state;
pub mod transitions;

pub use action::Action;
pub use config::CabConfig;
pub use env::{CabEnv, RenderMode};
pub use layout::{Layout, Location};
pub use render::{Frame, Highlight, HighlightKind};
pub use state::{CabState, PassengerStatus, StateCodec};
pub use transitions::{
    RewardSchedule, Transition, TransitionTable, build_transition_table,
    initial_state_distribution,
};
