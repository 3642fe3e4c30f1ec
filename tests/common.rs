//! Common test utilities for the cab-rl test suite.

#![allow(dead_code)]

use cab_rl::{CabConfig, CabEnv, CabState, PassengerStatus, RewardSchedule};

/// Two-by-two grid with locations A (top left) and B (top right).
pub const TINY_LAYOUT: [&str; 4] = ["+---+", "|A:B|", "| : |", "+---+"];

pub fn tiny_config() -> CabConfig {
    CabConfig {
        name: "tiny".to_string(),
        layout: TINY_LAYOUT.iter().map(|row| row.to_string()).collect(),
        locations: vec!['A', 'B'],
        rewards: RewardSchedule::default(),
    }
}

/// Classic environment with a fixed seed.
pub fn classic_env(seed: u64) -> CabEnv {
    CabConfig::classic()
        .build()
        .expect("classic layout should parse")
        .with_seed(seed)
}

/// Encode a state tuple with the environment's codec.
pub fn state_id(
    env: &CabEnv,
    row: usize,
    col: usize,
    passenger: PassengerStatus,
    destination: usize,
) -> usize {
    env.encode(&CabState::new(row, col, passenger, destination))
}
