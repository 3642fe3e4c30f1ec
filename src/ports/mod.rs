//! Ports (trait boundaries) between the learning code and its surroundings.
//!
//! The trainer and evaluator only depend on these traits; the cab grid and
//! the observer adapters implement them.

pub mod environment;
pub mod observer;

pub use environment::{Environment, StepOutcome};
pub use observer::Observer;
