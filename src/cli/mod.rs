//! CLI infrastructure for the cab Q-learning toolkit
//!
//! This module provides the command-line interface for training Q-tables,
//! replaying greedy policies, and inspecting environment layouts.

pub mod commands;
pub mod config;
pub mod output;
