//! Subcommands of the `cab` binary

pub mod describe;
pub mod perform;
pub mod train;
