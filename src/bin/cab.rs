//! cab CLI - tabular Q-learning on cab grid-worlds
//!
//! This CLI provides a unified interface for:
//! - Training Q-tables on built-in or JSON-configured layouts
//! - Replaying the greedy policy of a saved Q-table
//! - Inspecting environment layouts

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cab")]
#[command(version, about = "Tabular Q-learning on cab grid-worlds", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-table with ε-greedy Q-learning
    Train(Box<cab_rl::cli::commands::train::TrainArgs>),

    /// Run greedy episodes with a trained Q-table
    Perform(cab_rl::cli::commands::perform::PerformArgs),

    /// Print an environment's layout, locations and state space
    Describe(cab_rl::cli::commands::describe::DescribeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Train(args) => cab_rl::cli::commands::train::execute(*args),
        Commands::Perform(args) => cab_rl::cli::commands::perform::execute(args),
        Commands::Describe(args) => cab_rl::cli::commands::describe::execute(args),
    }
}
