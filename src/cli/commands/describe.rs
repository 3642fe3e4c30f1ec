//! Describe command - Inspect an environment layout

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cab::{Action, RenderMode},
    cli::{
        config::EnvironmentArgs,
        output::{format_number, print_kv, print_section, print_subsection},
    },
    ports::Environment,
};

#[derive(Parser, Debug)]
#[command(about = "Describe an environment", allow_negative_numbers = true)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub env: EnvironmentArgs,

    /// Seed for the sample start state
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the resolved configuration as JSON
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

pub fn execute(args: DescribeArgs) -> Result<()> {
    let config = args.env.resolve()?;
    let env = config
        .build()
        .with_context(|| format!("Failed to build environment '{}'", config.name))?;
    let mut env = match args.seed {
        Some(seed) => env.with_seed(seed),
        None => env,
    };

    print_section(&format!("Environment: {}", config.name));
    print_kv(
        "Grid",
        &format!("{}x{}", env.layout().num_rows(), env.layout().num_cols()),
    );
    print_kv("States", &format_number(env.state_count()));
    print_kv("Actions", &env.action_count().to_string());
    let rewards = env.rewards();
    print_kv(
        "Rewards",
        &format!(
            "step {} / penalty {} / drop-off {}",
            rewards.step, rewards.penalty, rewards.final_reward
        ),
    );

    print_subsection("Locations");
    for (id, location) in env.layout().locations().iter().enumerate() {
        print_kv(
            &format!("{id} {}", location.marker),
            &format!("row {}, col {}", location.row, location.col),
        );
    }

    print_subsection("Actions");
    for action in Action::ALL {
        print_kv(&action.index().to_string(), action.label());
    }

    let state = env.reset()?;
    let decoded = env.decode(state)?;
    print_subsection(&format!("Sample start state {state}"));
    println!("{decoded:?}");
    if let Some(frame) = env.render(RenderMode::Ansi)? {
        print!("{frame}");
    }

    if let Some(path) = &args.save_config {
        config
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\nConfiguration written to {}", path.display());
    }

    Ok(())
}
