//! Perform command - Replay the greedy policy of a saved Q-table

use std::{fs::File, path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        config::EnvironmentArgs,
        output::{print_kv, print_section, print_subsection},
    },
    pipeline::{EvaluationConfig, perform, rollout_means},
    q_learning::SavedQTable,
};

#[derive(Parser, Debug)]
#[command(about = "Run greedy episodes with a trained Q-table")]
pub struct PerformArgs {
    /// Path to saved Q-table file
    pub q_table: PathBuf,

    // Defaults to the environment the table was trained on
    #[command(flatten)]
    pub env: EnvironmentArgs,

    /// Number of episodes
    #[arg(long, short = 'e', default_value_t = 1)]
    pub episodes: usize,

    /// Step limit per episode
    #[arg(long, default_value_t = 200)]
    pub max_steps: usize,

    /// Random seed for start states
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause between printed frames, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Only print per-episode results
    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Export rollouts to JSON
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn execute(args: PerformArgs) -> Result<()> {
    println!("Loading Q-table from: {}", args.q_table.display());
    let saved = SavedQTable::load_from_file(&args.q_table)?;
    let trained_on = saved.environment.clone();
    let penalty = saved.config.penalty;
    let q_table = saved.into_q_table()?;

    let env_config = args.env.resolve_or(trained_on)?;
    let mut env = env_config
        .build()
        .with_context(|| format!("Failed to build environment '{}'", env_config.name))?;

    let config = EvaluationConfig {
        episodes: args.episodes,
        penalty,
        max_steps: args.max_steps,
        capture_frames: !args.quiet,
        seed: args.seed,
    };
    let episodes = perform(&mut env, &q_table, &config).context("Rollout failed")?;

    for (idx, episode) in episodes.iter().enumerate() {
        print_section(&format!("Episode {}", idx + 1));
        for (step, frame) in episode.frames.iter().enumerate() {
            if let Some(rendered) = &frame.rendered {
                print!("{rendered}");
            }
            println!(
                "Step: {}  State: {}  Reward: {}",
                step + 1,
                frame.state,
                frame.total_reward
            );
            if args.delay_ms > 0 {
                thread::sleep(Duration::from_millis(args.delay_ms));
            }
        }
        print_kv("Steps", &episode.steps.to_string());
        print_kv("Penalties", &episode.penalties.to_string());
        print_kv("Total reward", &episode.total_reward.to_string());
        if episode.truncated {
            print_kv("Finished", "no (step limit reached)");
        }
    }

    let (mean_steps, mean_penalties, mean_reward) = rollout_means(&episodes);
    print_subsection("Averages");
    print_kv("Steps", &format!("{mean_steps:.2}"));
    print_kv("Penalties", &format!("{mean_penalties:.2}"));
    print_kv("Reward", &format!("{mean_reward:.2}"));

    if let Some(path) = &args.export {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &episodes)?;
        println!("\nRollouts written to {}", path.display());
    }

    Ok(())
}
