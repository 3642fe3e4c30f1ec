//! Train command - Learn a Q-table on a cab environment

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::{
        config::EnvironmentArgs,
        output::{format_number, print_kv, print_section},
    },
    pipeline::{JsonlObserver, ProgressObserver, QLearningTrainer, TrainingConfig},
    q_learning::{SavedQTable, TrainingSummary, write_trace_csv},
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    environment: &'a str,
    config: &'a TrainingConfig,
    summary: &'a TrainingSummary,
    visited_states: usize,
    state_count: usize,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-table", allow_negative_numbers = true)]
pub struct TrainArgs {
    #[command(flatten)]
    pub env: EnvironmentArgs,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 1000)]
    pub episodes: usize,

    /// Learning rate α (0.0-1.0]
    #[arg(long, short = 'a', alias = "alpha", default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, short = 'g', alias = "gamma", default_value_t = 0.9)]
    pub discount: f64,

    /// Exploration rate of the first episode
    #[arg(long, default_value_t = 1.0)]
    pub epsilon: f64,

    /// Epsilon schedule (linear or exponential)
    #[arg(long, short = 's', default_value = "linear")]
    pub strategy: String,

    /// Per-episode decay factor (required by the exponential schedule)
    #[arg(long)]
    pub decay_rate: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the trained Q-table (MessagePack)
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional path for the per-episode trace (CSV)
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Include every step in the JSONL observations
    #[arg(long, default_value_t = false, requires = "observations")]
    pub record_steps: bool,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Log progress every N episodes (0 disables)
    #[arg(long, default_value_t = 100)]
    pub log_interval: usize,

    /// Number of final episodes summarised separately
    #[arg(long, default_value_t = 100)]
    pub window: usize,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let env_config = args.env.resolve()?;
    let mut env = env_config
        .build()
        .with_context(|| format!("Failed to build environment '{}'", env_config.name))?;

    let config = TrainingConfig {
        episodes: args.episodes,
        learning_rate: args.learning_rate,
        discount_factor: args.discount,
        epsilon_start: args.epsilon,
        strategy: args.strategy.clone(),
        decay_rate: args.decay_rate,
        penalty: env.rewards().penalty,
        seed: args.seed,
        log_interval: args.log_interval,
    };
    config.validate().context("Invalid training configuration")?;

    let summary_target = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    print_section("Q-Learning Training");
    print_kv("Environment", &env_config.name);
    print_kv(
        "Grid",
        &format!("{}x{}", env.layout().num_rows(), env.layout().num_cols()),
    );
    print_kv("States", &format_number(env.codec().state_count()));
    print_kv("Episodes", &format_number(config.episodes));
    print_kv("Learning rate", &config.learning_rate.to_string());
    print_kv("Discount", &config.discount_factor.to_string());
    print_kv("Epsilon", &format!("{} ({})", config.epsilon_start, config.strategy));

    let mut trainer = QLearningTrainer::new(config.clone());
    if args.progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        ensure_parent(path)?;
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create {}", path.display()))?
            .with_steps(args.record_steps);
        trainer = trainer.with_observer(Box::new(observer));
    }

    let outcome = trainer.run(&mut env).context("Training failed")?;
    let summary = TrainingSummary::from_trace(&outcome.trace, args.window);

    print_section("Training Results");
    print_kv("Episodes", &format_number(summary.total_episodes));
    print_kv("Total steps", &format_number(summary.total_steps));
    print_kv("Total penalties", &format_number(summary.total_penalties));
    print_kv(
        "Mean reward",
        &format!(
            "{:.2} (last {}: {:.2})",
            summary.overall.mean_reward, summary.recent.episodes, summary.recent.mean_reward
        ),
    );
    print_kv(
        "Mean steps",
        &format!(
            "{:.2} (last {}: {:.2})",
            summary.overall.mean_steps, summary.recent.episodes, summary.recent.mean_steps
        ),
    );
    print_kv(
        "Visited states",
        &format!(
            "{} / {}",
            outcome.q_table.visited_states(),
            outcome.q_table.state_count()
        ),
    );

    if let Some(path) = &args.trace {
        ensure_parent(path)?;
        write_trace_csv(path, &outcome.trace)
            .with_context(|| format!("Failed to write trace {}", path.display()))?;
        println!("\nTrace written to {}", path.display());
    }

    if let Some((summary_path, normalized)) = summary_target {
        if normalized {
            println!(
                "\n⚠️  Normalizing summary path to {}",
                summary_path.display()
            );
        }
        ensure_parent(&summary_path)?;

        let file = TrainingSummaryFile {
            environment: &env_config.name,
            config: &config,
            summary: &summary,
            visited_states: outcome.q_table.visited_states(),
            state_count: outcome.q_table.state_count(),
        };
        let writer = File::create(&summary_path)?;
        to_writer_pretty(writer, &file)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    if let Some(path) = &args.output {
        ensure_parent(path)?;
        let saved = SavedQTable::new(outcome.q_table, config, env_config.clone());
        saved.save_to_file(path)?;
        println!("\nQ-table saved to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary")),
            PathBuf::from("out/summary.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary.JSON")),
            PathBuf::from("out/summary.JSON")
        );
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir)),
            PathBuf::from("out").join("training_summary.json")
        );
    }
}
