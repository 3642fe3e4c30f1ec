//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    collections::VecDeque,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Observer, StepOutcome},
    q_learning::{EpisodeStats, WindowStats},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    last_reward: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            last_reward: 0.0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        self.last_reward = stats.total_reward;
        if let Some(pb) = &self.progress_bar {
            pb.set_position(stats.episode as u64);
            pb.set_message(format!(
                "reward {} eps {:.3}",
                stats.total_reward, stats.epsilon
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("last reward {}", self.last_reward));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics over a rolling window
pub struct MetricsObserver {
    window: usize,
    recent: VecDeque<EpisodeStats>,
    total_episodes: usize,
    total_steps: usize,
    total_penalties: usize,
    terminal_steps: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer keeping the last `window` episodes
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            recent: VecDeque::new(),
            total_episodes: 0,
            total_steps: 0,
            total_penalties: 0,
            terminal_steps: 0,
        }
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn total_penalties(&self) -> usize {
        self.total_penalties
    }

    /// Steps that ended an episode
    pub fn terminal_steps(&self) -> usize {
        self.terminal_steps
    }

    /// Means over the rolling window
    pub fn rolling(&self) -> WindowStats {
        let episodes: Vec<EpisodeStats> = self.recent.iter().copied().collect();
        WindowStats::from_episodes(&episodes)
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Observer for MetricsObserver {
    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _state: usize,
        _action: usize,
        outcome: &StepOutcome,
    ) -> Result<()> {
        self.total_steps += 1;
        if outcome.terminal {
            self.terminal_steps += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        self.total_episodes += 1;
        self.total_penalties += stats.penalties;
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(*stats);
        Ok(())
    }
}

/// Observation of a single step during an episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    pub step: usize,
    pub state: usize,
    pub action: usize,
    pub reward: f64,
    pub next_state: usize,
}

/// Complete observation of a training episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    #[serde(flatten)]
    pub stats: EpisodeStats,
    /// Empty unless step recording is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepObservation>,
}

/// JSONL observer - Exports observations to JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    record_steps: bool,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing one line per episode
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            record_steps: false,
            current_steps: Vec::new(),
        })
    }

    /// Also include every step of each episode
    pub fn with_steps(mut self, record_steps: bool) -> Self {
        self.record_steps = record_steps;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(
        &mut self,
        _episode: usize,
        step: usize,
        state: usize,
        action: usize,
        outcome: &StepOutcome,
    ) -> Result<()> {
        if self.record_steps {
            self.current_steps.push(StepObservation {
                step,
                state,
                action,
                reward: outcome.reward,
                next_state: outcome.next_state,
            });
        }
        Ok(())
    }

    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        let observation = Observation {
            stats: *stats,
            steps: std::mem::take(&mut self.current_steps),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
