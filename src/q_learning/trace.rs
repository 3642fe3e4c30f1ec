//! Per-episode training trace and its summaries

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Statistics for one training episode.
///
/// Field names follow the trace CSV columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// 1-indexed episode number
    pub episode: usize,
    #[serde(rename = "num_steps")]
    pub steps: usize,
    #[serde(rename = "num_penalties")]
    pub penalties: usize,
    #[serde(rename = "total_rewards")]
    pub total_reward: f64,
    pub epsilon: f64,
}

/// Means over a run of episodes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowStats {
    pub episodes: usize,
    pub mean_steps: f64,
    pub mean_penalties: f64,
    pub mean_reward: f64,
}

impl WindowStats {
    pub fn from_episodes(episodes: &[EpisodeStats]) -> Self {
        if episodes.is_empty() {
            return Self::default();
        }
        let n = episodes.len() as f64;
        Self {
            episodes: episodes.len(),
            mean_steps: episodes.iter().map(|e| e.steps as f64).sum::<f64>() / n,
            mean_penalties: episodes.iter().map(|e| e.penalties as f64).sum::<f64>() / n,
            mean_reward: episodes.iter().map(|e| e.total_reward).sum::<f64>() / n,
        }
    }
}

/// Summary of a complete training trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub total_episodes: usize,
    pub total_steps: usize,
    pub total_penalties: usize,
    pub overall: WindowStats,
    /// Stats over the final `window` episodes
    pub recent: WindowStats,
    pub window: usize,
    pub final_epsilon: Option<f64>,
}

impl TrainingSummary {
    pub fn from_trace(trace: &[EpisodeStats], window: usize) -> Self {
        let start = trace.len().saturating_sub(window);
        Self {
            total_episodes: trace.len(),
            total_steps: trace.iter().map(|e| e.steps).sum(),
            total_penalties: trace.iter().map(|e| e.penalties).sum(),
            overall: WindowStats::from_episodes(trace),
            recent: WindowStats::from_episodes(&trace[start..]),
            window,
            final_epsilon: trace.last().map(|e| e.epsilon),
        }
    }
}

/// Write the trace as CSV with columns
/// `episode,num_steps,num_penalties,total_rewards,epsilon`.
pub fn write_trace_csv<P: AsRef<Path>>(path: P, trace: &[EpisodeStats]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for stats in trace {
        writer.serialize(stats)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a trace previously written by [`write_trace_csv`].
pub fn read_trace_csv<P: AsRef<Path>>(path: P) -> Result<Vec<EpisodeStats>> {
    let mut reader = csv::Reader::from_path(path)?;
    let trace = reader
        .deserialize()
        .collect::<std::result::Result<Vec<EpisodeStats>, csv::Error>>()?;
    Ok(trace)
}
