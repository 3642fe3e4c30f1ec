//! Serialization support for learned Q-tables.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{cab::CabConfig, pipeline::TrainingConfig, q_learning::QTable};

/// Q-table together with how it was trained, stored as MessagePack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub q_table: QTable,
    pub config: TrainingConfig,
    /// Environment the table was trained on, layout included
    pub environment: CabConfig,
}

impl SavedQTable {
    pub const VERSION: u32 = 2;

    pub fn new(q_table: QTable, config: TrainingConfig, environment: CabConfig) -> Self {
        Self {
            version: Self::VERSION,
            q_table,
            config,
            environment,
        }
    }

    /// Check the format version and hand out the table.
    pub fn into_q_table(self) -> Result<QTable> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported Q-table save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        Ok(self.q_table)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, self)
            .context("Failed to serialize Q-table")?;
        writer
            .flush()
            .with_context(|| format!("Failed to write file: {}", path.as_ref().display()))?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize Q-table")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_roundtrip() -> Result<()> {
        let mut q_table = QTable::new(3, 2, 0.2, 0.8);
        q_table.set(1, 1, -4.5);
        let config = TrainingConfig {
            episodes: 42,
            seed: Some(5),
            ..TrainingConfig::default()
        };
        let environment = CabConfig {
            name: "custom".to_string(),
            ..CabConfig::extended()
        };
        let saved = SavedQTable::new(q_table.clone(), config.clone(), environment.clone());

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("q.msgpack");
        saved.save_to_file(&path)?;
        let loaded = SavedQTable::load_from_file(&path)?;

        assert_eq!(loaded.environment, environment);
        assert_eq!(loaded.environment.build().unwrap().codec().state_count(), 3402);
        assert_eq!(loaded.config, config);
        assert_eq!(loaded.into_q_table()?, q_table);
        Ok(())
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut saved = SavedQTable::new(
            QTable::new(1, 1, 0.1, 0.9),
            TrainingConfig::default(),
            CabConfig::classic(),
        );
        saved.version = 99;
        assert!(saved.into_q_table().is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SavedQTable::load_from_file(dir.path().join("absent.msgpack")).is_err());
    }
}
