//! Environment configuration records and built-in layouts

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use super::{env::CabEnv, transitions::RewardSchedule};
use crate::error::{Error, Result};

const CLASSIC_LAYOUT: [&str; 10] = [
    "+---------------+",
    "|R: | : : |G: : |",
    "| : : | : | : : |",
    "| : : : : : : : |",
    "| | : : : | : : |",
    "|Y| : | : | : |B|",
    "| : : | : : : : |",
    "| : : | : | : : |",
    "| : : |K: | : : |",
    "+---------------+",
];

const EXTENDED_LAYOUT: [&str; 11] = [
    "+-----------------+",
    "|R: | : : |G: | : |",
    "| : : | : | : : : |",
    "| : : : : : : : : |",
    "| | : : : | : : : |",
    "|Y| : | : | : |B: |",
    "| : : | | : : : : |",
    "| : : | : | : : : |",
    "| : : |K: | : : | |",
    "| : : | : | : : |M|",
    "+-----------------+",
];

/// Complete description of a cab environment variant.
///
/// Variants differ only in data: the layout text, which glyphs are named
/// locations (their order fixes the location ids) and the reward schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CabConfig {
    /// Short name used in logs and saved Q-tables
    #[serde(default)]
    pub name: String,
    pub layout: Vec<String>,
    pub locations: Vec<char>,
    #[serde(default)]
    pub rewards: RewardSchedule,
}

impl CabConfig {
    /// 8x8 grid with five locations (R, G, Y, B, K).
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            layout: CLASSIC_LAYOUT.iter().map(|row| row.to_string()).collect(),
            locations: vec!['R', 'G', 'Y', 'B', 'K'],
            rewards: RewardSchedule::default(),
        }
    }

    /// 9x9 grid with six locations (R, G, Y, B, K, M).
    pub fn extended() -> Self {
        Self {
            name: "extended".to_string(),
            layout: EXTENDED_LAYOUT.iter().map(|row| row.to_string()).collect(),
            locations: vec!['R', 'G', 'Y', 'B', 'K', 'M'],
            rewards: RewardSchedule::default(),
        }
    }

    /// Look up a built-in configuration by name.
    pub fn preset(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" | "v1" => Ok(Self::classic()),
            "extended" | "v2" => Ok(Self::extended()),
            other => Err(Error::config(format!(
                "unknown environment preset '{other}' (expected 'classic' or 'extended')"
            ))),
        }
    }

    pub fn with_rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }

    /// Construct the environment described by this record.
    pub fn build(&self) -> Result<CabEnv> {
        CabEnv::from_config(self)
    }

    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open environment config {path:?}"),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Save this configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create environment config {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Environment;

    #[test]
    fn test_classic_dimensions() {
        let env = CabConfig::classic().build().unwrap();
        assert_eq!(env.layout().num_rows(), 8);
        assert_eq!(env.layout().num_cols(), 8);
        assert_eq!(env.state_count(), 8 * 8 * 6 * 5);
        assert_eq!(env.action_count(), 6);
        assert_eq!(env.layout().location_position(4), Some((7, 3)));
    }

    #[test]
    fn test_extended_dimensions() {
        let env = CabConfig::extended().build().unwrap();
        assert_eq!(env.layout().num_rows(), 9);
        assert_eq!(env.layout().num_cols(), 9);
        assert_eq!(env.state_count(), 9 * 9 * 7 * 6);
        assert_eq!(env.layout().location_position(5), Some((8, 8)));
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(CabConfig::preset("V2").unwrap(), CabConfig::extended());
        assert!(matches!(
            CabConfig::preset("mars"),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip_with_default_rewards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.json");

        let json = r#"{"layout": ["+---+", "|A:B|", "+---+"], "locations": ["A", "B"]}"#;
        std::fs::write(&path, json).unwrap();

        let config = CabConfig::load(&path).unwrap();
        assert_eq!(config.rewards, RewardSchedule::default());
        assert!(config.name.is_empty());
        let env = config.build().unwrap();
        assert_eq!(env.layout().num_cols(), 2);
    }
}
