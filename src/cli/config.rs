//! Shared configuration types for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::cab::CabConfig;

/// Built-in environment layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvPreset {
    /// 8x8 grid, five locations
    Classic,
    /// 9x9 grid, six locations
    Extended,
}

impl EnvPreset {
    pub fn config(self) -> CabConfig {
        match self {
            EnvPreset::Classic => CabConfig::classic(),
            EnvPreset::Extended => CabConfig::extended(),
        }
    }
}

/// Environment selection shared by commands
#[derive(Args, Debug, Clone, Default)]
pub struct EnvironmentArgs {
    /// Built-in environment layout
    #[arg(long = "env", value_enum)]
    pub preset: Option<EnvPreset>,

    /// JSON environment configuration (overrides --env)
    #[arg(long, conflicts_with = "preset")]
    pub env_config: Option<PathBuf>,
}

impl EnvironmentArgs {
    /// Resolve the selected configuration, falling back to `fallback`.
    pub fn resolve_or(&self, fallback: CabConfig) -> Result<CabConfig> {
        if let Some(path) = &self.env_config {
            let mut config = CabConfig::load(path).with_context(|| {
                format!("Failed to load environment config {}", path.display())
            })?;
            if config.name.is_empty() {
                config.name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
            }
            return Ok(config);
        }
        Ok(self.preset.map(EnvPreset::config).unwrap_or(fallback))
    }

    pub fn resolve(&self) -> Result<CabConfig> {
        self.resolve_or(CabConfig::classic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_classic() {
        let args = EnvironmentArgs::default();
        assert_eq!(args.resolve().unwrap(), CabConfig::classic());
    }

    #[test]
    fn test_config_file_takes_name_from_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.json");
        std::fs::write(
            &path,
            r#"{"layout": ["+---+", "|A:B|", "+---+"], "locations": ["A", "B"]}"#,
        )
        .unwrap();

        let args = EnvironmentArgs {
            preset: None,
            env_config: Some(path),
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.name, "tiny");
        assert_eq!(config.locations, vec!['A', 'B']);
    }
}
