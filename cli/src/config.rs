// Configuration for the ringer CLI harness
//
// Read-only: the harness loads an optional JSON file passed with --config and
// applies command-line overrides on top. Nothing is written back.

use anyhow::{Context, Result};
use ringer_core::{PlatformCapabilities, RingtoneConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Capability set the simulated engine reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityPreset {
    #[default]
    Full,
    Legacy,
    None,
}

impl CapabilityPreset {
    pub fn capabilities(self) -> PlatformCapabilities {
        match self {
            Self::Full => PlatformCapabilities::full(),
            Self::Legacy => PlatformCapabilities::legacy(),
            Self::None => PlatformCapabilities::none(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Controller settings
    pub ringtone: RingtoneConfig,

    /// Simulated engine capabilities
    pub capabilities: CapabilityPreset,

    /// How long `play` rings before stopping
    pub play_duration_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ringtone: RingtoneConfig::default(),
            capabilities: CapabilityPreset::Full,
            play_duration_ms: 3000,
        }
    }
}

impl Config {
    /// Load config from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config
            .ringtone
            .validate()
            .context("Invalid ringtone settings")?;

        Ok(config)
    }

    /// Get a config value
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "category" => Some(self.ringtone.category.to_string()),
            "looping" => Some(self.ringtone.looping.to_string()),
            "attributes" => Some(match self.ringtone.attributes {
                Some(attrs) => format!("{:?}/{:?}", attrs.usage, attrs.content_type),
                None => "none".to_string(),
            }),
            "capabilities" => Some(format!("{:?}", self.capabilities).to_lowercase()),
            "play_duration_ms" => Some(self.play_duration_ms.to_string()),
            _ => None,
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "category",
            "looping",
            "attributes",
            "capabilities",
            "play_duration_ms",
        ]
    }
}
