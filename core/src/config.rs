//! Ringtone playback configuration
//!
//! In-memory only: hosts build a `RingtoneConfig` (or deserialize one they
//! own) and hand it to the controller at construction time.

use crate::platform::{AudioAttributes, AudioUsage, SoundCategory};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors that can occur during config validation
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Inconsistent audio attributes: {usage:?} usage for {category} sound")]
    InconsistentAttributes {
        category: SoundCategory,
        usage: AudioUsage,
    },
}

// ============================================================================
// RINGTONE CONFIG
// ============================================================================

/// What `play()` resolves and how the handle is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingtoneConfig {
    /// System default sound to resolve
    pub category: SoundCategory,

    /// Request continuous playback when the engine supports it
    pub looping: bool,

    /// Attribute tag applied when the engine supports tagging.
    /// None skips tagging entirely.
    pub attributes: Option<AudioAttributes>,
}

impl RingtoneConfig {
    /// Validate config
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(attributes) = self.attributes else {
            return Ok(());
        };

        // Alarm sounds route through the alarm stream, ringtones never do
        let consistent = match self.category {
            SoundCategory::Alarm => attributes.usage == AudioUsage::Alarm,
            SoundCategory::Ringtone | SoundCategory::Notification => {
                attributes.usage != AudioUsage::Alarm
            }
        };

        if !consistent {
            return Err(ConfigError::InconsistentAttributes {
                category: self.category,
                usage: attributes.usage,
            });
        }

        Ok(())
    }
}

impl Default for RingtoneConfig {
    fn default() -> Self {
        Self {
            category: SoundCategory::Ringtone,
            looping: true,
            attributes: Some(AudioAttributes::ringtone()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
