// Mobile bridge types for UniFFI bindings
//
// `SystemSound` is the object declared in api.udl. Android/iOS code creates one
// per application, passing its sound registry and playback engine, and keeps
// it for the app's lifetime.

use crate::config::RingtoneConfig;
use crate::controller::{PlaybackError, RingtoneController};
use crate::platform::{PlaybackEngine, SoundRegistry};
use std::sync::Arc;
use thiserror::Error;

/// Error code carried by every rejected bridge call
pub const ERROR_CODE: &str = "ERROR";

/// Error code for a config rejected at construction
pub const INVALID_CONFIG_CODE: &str = "INVALID_CONFIG";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SystemSoundError {
    #[error("{code}: {message}")]
    Rejected { code: String, message: String },
}

impl From<PlaybackError> for SystemSoundError {
    fn from(err: PlaybackError) -> Self {
        SystemSoundError::Rejected {
            code: ERROR_CODE.to_string(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// SYSTEM SOUND
// ============================================================================

pub struct SystemSound {
    controller: RingtoneController,
}

impl SystemSound {
    /// Bridge with the default looping ringtone config
    pub fn new(registry: Box<dyn SoundRegistry>, engine: Box<dyn PlaybackEngine>) -> Self {
        init_tracing();

        Self {
            controller: RingtoneController::with_defaults(Arc::from(registry), Arc::from(engine)),
        }
    }

    pub fn with_config(
        registry: Box<dyn SoundRegistry>,
        engine: Box<dyn PlaybackEngine>,
        config: RingtoneConfig,
    ) -> Result<Self, SystemSoundError> {
        init_tracing();

        let controller = RingtoneController::new(Arc::from(registry), Arc::from(engine), config)
            .map_err(|e| {
                tracing::error!("Rejected ringtone config: {}", e);
                SystemSoundError::Rejected {
                    code: INVALID_CONFIG_CODE.to_string(),
                    message: e.to_string(),
                }
            })?;

        Ok(Self { controller })
    }

    /// Resolves `true` once the default ringtone is playing
    pub async fn play_default_ringtone(&self) -> Result<bool, SystemSoundError> {
        self.controller.play().await?;
        Ok(true)
    }

    /// Resolves `true` once cleanup has been attempted
    pub async fn stop_ringtone(&self) -> Result<bool, SystemSoundError> {
        self.controller.stop().await?;
        Ok(true)
    }

    /// Controller for Rust-side hosts sharing this bridge
    pub fn controller(&self) -> &RingtoneController {
        &self.controller
    }
}

fn init_tracing() {
    // Initialize tracing (idempotent)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
