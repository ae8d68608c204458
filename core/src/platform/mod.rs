//! Platform collaborators consumed by the ringtone controller
//!
//! Host code (Android/iOS via UniFFI callback interfaces, or the simulated
//! platform on desktop) implements:
//! - `SoundRegistry` to resolve the default sound for a category
//! - `PlaybackEngine` to create, configure, start, stop and release handles
//!
//! Optional engine features are reported through `PlatformCapabilities`
//! instead of platform version numbers.

pub mod simulated;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use simulated::{PlatformCall, SimulatedHandle, SimulatedPlatform};

/// Engine-issued identifier of one playback resource.
pub type HandleId = u64;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors reported by platform collaborators
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformError {
    #[error("Sound unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Rejected by playback engine: {reason}")]
    Rejected { reason: String },

    #[error("Internal platform error: {reason}")]
    Internal { reason: String },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for PlatformError {
    fn from(err: uniffi::UnexpectedUniFFICallbackError) -> Self {
        PlatformError::Internal { reason: err.reason }
    }
}

// ============================================================================
// ENUMS & TYPES
// ============================================================================

/// Which system default sound to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SoundCategory {
    #[default]
    Ringtone,
    Notification,
    Alarm,
}

impl std::fmt::Display for SoundCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ringtone => write!(f, "Ringtone"),
            Self::Notification => write!(f, "Notification"),
            Self::Alarm => write!(f, "Alarm"),
        }
    }
}

/// Routing hint for the OS audio subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioUsage {
    NotificationRingtone,
    Notification,
    Alarm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioContentType {
    Sonification,
    Music,
    Speech,
}

/// Audio attribute tag applied to a handle before playback starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAttributes {
    pub usage: AudioUsage,
    pub content_type: AudioContentType,
}

impl AudioAttributes {
    /// Ringtone usage with sonification content, the tag used for incoming calls.
    pub fn ringtone() -> Self {
        Self {
            usage: AudioUsage::NotificationRingtone,
            content_type: AudioContentType::Sonification,
        }
    }
}

impl Default for AudioAttributes {
    fn default() -> Self {
        Self::ringtone()
    }
}

/// Optional playback-engine features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCapabilities {
    /// Handle can repeat playback continuously
    pub supports_looping: bool,
    /// Handle accepts usage/content-type attribute tags
    pub supports_audio_attributes: bool,
}

impl PlatformCapabilities {
    /// Every optional feature available
    pub fn full() -> Self {
        Self {
            supports_looping: true,
            supports_audio_attributes: true,
        }
    }

    /// Attribute tagging without looping (older engines)
    pub fn legacy() -> Self {
        Self {
            supports_looping: false,
            supports_audio_attributes: true,
        }
    }

    /// Plain start/stop only
    pub fn none() -> Self {
        Self {
            supports_looping: false,
            supports_audio_attributes: false,
        }
    }
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

// ============================================================================
// COLLABORATOR TRAITS
// ============================================================================

/// Resolves playable system sound references
#[cfg_attr(test, mockall::automock)]
pub trait SoundRegistry: Send + Sync {
    /// Return the URI of the platform default sound for `category`
    fn default_sound_uri(&self, category: SoundCategory) -> Result<String, PlatformError>;
}

/// Creates and drives playback handles
#[cfg_attr(test, mockall::automock)]
pub trait PlaybackEngine: Send + Sync {
    fn capabilities(&self) -> PlatformCapabilities;

    /// Allocate a handle bound to `sound_uri`. The handle is not playing yet.
    fn create_handle(&self, sound_uri: String) -> Result<HandleId, PlatformError>;

    fn set_looping(&self, handle: HandleId, looping: bool) -> Result<(), PlatformError>;

    fn set_audio_attributes(
        &self,
        handle: HandleId,
        attributes: AudioAttributes,
    ) -> Result<(), PlatformError>;

    fn start(&self, handle: HandleId) -> Result<(), PlatformError>;

    fn is_playing(&self, handle: HandleId) -> Result<bool, PlatformError>;

    fn stop(&self, handle: HandleId) -> Result<(), PlatformError>;

    /// Free the underlying resource. The id is invalid afterwards.
    fn release(&self, handle: HandleId) -> Result<(), PlatformError>;
}
