// Ringer Core — system ringtone control
//
// One controller, at most one live sound handle. Platform audio services are
// reached only through the `platform` traits so the same core runs behind the
// Android/iOS bridge, the desktop harness and the tests.

pub mod config;
pub mod controller;
pub mod platform;

// Mobile bridge module
pub mod mobile_bridge;

pub use config::{ConfigError, RingtoneConfig};
pub use controller::{PlaybackError, PlaybackState, RingtoneController};
pub use platform::{
    AudioAttributes, AudioContentType, AudioUsage, HandleId, PlatformCapabilities, PlatformError,
    PlaybackEngine, SoundCategory, SoundRegistry,
};

// Mobile bridge exports for UniFFI
pub use mobile_bridge::*;

// UniFFI scaffolding - clippy warnings in generated code
uniffi::include_scaffolding!("api");
