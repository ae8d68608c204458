//! Ringtone playback lifecycle controller
//!
//! Owns at most one live playback handle. `play()` always tears down the
//! previous handle before creating a new one; `stop()` is idempotent and never
//! fails. Calls are serialized: each operation holds the state lock for its
//! whole duration, so overlapping callers observe a consistent `current`.

use crate::config::{ConfigError, RingtoneConfig};
use crate::platform::{HandleId, PlatformError, PlaybackEngine, SoundRegistry};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Caller-visible playback failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Failed to play default ringtone: {0}")]
    StartFailed(String),
}

/// Cleanup failure. Never leaves this module.
#[derive(Debug, Error)]
enum TeardownError {
    #[error("could not query playback state: {0}")]
    Query(PlatformError),
    #[error("could not stop playback: {0}")]
    Stop(PlatformError),
    #[error("could not release handle: {0}")]
    Release(PlatformError),
}

/// Result of a cleanup step whose failure is intentionally ignored.
/// Every value of this type ends up in `discard`.
type BestEffort = Result<(), TeardownError>;

fn discard(outcome: BestEffort) {
    if let Err(e) = outcome {
        tracing::warn!("Ignoring ringtone teardown failure: {}", e);
    }
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Playing => write!(f, "Playing"),
        }
    }
}

/// A started, fully configured playback resource
#[derive(Debug)]
struct SoundHandle {
    id: HandleId,
    sound_uri: String,
    looping: bool,
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct RingtoneController {
    registry: Arc<dyn SoundRegistry>,
    engine: Arc<dyn PlaybackEngine>,
    config: RingtoneConfig,
    current: Mutex<Option<SoundHandle>>,
}

impl RingtoneController {
    /// Create a controller with a validated config
    pub fn new(
        registry: Arc<dyn SoundRegistry>,
        engine: Arc<dyn PlaybackEngine>,
        config: RingtoneConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            registry,
            engine,
            config,
            current: Mutex::new(None),
        })
    }

    /// Create a controller that plays the looping default ringtone
    pub fn with_defaults(registry: Arc<dyn SoundRegistry>, engine: Arc<dyn PlaybackEngine>) -> Self {
        Self {
            registry,
            engine,
            config: RingtoneConfig::default(),
            current: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &RingtoneConfig {
        &self.config
    }

    pub async fn state(&self) -> PlaybackState {
        match *self.current.lock().await {
            Some(_) => PlaybackState::Playing,
            None => PlaybackState::Idle,
        }
    }

    /// Start the default sound, replacing whatever is playing.
    ///
    /// On error nothing is left playing and the next `play()` starts from a
    /// clean state.
    pub async fn play(&self) -> Result<(), PlaybackError> {
        let mut current = self.current.lock().await;

        let resolved = self.registry.default_sound_uri(self.config.category);

        // The old handle goes regardless of the lookup outcome
        if let Some(old) = current.take() {
            tracing::debug!("Replacing ringtone handle {}", old.id);
            discard(self.teardown(old));
        }

        let handle = resolved
            .and_then(|uri| self.start_handle(uri))
            .map_err(|e| {
                tracing::error!("Ringtone start failed: {}", e);
                PlaybackError::StartFailed(e.to_string())
            })?;

        tracing::info!(
            "Ringtone playing (handle {}, looping: {}, uri: {})",
            handle.id,
            handle.looping,
            handle.sound_uri
        );
        *current = Some(handle);
        Ok(())
    }

    /// Silence the current sound. Succeeds whether or not anything is playing.
    pub async fn stop(&self) -> Result<(), PlaybackError> {
        let mut current = self.current.lock().await;

        match current.take() {
            Some(handle) => {
                let id = handle.id;
                discard(self.teardown(handle));
                tracing::info!("Ringtone stopped (handle {})", id);
            }
            None => tracing::debug!("Ringtone stop requested while idle"),
        }

        Ok(())
    }

    // ------------------------------------------------------------------------
    // PLATFORM STEPS
    // ------------------------------------------------------------------------

    fn start_handle(&self, sound_uri: String) -> Result<SoundHandle, PlatformError> {
        let id = self.engine.create_handle(sound_uri.clone())?;
        let mut handle = SoundHandle {
            id,
            sound_uri,
            looping: false,
        };

        match self.configure_and_start(&mut handle) {
            Ok(()) => Ok(handle),
            Err(e) => {
                discard(self.teardown(handle));
                Err(e)
            }
        }
    }

    fn configure_and_start(&self, handle: &mut SoundHandle) -> Result<(), PlatformError> {
        let capabilities = self.engine.capabilities();

        if self.config.looping && capabilities.supports_looping {
            self.engine.set_looping(handle.id, true)?;
            handle.looping = true;
        }

        if let Some(attributes) = self.config.attributes {
            if capabilities.supports_audio_attributes {
                self.engine.set_audio_attributes(handle.id, attributes)?;
            }
        }

        tracing::debug!("Starting ringtone handle {}", handle.id);
        self.engine.start(handle.id)
    }

    /// Stop if playing, then release. Release is attempted even when stopping
    /// failed; the first failure is reported.
    fn teardown(&self, handle: SoundHandle) -> BestEffort {
        let stopped = match self.engine.is_playing(handle.id) {
            Ok(true) => self.engine.stop(handle.id).map_err(TeardownError::Stop),
            Ok(false) => Ok(()),
            Err(e) => Err(TeardownError::Query(e)),
        };
        let released = self
            .engine
            .release(handle.id)
            .map_err(TeardownError::Release);

        stopped.and(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{
        AudioAttributes, MockPlaybackEngine, MockSoundRegistry, PlatformCapabilities,
        SoundCategory,
    };
    use mockall::predicate::eq;
    use mockall::Sequence;

    const URI: &str = "content://settings/system/ringtone";

    fn registry_ok() -> MockSoundRegistry {
        let mut registry = MockSoundRegistry::new();
        registry
            .expect_default_sound_uri()
            .returning(|_| Ok(URI.to_string()));
        registry
    }

    fn controller(registry: MockSoundRegistry, engine: MockPlaybackEngine) -> RingtoneController {
        RingtoneController::with_defaults(Arc::new(registry), Arc::new(engine))
    }

    #[tokio::test]
    async fn test_play_configures_before_start() {
        let mut engine = MockPlaybackEngine::new();
        let mut seq = Sequence::new();

        engine
            .expect_capabilities()
            .return_const(PlatformCapabilities::full());
        engine
            .expect_create_handle()
            .with(eq(URI.to_string()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(7));
        engine
            .expect_set_looping()
            .with(eq(7), eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        engine
            .expect_set_audio_attributes()
            .with(eq(7), eq(AudioAttributes::ringtone()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        engine
            .expect_start()
            .with(eq(7))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let ctl = controller(registry_ok(), engine);
        assert!(ctl.play().await.is_ok());
        assert_eq!(ctl.state().await, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_unsupported_capabilities_skipped() {
        let mut engine = MockPlaybackEngine::new();
        engine
            .expect_capabilities()
            .return_const(PlatformCapabilities::none());
        engine.expect_create_handle().returning(|_| Ok(1));
        engine.expect_set_looping().never();
        engine.expect_set_audio_attributes().never();
        engine.expect_start().times(1).returning(|_| Ok(()));

        let ctl = controller(registry_ok(), engine);
        assert!(ctl.play().await.is_ok());
    }

    #[tokio::test]
    async fn test_old_handle_torn_down_before_new_created() {
        let mut engine = MockPlaybackEngine::new();
        let mut seq = Sequence::new();

        engine
            .expect_capabilities()
            .return_const(PlatformCapabilities::none());

        engine
            .expect_create_handle()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(1));
        engine
            .expect_start()
            .with(eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        engine
            .expect_is_playing()
            .with(eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        engine
            .expect_stop()
            .with(eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        engine
            .expect_release()
            .with(eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        engine
            .expect_create_handle()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(2));
        engine
            .expect_start()
            .with(eq(2))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let ctl = controller(registry_ok(), engine);
        ctl.play().await.unwrap();
        ctl.play().await.unwrap();
        assert_eq!(ctl.state().await, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_start_failure_releases_new_handle() {
        let mut engine = MockPlaybackEngine::new();
        engine
            .expect_capabilities()
            .return_const(PlatformCapabilities::none());
        engine.expect_create_handle().returning(|_| Ok(3));
        engine.expect_start().returning(|_| {
            Err(PlatformError::PermissionDenied {
                reason: "audio focus denied".to_string(),
            })
        });
        engine.expect_is_playing().returning(|_| Ok(false));
        engine.expect_stop().never();
        engine
            .expect_release()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(()));

        let ctl = controller(registry_ok(), engine);
        let err = ctl.play().await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to play default ringtone: Permission denied: audio focus denied"
        );
        assert_eq!(ctl.state().await, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_configure_failure_is_start_failure() {
        let mut engine = MockPlaybackEngine::new();
        engine
            .expect_capabilities()
            .return_const(PlatformCapabilities::full());
        engine.expect_create_handle().returning(|_| Ok(4));
        engine.expect_set_looping().returning(|_, _| {
            Err(PlatformError::Internal {
                reason: "setLooping threw".to_string(),
            })
        });
        engine.expect_start().never();
        engine.expect_is_playing().returning(|_| Ok(false));
        engine.expect_release().times(1).returning(|_| Ok(()));

        let ctl = controller(registry_ok(), engine);
        assert!(matches!(
            ctl.play().await,
            Err(PlaybackError::StartFailed(_))
        ));
        assert_eq!(ctl.state().await, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_lookup_failure_still_clears_active_handle() {
        let mut registry = MockSoundRegistry::new();
        let mut lookups = Sequence::new();
        registry
            .expect_default_sound_uri()
            .with(eq(SoundCategory::Ringtone))
            .times(1)
            .in_sequence(&mut lookups)
            .returning(|_| Ok(URI.to_string()));
        registry
            .expect_default_sound_uri()
            .times(1)
            .in_sequence(&mut lookups)
            .returning(|_| {
                Err(PlatformError::Unavailable {
                    reason: "no ringtone set".to_string(),
                })
            });

        let mut engine = MockPlaybackEngine::new();
        engine
            .expect_capabilities()
            .return_const(PlatformCapabilities::none());
        engine.expect_create_handle().times(1).returning(|_| Ok(5));
        engine.expect_start().times(1).returning(|_| Ok(()));
        engine.expect_is_playing().returning(|_| Ok(true));
        engine.expect_stop().with(eq(5)).times(1).returning(|_| Ok(()));
        engine.expect_release().with(eq(5)).times(1).returning(|_| Ok(()));

        let ctl = controller(registry, engine);
        ctl.play().await.unwrap();

        let err = ctl.play().await.unwrap_err();
        assert_eq!(
            err,
            PlaybackError::StartFailed("Sound unavailable: no ringtone set".to_string())
        );
        assert_eq!(ctl.state().await, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_stop_releases_even_when_stop_fails() {
        let mut engine = MockPlaybackEngine::new();
        engine
            .expect_capabilities()
            .return_const(PlatformCapabilities::none());
        engine.expect_create_handle().returning(|_| Ok(6));
        engine.expect_start().returning(|_| Ok(()));
        engine.expect_is_playing().returning(|_| Ok(true));
        engine.expect_stop().times(1).returning(|_| {
            Err(PlatformError::Internal {
                reason: "IllegalStateException".to_string(),
            })
        });
        engine
            .expect_release()
            .with(eq(6))
            .times(1)
            .returning(|_| Ok(()));

        let ctl = controller(registry_ok(), engine);
        ctl.play().await.unwrap();

        assert!(ctl.stop().await.is_ok());
        assert_eq!(ctl.state().await, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_stop_when_state_query_fails() {
        let mut engine = MockPlaybackEngine::new();
        engine
            .expect_capabilities()
            .return_const(PlatformCapabilities::none());
        engine.expect_create_handle().returning(|_| Ok(8));
        engine.expect_start().returning(|_| Ok(()));
        engine.expect_is_playing().returning(|_| {
            Err(PlatformError::Internal {
                reason: "dead object".to_string(),
            })
        });
        engine.expect_stop().never();
        engine.expect_release().times(1).returning(|_| Ok(()));

        let ctl = controller(registry_ok(), engine);
        ctl.play().await.unwrap();

        assert!(ctl.stop().await.is_ok());
        assert_eq!(ctl.state().await, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_stop_idle_touches_nothing() {
        let registry = MockSoundRegistry::new();
        let engine = MockPlaybackEngine::new();

        let ctl = controller(registry, engine);
        assert!(ctl.stop().await.is_ok());
        assert_eq!(ctl.state().await, PlaybackState::Idle);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RingtoneConfig {
            category: SoundCategory::Alarm,
            ..Default::default()
        };
        let result = RingtoneController::new(
            Arc::new(MockSoundRegistry::new()),
            Arc::new(MockPlaybackEngine::new()),
            config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_teardown_reports_first_failure() {
        let mut engine = MockPlaybackEngine::new();
        engine.expect_is_playing().returning(|_| Ok(true));
        engine.expect_stop().returning(|_| {
            Err(PlatformError::Rejected {
                reason: "stop".to_string(),
            })
        });
        engine.expect_release().times(1).returning(|_| {
            Err(PlatformError::Rejected {
                reason: "release".to_string(),
            })
        });

        let ctl = controller(MockSoundRegistry::new(), engine);
        let outcome = ctl.teardown(SoundHandle {
            id: 9,
            sound_uri: URI.to_string(),
            looping: false,
        });

        assert!(matches!(outcome, Err(TeardownError::Stop(_))));
    }
}
