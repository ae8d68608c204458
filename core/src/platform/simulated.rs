//! In-memory platform used by tests and the desktop harness
//!
//! Issues handle ids, tracks every live handle and records each collaborator
//! call in order. Individual operations can be made to fail to exercise the
//! controller's error paths.

use super::{
    AudioAttributes, HandleId, PlatformCapabilities, PlatformError, PlaybackEngine, SoundCategory,
    SoundRegistry,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One recorded collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Lookup(SoundCategory),
    Create(String),
    SetLooping(HandleId, bool),
    SetAttributes(HandleId, AudioAttributes),
    Start(HandleId),
    IsPlaying(HandleId),
    Stop(HandleId),
    Release(HandleId),
}

/// State of a live simulated handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedHandle {
    pub sound_uri: String,
    pub looping: bool,
    pub attributes: Option<AudioAttributes>,
    pub playing: bool,
}

#[derive(Debug, Default)]
struct Faults {
    lookup: bool,
    create: bool,
    configure: bool,
    start: bool,
    stop: bool,
    release: bool,
}

#[derive(Debug)]
struct SimState {
    capabilities: PlatformCapabilities,
    next_id: HandleId,
    handles: BTreeMap<HandleId, SimulatedHandle>,
    calls: Vec<PlatformCall>,
    faults: Faults,
}

/// Cheaply cloneable simulated `SoundRegistry` + `PlaybackEngine`
#[derive(Debug, Clone)]
pub struct SimulatedPlatform {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedPlatform {
    pub fn new(capabilities: PlatformCapabilities) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                capabilities,
                next_id: 1,
                handles: BTreeMap::new(),
                calls: Vec::new(),
                faults: Faults::default(),
            })),
        }
    }

    /// URI the simulated registry returns for `category`
    pub fn uri_for(category: SoundCategory) -> String {
        match category {
            SoundCategory::Ringtone => "content://settings/system/ringtone".to_string(),
            SoundCategory::Notification => {
                "content://settings/system/notification_sound".to_string()
            }
            SoundCategory::Alarm => "content://settings/system/alarm_alert".to_string(),
        }
    }

    // ------------------------------------------------------------------------
    // FAULT INJECTION
    // ------------------------------------------------------------------------

    pub fn fail_lookup(&self, fail: bool) {
        self.state.lock().faults.lookup = fail;
    }

    pub fn fail_create(&self, fail: bool) {
        self.state.lock().faults.create = fail;
    }

    /// Fail `set_looping` and `set_audio_attributes`
    pub fn fail_configure(&self, fail: bool) {
        self.state.lock().faults.configure = fail;
    }

    pub fn fail_start(&self, fail: bool) {
        self.state.lock().faults.start = fail;
    }

    /// `stop` raises but leaves the handle playing
    pub fn fail_stop(&self, fail: bool) {
        self.state.lock().faults.stop = fail;
    }

    /// `release` raises but still frees the handle, like an engine that
    /// throws after tearing down its native resource
    pub fn fail_release(&self, fail: bool) {
        self.state.lock().faults.release = fail;
    }

    // ------------------------------------------------------------------------
    // INSPECTION
    // ------------------------------------------------------------------------

    /// Ids of all handles that have not been released
    pub fn live_handles(&self) -> Vec<HandleId> {
        self.state.lock().handles.keys().copied().collect()
    }

    pub fn handle(&self, id: HandleId) -> Option<SimulatedHandle> {
        self.state.lock().handles.get(&id).cloned()
    }

    /// Number of live handles currently producing sound
    pub fn playing_count(&self) -> usize {
        self.state
            .lock()
            .handles
            .values()
            .filter(|h| h.playing)
            .count()
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new(PlatformCapabilities::full())
    }
}

fn unknown_handle(id: HandleId) -> PlatformError {
    PlatformError::Internal {
        reason: format!("handle {} already released", id),
    }
}

impl SoundRegistry for SimulatedPlatform {
    fn default_sound_uri(&self, category: SoundCategory) -> Result<String, PlatformError> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::Lookup(category));

        if state.faults.lookup {
            return Err(PlatformError::Unavailable {
                reason: format!("no default {} sound configured", category),
            });
        }

        Ok(Self::uri_for(category))
    }
}

impl PlaybackEngine for SimulatedPlatform {
    fn capabilities(&self) -> PlatformCapabilities {
        self.state.lock().capabilities
    }

    fn create_handle(&self, sound_uri: String) -> Result<HandleId, PlatformError> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::Create(sound_uri.clone()));

        if state.faults.create {
            return Err(PlatformError::Unavailable {
                reason: format!("cannot open {}", sound_uri),
            });
        }

        let id = state.next_id;
        state.next_id += 1;
        state.handles.insert(
            id,
            SimulatedHandle {
                sound_uri,
                looping: false,
                attributes: None,
                playing: false,
            },
        );
        Ok(id)
    }

    fn set_looping(&self, handle: HandleId, looping: bool) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::SetLooping(handle, looping));

        if !state.capabilities.supports_looping || state.faults.configure {
            return Err(PlatformError::Rejected {
                reason: "looping not supported".to_string(),
            });
        }

        let entry = state
            .handles
            .get_mut(&handle)
            .ok_or_else(|| unknown_handle(handle))?;
        entry.looping = looping;
        Ok(())
    }

    fn set_audio_attributes(
        &self,
        handle: HandleId,
        attributes: AudioAttributes,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(PlatformCall::SetAttributes(handle, attributes));

        if !state.capabilities.supports_audio_attributes || state.faults.configure {
            return Err(PlatformError::Rejected {
                reason: "audio attributes not supported".to_string(),
            });
        }

        let entry = state
            .handles
            .get_mut(&handle)
            .ok_or_else(|| unknown_handle(handle))?;
        entry.attributes = Some(attributes);
        Ok(())
    }

    fn start(&self, handle: HandleId) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::Start(handle));

        if state.faults.start {
            return Err(PlatformError::PermissionDenied {
                reason: "audio focus not granted".to_string(),
            });
        }

        let entry = state
            .handles
            .get_mut(&handle)
            .ok_or_else(|| unknown_handle(handle))?;
        entry.playing = true;
        Ok(())
    }

    fn is_playing(&self, handle: HandleId) -> Result<bool, PlatformError> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::IsPlaying(handle));

        state
            .handles
            .get(&handle)
            .map(|h| h.playing)
            .ok_or_else(|| unknown_handle(handle))
    }

    fn stop(&self, handle: HandleId) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::Stop(handle));

        if state.faults.stop {
            return Err(PlatformError::Internal {
                reason: "stop raised".to_string(),
            });
        }

        let entry = state
            .handles
            .get_mut(&handle)
            .ok_or_else(|| unknown_handle(handle))?;
        entry.playing = false;
        Ok(())
    }

    fn release(&self, handle: HandleId) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::Release(handle));

        if state.handles.remove(&handle).is_none() {
            return Err(unknown_handle(handle));
        }

        if state.faults.release {
            return Err(PlatformError::Internal {
                reason: "release raised".to_string(),
            });
        }
        Ok(())
    }
}
