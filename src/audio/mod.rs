pub mod ambience;
#[cfg(feature = "rodio")]
pub mod device;
#[cfg(feature = "rodio")]
pub mod rodio_backend;
pub mod silent;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use self::ambience::{AmbientAudio, AmbientAudioProvider, AmbientSnapshot, PlaybackState};
#[cfg(feature = "rodio")]
pub use self::rodio_backend::RodioBackend;
pub use self::silent::SilentBackend;

/// What a handle is bound to: a fixed source, loop flag and volume.
///
/// Volume is clamped to 0.0-1.0, including when read from config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSoundSpec")]
pub struct SoundSpec {
    pub source: String,
    pub looping: bool,
    pub volume: f32,
}

#[derive(Deserialize)]
struct RawSoundSpec {
    source: String,
    looping: bool,
    volume: f32,
}

impl From<RawSoundSpec> for SoundSpec {
    fn from(raw: RawSoundSpec) -> Self {
        Self::new(raw.source, raw.looping, raw.volume)
    }
}

impl SoundSpec {
    pub fn new(source: impl Into<String>, looping: bool, volume: f32) -> Self {
        Self {
            source: source.into(),
            looping,
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

/// Where a handle is in its asynchronous load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
    Unloaded,
}

/// One loadable, playable, loopable track.
///
/// Commands never fail. While the handle is still `Loading` the latest
/// play/stop intent is remembered and applied once the load completes;
/// after `unload` every command is a no-op.
pub trait SoundHandle: Send {
    fn play(&mut self);

    /// Stops playback and rewinds to the start.
    fn stop(&mut self);

    /// Releases the underlying audio resources.
    fn unload(&mut self);

    /// Requested playback state. Always false once failed or unloaded.
    fn is_playing(&self) -> bool;

    fn load_state(&self) -> LoadState;
}

/// The playback library: turns a [`SoundSpec`] into a handle.
///
/// Loading is started here but not awaited.
pub trait AudioBackend: Send + Sync {
    fn load(&self, spec: &SoundSpec) -> Box<dyn SoundHandle>;
}

impl<B: AudioBackend + ?Sized> AudioBackend for Arc<B> {
    fn load(&self, spec: &SoundSpec) -> Box<dyn SoundHandle> {
        (**self).load(spec)
    }
}

/// Opens the default output device, falling back to silent handles when
/// there is no device (headless machines, CI).
#[cfg(feature = "rodio")]
pub fn backend_or_silent() -> Arc<dyn AudioBackend> {
    match RodioBackend::open_default() {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            tracing::warn!(target: "audio", error = %e, "no output device, ambience will be silent");
            Arc::new(SilentBackend::new())
        }
    }
}
