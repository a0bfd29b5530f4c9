use rodio::Sink;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use super::device::AudioDevice;
use super::{AudioBackend, LoadState, SoundHandle, SoundSpec};
use crate::asset_loader::{decode_audio, load_local_audio, DecodedTrack};
use crate::error::{AmbientError, Result};

/// Playback library backed by rodio sinks on the default output device.
pub struct RodioBackend {
    device: Arc<AudioDevice>,
}

impl RodioBackend {
    pub fn open_default() -> Result<Self> {
        Ok(Self::with_device(Arc::new(AudioDevice::open_default()?)))
    }

    pub fn with_device(device: Arc<AudioDevice>) -> Self {
        Self { device }
    }
}

enum Phase {
    Loading,
    Ready { sink: Sink, track: DecodedTrack },
    Failed,
    Unloaded,
}

struct Shared {
    phase: Phase,
    wants_playing: bool,
    // The ready sink sits paused at the first frame
    rewound: bool,
}

impl Shared {
    fn play(&mut self) {
        match &self.phase {
            Phase::Loading => {}
            Phase::Ready { sink, .. } => sink.play(),
            Phase::Failed | Phase::Unloaded => return,
        }
        self.wants_playing = true;
        self.rewound = false;
    }

    /// Pauses and rewinds. A sink that is already at the start is left alone,
    /// so stopping an idle track costs nothing.
    fn stop(&mut self, source: &str, requeue: impl FnOnce(&DecodedTrack) -> Result<Sink>) {
        self.wants_playing = false;
        let Phase::Ready { sink, track } = &mut self.phase else {
            return;
        };
        if self.rewound {
            return;
        }
        // Re-queue rather than Sink::try_seek, which waits on the audio thread
        sink.stop();
        match requeue(track) {
            Ok(fresh) => {
                *sink = fresh;
                self.rewound = true;
            }
            Err(e) => {
                tracing::warn!(target: "audio", source, error = %e, "could not re-queue track");
                self.phase = Phase::Failed;
            }
        }
    }
}

type SharedState = Arc<Mutex<Shared>>;

fn lock(state: &SharedState) -> MutexGuard<'_, Shared> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A paused sink with the whole track queued from the start.
fn new_sink(device: &AudioDevice, track: &DecodedTrack, spec: &SoundSpec) -> Result<Sink> {
    let sink = Sink::try_new(device.handle()).map_err(|e| AmbientError::Sink(e.to_string()))?;
    sink.pause();
    sink.set_volume(spec.volume);
    sink.append(track.source(spec.looping));
    Ok(sink)
}

impl AudioBackend for RodioBackend {
    fn load(&self, spec: &SoundSpec) -> Box<dyn SoundHandle> {
        let state = Arc::new(Mutex::new(Shared {
            phase: Phase::Loading,
            wants_playing: false,
            rewound: true,
        }));

        let loader_state = state.clone();
        let device = self.device.clone();
        let loader_spec = spec.clone();
        let spawned = thread::Builder::new()
            .name(format!("ambient-load-{}", spec.source))
            .spawn(move || {
                let spec = loader_spec;
                let loaded = load_local_audio(&spec.source)
                    .and_then(|data| decode_audio(&spec.source, data))
                    .and_then(|track| new_sink(&device, &track, &spec).map(|sink| (sink, track)));

                let mut shared = lock(&loader_state);
                if matches!(shared.phase, Phase::Unloaded) {
                    return;
                }
                match loaded {
                    Ok((sink, track)) => {
                        if shared.wants_playing {
                            sink.play();
                        }
                        shared.rewound = !shared.wants_playing;
                        shared.phase = Phase::Ready { sink, track };
                        tracing::debug!(target: "audio", source = %spec.source, "track ready");
                    }
                    Err(e) => {
                        tracing::warn!(target: "audio", source = %spec.source, error = %e, "track failed to load");
                        shared.phase = Phase::Failed;
                    }
                }
            });

        if let Err(e) = spawned {
            tracing::warn!(target: "audio", source = %spec.source, error = %e, "could not start loader");
            lock(&state).phase = Phase::Failed;
        }

        Box::new(RodioHandle {
            state,
            device: self.device.clone(),
            spec: spec.clone(),
        })
    }
}

struct RodioHandle {
    state: SharedState,
    device: Arc<AudioDevice>,
    spec: SoundSpec,
}

impl SoundHandle for RodioHandle {
    fn play(&mut self) {
        lock(&self.state).play();
    }

    fn stop(&mut self) {
        let (device, spec) = (&self.device, &self.spec);
        lock(&self.state).stop(&spec.source, |track| new_sink(device, track, spec));
    }

    fn unload(&mut self) {
        let mut shared = lock(&self.state);
        shared.wants_playing = false;
        shared.phase = Phase::Unloaded;
    }

    fn is_playing(&self) -> bool {
        let shared = lock(&self.state);
        shared.wants_playing
            && match &shared.phase {
                Phase::Loading => true,
                Phase::Ready { sink, .. } => !sink.empty(),
                Phase::Failed | Phase::Unloaded => false,
            }
    }

    fn load_state(&self) -> LoadState {
        match lock(&self.state).phase {
            Phase::Loading => LoadState::Loading,
            Phase::Ready { .. } => LoadState::Ready,
            Phase::Failed => LoadState::Failed,
            Phase::Unloaded => LoadState::Unloaded,
        }
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.unload();
    }
}
