use super::{AudioBackend, LoadState, SoundHandle, SoundSpec};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Bookkeeping for one silent track.
#[derive(Debug, Clone, PartialEq)]
pub struct SilentTrack {
    pub source: String,
    pub load_state: LoadState,
    pub wants_playing: bool,
    /// Number of times the track actually started (loaded and asked to play).
    pub starts: u32,
}

impl SilentTrack {
    pub fn is_playing(&self) -> bool {
        self.wants_playing && matches!(self.load_state, LoadState::Loading | LoadState::Ready)
    }
}

type SharedTrack = Arc<Mutex<SilentTrack>>;

fn lock(track: &SharedTrack) -> MutexGuard<'_, SilentTrack> {
    track.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Backend with no output device.
///
/// Handles follow the same load/intent rules as the rodio backend but make
/// no sound. By default loads complete immediately; [`SilentBackend::deferred`]
/// keeps them `Loading` until [`finish_loading`](SilentBackend::finish_loading)
/// or [`fail_loading`](SilentBackend::fail_loading) is called.
#[derive(Default)]
pub struct SilentBackend {
    defer_loads: bool,
    tracks: Mutex<Vec<SharedTrack>>,
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deferred() -> Self {
        Self {
            defer_loads: true,
            tracks: Mutex::new(Vec::new()),
        }
    }

    /// State of the most recently loaded track for `source`.
    pub fn track(&self, source: &str) -> Option<SilentTrack> {
        let tracks = self.tracks.lock().unwrap_or_else(PoisonError::into_inner);
        tracks
            .iter()
            .rev()
            .map(lock)
            .find(|t| t.source == source)
            .map(|t| t.clone())
    }

    /// Completes every pending load, starting the tracks that were asked to play.
    pub fn finish_loading(&self) {
        self.settle(LoadState::Ready);
    }

    /// Fails every pending load.
    pub fn fail_loading(&self) {
        self.settle(LoadState::Failed);
    }

    fn settle(&self, outcome: LoadState) {
        let tracks = self.tracks.lock().unwrap_or_else(PoisonError::into_inner);
        for shared in tracks.iter() {
            let mut track = lock(shared);
            if track.load_state != LoadState::Loading {
                continue;
            }
            track.load_state = outcome;
            if outcome == LoadState::Ready && track.wants_playing {
                track.starts += 1;
            }
        }
    }
}

impl AudioBackend for SilentBackend {
    fn load(&self, spec: &SoundSpec) -> Box<dyn SoundHandle> {
        let track = Arc::new(Mutex::new(SilentTrack {
            source: spec.source.clone(),
            load_state: if self.defer_loads {
                LoadState::Loading
            } else {
                LoadState::Ready
            },
            wants_playing: false,
            starts: 0,
        }));
        self.tracks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(track.clone());
        Box::new(SilentHandle(track))
    }
}

struct SilentHandle(SharedTrack);

impl SoundHandle for SilentHandle {
    fn play(&mut self) {
        let mut track = lock(&self.0);
        match track.load_state {
            LoadState::Ready => {
                if !track.wants_playing {
                    track.starts += 1;
                }
                track.wants_playing = true;
            }
            LoadState::Loading => track.wants_playing = true,
            LoadState::Failed | LoadState::Unloaded => {}
        }
    }

    fn stop(&mut self) {
        lock(&self.0).wants_playing = false;
    }

    fn unload(&mut self) {
        let mut track = lock(&self.0);
        track.wants_playing = false;
        track.load_state = LoadState::Unloaded;
    }

    fn is_playing(&self) -> bool {
        lock(&self.0).is_playing()
    }

    fn load_state(&self) -> LoadState {
        lock(&self.0).load_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(source: &str) -> SoundSpec {
        SoundSpec::new(source, true, 0.4)
    }

    #[test]
    fn immediate_handles_play_and_stop() {
        let backend = SilentBackend::new();
        let mut handle = backend.load(&spec("day"));
        assert_eq!(handle.load_state(), LoadState::Ready);

        handle.play();
        handle.play();
        assert!(handle.is_playing());
        assert_eq!(backend.track("day").unwrap().starts, 1);

        handle.stop();
        assert!(!handle.is_playing());
    }

    #[test]
    fn deferred_load_applies_latest_intent() {
        let backend = SilentBackend::deferred();
        let mut day = backend.load(&spec("day"));
        let mut night = backend.load(&spec("night"));

        day.play();
        night.play();
        night.stop();
        assert_eq!(backend.track("day").unwrap().starts, 0);

        backend.finish_loading();
        assert_eq!(day.load_state(), LoadState::Ready);
        assert!(day.is_playing());
        assert!(!night.is_playing());
        assert_eq!(backend.track("day").unwrap().starts, 1);
        assert_eq!(backend.track("night").unwrap().starts, 0);
    }

    #[test]
    fn failed_load_stays_silent() {
        let backend = SilentBackend::deferred();
        let mut handle = backend.load(&spec("day"));
        handle.play();
        backend.fail_loading();

        assert_eq!(handle.load_state(), LoadState::Failed);
        assert!(!handle.is_playing());
        handle.play();
        assert!(!handle.is_playing());
    }

    #[test]
    fn unloaded_handle_ignores_commands() {
        let backend = SilentBackend::new();
        let mut handle = backend.load(&spec("night"));
        handle.play();
        handle.unload();
        handle.play();

        assert!(!handle.is_playing());
        assert_eq!(handle.load_state(), LoadState::Unloaded);
        assert_eq!(backend.track("night").unwrap().load_state, LoadState::Unloaded);
    }
}
