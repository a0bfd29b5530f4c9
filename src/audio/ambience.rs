use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::{AudioBackend, SoundHandle};
use crate::config::AmbientConfig;
use crate::state::{Signal, SignalStore, Subscription};

/// Which track the controller considers selected.
///
/// Only ever moves from `None` to `Day`/`Night`; stopping keeps the last
/// selection so it can be resumed on unmute.
#[derive(Clone, Copy, PartialEq, Debug, Eq, Hash, Default, Serialize)]
pub enum PlaybackState {
    #[default]
    None,
    Day,
    Night,
}

/// Point-in-time view of the controller, sent to the frontend.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct AmbientSnapshot {
    pub is_muted: bool,
    pub is_daytime: bool,
    pub selected: PlaybackState,
    pub day_playing: bool,
    pub night_playing: bool,
}

struct Tracks {
    // None once released
    day: Option<Box<dyn SoundHandle>>,
    night: Option<Box<dyn SoundHandle>>,
    selected: PlaybackState,
}

impl Tracks {
    fn play_day(&mut self, muted: bool) {
        if let Some(night) = self.night.as_mut() {
            night.stop();
        }
        if muted {
            return;
        }
        if let Some(day) = self.day.as_mut() {
            day.play();
            self.switch_to(PlaybackState::Day);
        }
    }

    fn play_night(&mut self, muted: bool) {
        if let Some(day) = self.day.as_mut() {
            day.stop();
        }
        if muted {
            return;
        }
        if let Some(night) = self.night.as_mut() {
            night.play();
            self.switch_to(PlaybackState::Night);
        }
    }

    fn switch_to(&mut self, target: PlaybackState) {
        if target != self.selected {
            tracing::debug!(target: "audio", from = ?self.selected, to = ?target, "switching ambience");
            self.selected = target;
        }
    }

    fn stop_all(&mut self) {
        for handle in [self.day.as_mut(), self.night.as_mut()].into_iter().flatten() {
            handle.stop();
        }
    }

    fn release(&mut self) {
        for mut handle in [self.day.take(), self.night.take()].into_iter().flatten() {
            handle.unload();
        }
    }

    fn is_playing(handle: &Option<Box<dyn SoundHandle>>) -> bool {
        handle.as_ref().is_some_and(|h| h.is_playing())
    }
}

/// The four ambient operations, plus read access to the controller state.
///
/// Cheap to clone; every clone drives the same pair of tracks. All
/// operations are infallible and may be called in any state, including
/// after the owning provider has been unmounted (they become no-ops).
#[derive(Clone)]
pub struct AmbientAudio {
    tracks: Arc<Mutex<Tracks>>,
    store: Arc<SignalStore>,
}

impl AmbientAudio {
    // Lock order is tracks then store. The store runs listeners after
    // releasing its own lock, so a mute that lands mid-play waits here.
    fn lock(&self) -> MutexGuard<'_, Tracks> {
        self.tracks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stops the night track and, unless muted, starts the day track.
    pub fn play_day_sound(&self) {
        let mut tracks = self.lock();
        tracks.play_day(self.store.is_muted());
    }

    /// Stops the day track and, unless muted, starts the night track.
    pub fn play_night_sound(&self) {
        let mut tracks = self.lock();
        tracks.play_night(self.store.is_muted());
    }

    /// Plays whichever track matches the current time of day.
    pub fn play_ambient_sound(&self) {
        if self.store.is_daytime() {
            self.play_day_sound();
        } else {
            self.play_night_sound();
        }
    }

    /// Stops both tracks. The selection is kept.
    pub fn stop_ambient_sound(&self) {
        self.lock().stop_all();
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.lock().selected
    }

    pub fn snapshot(&self) -> AmbientSnapshot {
        let signals = self.store.signals();
        let tracks = self.lock();
        AmbientSnapshot {
            is_muted: signals.is_muted,
            is_daytime: signals.is_daytime,
            selected: tracks.selected,
            day_playing: Tracks::is_playing(&tracks.day),
            night_playing: Tracks::is_playing(&tracks.night),
        }
    }

    pub fn signals(&self) -> &Arc<SignalStore> {
        &self.store
    }

    fn on_muted_changed(&self, muted: bool) {
        if muted {
            self.stop_ambient_sound();
            return;
        }
        match self.playback_state() {
            PlaybackState::Day => self.play_day_sound(),
            PlaybackState::Night => self.play_night_sound(),
            PlaybackState::None => {}
        }
    }

    fn on_daytime_changed(&self, daytime: bool) {
        if self.store.is_muted() {
            return;
        }
        if daytime {
            self.play_day_sound();
        } else {
            self.play_night_sound();
        }
    }

    fn downgrade(&self) -> WeakAmbientAudio {
        WeakAmbientAudio {
            tracks: Arc::downgrade(&self.tracks),
            store: Arc::downgrade(&self.store),
        }
    }
}

/// Held by store listeners so they don't keep the controller alive.
#[derive(Clone)]
struct WeakAmbientAudio {
    tracks: Weak<Mutex<Tracks>>,
    store: Weak<SignalStore>,
}

impl WeakAmbientAudio {
    fn upgrade(&self) -> Option<AmbientAudio> {
        Some(AmbientAudio {
            tracks: self.tracks.upgrade()?,
            store: self.store.upgrade()?,
        })
    }
}

/// Owns the lifetime of a mounted controller.
///
/// Mounting allocates both handles (their loads are not awaited) and
/// subscribes to the store. Dropping the provider, on any path including
/// unwinding, unsubscribes and then unloads both handles.
pub struct AmbientAudioProvider {
    audio: AmbientAudio,
    subscriptions: Vec<Subscription>,
}

impl AmbientAudioProvider {
    pub fn mount(
        store: Arc<SignalStore>,
        backend: &dyn AudioBackend,
        config: &AmbientConfig,
    ) -> Self {
        tracing::info!(target: "audio", day = %config.day.source, night = %config.night.source, "mounting ambient audio");

        let audio = AmbientAudio {
            tracks: Arc::new(Mutex::new(Tracks {
                day: Some(backend.load(&config.day)),
                night: Some(backend.load(&config.night)),
                selected: PlaybackState::None,
            })),
            store: store.clone(),
        };

        let weak = audio.downgrade();
        let on_muted = store.subscribe(Signal::Muted, move |muted| {
            if let Some(audio) = weak.upgrade() {
                audio.on_muted_changed(muted);
            }
        });
        let weak = audio.downgrade();
        let on_daytime = store.subscribe(Signal::Daytime, move |daytime| {
            if let Some(audio) = weak.upgrade() {
                audio.on_daytime_changed(daytime);
            }
        });

        Self {
            audio,
            subscriptions: vec![on_muted, on_daytime],
        }
    }

    pub fn audio(&self) -> AmbientAudio {
        self.audio.clone()
    }

    /// Explicit teardown; same as dropping the provider.
    pub fn unmount(self) {}
}

impl Drop for AmbientAudioProvider {
    fn drop(&mut self) {
        self.subscriptions.clear();
        self.audio.lock().release();
        tracing::info!(target: "audio", "ambient audio released");
    }
}
