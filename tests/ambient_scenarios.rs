use std::sync::Arc;

use ambient_audio_lib::{
    use_ambient_audio, AmbientAudioProvider, AmbientConfig, AmbientError, LoadState,
    PlaybackState, SignalStore, Signals, SilentBackend,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Fixture {
    store: Arc<SignalStore>,
    backend: SilentBackend,
    config: AmbientConfig,
}

impl Fixture {
    fn new(signals: Signals) -> Self {
        init_tracing();
        Self {
            store: SignalStore::new(signals),
            backend: SilentBackend::new(),
            config: AmbientConfig::default(),
        }
    }

    fn mount(&self) -> AmbientAudioProvider {
        AmbientAudioProvider::mount(self.store.clone(), &self.backend, &self.config)
    }

    fn day_playing(&self) -> bool {
        self.backend.track(&self.config.day.source).unwrap().is_playing()
    }

    fn night_playing(&self) -> bool {
        self.backend.track(&self.config.night.source).unwrap().is_playing()
    }
}

#[test]
fn play_mute_unmute_resumes_day_track() {
    let fx = Fixture::new(Signals {
        is_muted: false,
        is_daytime: true,
    });
    let provider = fx.mount();
    let audio = provider.audio();

    audio.play_ambient_sound();
    assert!(fx.day_playing());
    assert!(!fx.night_playing());
    assert_eq!(audio.playback_state(), PlaybackState::Day);

    fx.store.set_muted(true);
    assert!(!fx.day_playing());
    assert!(!fx.night_playing());

    fx.store.set_muted(false);
    assert!(fx.day_playing());
    assert!(!fx.night_playing());
}

#[test]
fn sunset_switches_to_night_within_one_update() {
    let fx = Fixture::new(Signals::default());
    let provider = fx.mount();
    provider.audio().play_day_sound();

    fx.store.set_daytime(false);

    assert!(fx.night_playing());
    assert!(!fx.day_playing());
    assert_eq!(provider.audio().playback_state(), PlaybackState::Night);
}

#[test]
fn at_most_one_track_plays_across_any_call_sequence() {
    let fx = Fixture::new(Signals::default());
    let provider = fx.mount();
    let audio = provider.audio();

    let sequence = [true, true, false, true, false, false, true, false];
    for (i, day) in sequence.into_iter().enumerate() {
        if day {
            audio.play_day_sound();
        } else {
            audio.play_night_sound();
        }
        if i % 3 == 2 {
            fx.store.toggle_muted();
        }
        assert!(
            !(fx.day_playing() && fx.night_playing()),
            "both tracks playing after step {i}"
        );
        if fx.store.is_muted() {
            assert!(!fx.day_playing() && !fx.night_playing());
        }
    }
}

#[test]
fn stop_leaves_selection_for_resume() {
    let fx = Fixture::new(Signals::default());
    let provider = fx.mount();
    let audio = provider.audio();

    audio.play_night_sound();
    audio.stop_ambient_sound();
    assert_eq!(audio.playback_state(), PlaybackState::Night);
    assert!(!fx.night_playing());

    // A mute round trip brings back the stopped selection
    fx.store.set_muted(true);
    fx.store.set_muted(false);
    assert!(fx.night_playing());
}

#[test]
fn combined_update_mutes_then_ignores_daytime() {
    let fx = Fixture::new(Signals::default());
    let provider = fx.mount();
    provider.audio().play_day_sound();

    fx.store.update(|s| {
        s.is_muted = true;
        s.is_daytime = false;
    });

    assert!(!fx.day_playing());
    assert!(!fx.night_playing());
    assert_eq!(provider.audio().playback_state(), PlaybackState::Day);
}

#[test]
fn lookup_outside_provider_fails() {
    init_tracing();
    assert!(matches!(use_ambient_audio(), Err(AmbientError::NoProvider)));
}

#[test]
fn lookup_inside_provider_drives_tracks() {
    let fx = Fixture::new(Signals::default());
    let provider = fx.mount();
    let _scope = provider.provide();

    use_ambient_audio().unwrap().play_ambient_sound();
    assert!(fx.day_playing());
}

#[test]
fn snapshot_reflects_signals_and_tracks() {
    let fx = Fixture::new(Signals::default());
    let provider = fx.mount();
    let audio = provider.audio();
    audio.play_night_sound();

    let snapshot = audio.snapshot();
    assert!(!snapshot.is_muted);
    assert!(snapshot.is_daytime);
    assert_eq!(snapshot.selected, PlaybackState::Night);
    assert!(snapshot.night_playing);
    assert!(!snapshot.day_playing);

    let json = serde_json::to_value(snapshot).unwrap();
    assert_eq!(json["selected"], "Night");
    assert_eq!(json["night_playing"], true);
}

#[test]
fn handles_live_exactly_as_long_as_the_provider() {
    let fx = Fixture::new(Signals::default());
    {
        let provider = fx.mount();
        let audio = provider.audio();
        audio.play_day_sound();
        fx.store.set_daytime(false);
        fx.store.set_daytime(true);
        assert_eq!(
            fx.backend.track(&fx.config.day.source).unwrap().load_state,
            LoadState::Ready
        );
    }
    assert_eq!(
        fx.backend.track(&fx.config.day.source).unwrap().load_state,
        LoadState::Unloaded
    );
    assert_eq!(
        fx.backend.track(&fx.config.night.source).unwrap().load_state,
        LoadState::Unloaded
    );
    assert_eq!(fx.store.listener_count(), 0);
}
