//! Day/night ambient audio.
//!
//! An [`AmbientAudioProvider`] owns two looping tracks and keeps them in
//! step with the mute and time-of-day flags of a shared [`SignalStore`].
//! Code that needs the four ambient operations gets an [`AmbientAudio`]
//! from the provider directly, through [`use_ambient_audio`] inside a
//! provider scope, or through the Tauri plugin in `commands`.
//!
//! ```no_run
//! use ambient_audio_lib::{AmbientAudioProvider, AmbientConfig, SignalStore, Signals, SilentBackend};
//!
//! let store = SignalStore::new(Signals::default());
//! let backend = SilentBackend::new();
//! let provider = AmbientAudioProvider::mount(store.clone(), &backend, &AmbientConfig::default());
//!
//! provider.audio().play_ambient_sound();
//! store.set_daytime(false); // swaps to the night track
//! ```

// Asset loader module for reading and decoding local audio
#[path = "assetLoader/asset_loader.rs"]
pub mod asset_loader;

// Audio module
pub mod audio;

pub mod config;
pub mod context;
pub mod error;

// Shared signal state
pub mod state;

// Tauri commands
#[cfg(feature = "tauri")]
pub mod commands;

pub use audio::{
    AmbientAudio, AmbientAudioProvider, AmbientSnapshot, AudioBackend, LoadState, PlaybackState,
    SilentBackend, SoundHandle, SoundSpec,
};
pub use config::AmbientConfig;
pub use context::{use_ambient_audio, ProvideScope};
pub use error::{AmbientError, Result};
pub use state::{Signal, SignalStore, Signals, Subscription};
