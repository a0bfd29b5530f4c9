//! Tauri plugin exposing the ambient controller to the frontend.

use std::sync::{Arc, Mutex};
use tauri::plugin::{Builder, TauriPlugin};
use tauri::{AppHandle, Emitter, Manager, Runtime};

use crate::audio::{
    backend_or_silent, AmbientAudio, AmbientAudioProvider, AmbientSnapshot, AudioBackend,
};
use crate::config::AmbientConfig;
use crate::error::{AmbientError, Result};
use crate::state::{SignalStore, Signals};

/// Event emitted after every command with the resulting [`AmbientSnapshot`].
pub const STATE_CHANGED_EVENT: &str = "ambient-state-changed";

// Managed state; `provider` is None once the plugin has been dropped.
pub struct AmbientState {
    provider: Mutex<Option<AmbientAudioProvider>>,
}

impl AmbientState {
    fn unmount(&self) {
        if let Ok(mut provider) = self.provider.lock() {
            provider.take();
        }
    }
}

/// Look up the mounted controller. Fails with [`AmbientError::NoProvider`]
/// when the plugin was never registered or has already been dropped.
pub fn ambient_audio<R: Runtime>(app: &AppHandle<R>) -> Result<AmbientAudio> {
    let state = app
        .try_state::<AmbientState>()
        .ok_or(AmbientError::NoProvider)?;
    let provider = state.provider.lock().map_err(|_| AmbientError::Poisoned)?;
    provider
        .as_ref()
        .map(AmbientAudioProvider::audio)
        .ok_or(AmbientError::NoProvider)
}

fn emit_snapshot<R: Runtime>(
    app: &AppHandle<R>,
    audio: &AmbientAudio,
) -> std::result::Result<AmbientSnapshot, String> {
    let snapshot = audio.snapshot();
    app.emit(STATE_CHANGED_EVENT, snapshot)
        .map_err(|e| e.to_string())?;
    Ok(snapshot)
}

// ===== Playback Commands =====

#[tauri::command]
fn play_ambient_sound<R: Runtime>(app: AppHandle<R>) -> std::result::Result<AmbientSnapshot, String> {
    let audio = ambient_audio(&app)?;
    audio.play_ambient_sound();
    emit_snapshot(&app, &audio)
}

#[tauri::command]
fn stop_ambient_sound<R: Runtime>(app: AppHandle<R>) -> std::result::Result<AmbientSnapshot, String> {
    let audio = ambient_audio(&app)?;
    audio.stop_ambient_sound();
    emit_snapshot(&app, &audio)
}

#[tauri::command]
fn play_day_sound<R: Runtime>(app: AppHandle<R>) -> std::result::Result<AmbientSnapshot, String> {
    let audio = ambient_audio(&app)?;
    audio.play_day_sound();
    emit_snapshot(&app, &audio)
}

#[tauri::command]
fn play_night_sound<R: Runtime>(app: AppHandle<R>) -> std::result::Result<AmbientSnapshot, String> {
    let audio = ambient_audio(&app)?;
    audio.play_night_sound();
    emit_snapshot(&app, &audio)
}

// ===== Signal Commands =====

#[tauri::command]
fn set_muted<R: Runtime>(muted: bool, app: AppHandle<R>) -> std::result::Result<AmbientSnapshot, String> {
    let audio = ambient_audio(&app)?;
    audio.signals().set_muted(muted);
    emit_snapshot(&app, &audio)
}

#[tauri::command]
fn toggle_muted<R: Runtime>(app: AppHandle<R>) -> std::result::Result<AmbientSnapshot, String> {
    let audio = ambient_audio(&app)?;
    audio.signals().toggle_muted();
    emit_snapshot(&app, &audio)
}

#[tauri::command]
fn set_daytime<R: Runtime>(daytime: bool, app: AppHandle<R>) -> std::result::Result<AmbientSnapshot, String> {
    let audio = ambient_audio(&app)?;
    audio.signals().set_daytime(daytime);
    emit_snapshot(&app, &audio)
}

#[tauri::command]
fn get_ambient_state<R: Runtime>(app: AppHandle<R>) -> std::result::Result<AmbientSnapshot, String> {
    Ok(ambient_audio(&app)?.snapshot())
}

/// The `ambient-audio` plugin: mounts the controller on setup and unmounts
/// it when the app tears the plugin down.
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    init_with(backend_or_silent)
}

/// Same as [`init`] with the playback backend chosen by the caller.
pub fn init_with<R, F>(make_backend: F) -> TauriPlugin<R>
where
    R: Runtime,
    F: FnOnce() -> Arc<dyn AudioBackend> + Send + 'static,
{
    Builder::new("ambient-audio")
        .invoke_handler(tauri::generate_handler![
            play_ambient_sound,
            stop_ambient_sound,
            play_day_sound,
            play_night_sound,
            set_muted,
            toggle_muted,
            set_daytime,
            get_ambient_state,
        ])
        .setup(|app, _api| {
            let store = SignalStore::new(Signals::default());
            let backend = make_backend();
            let provider = AmbientAudioProvider::mount(store, &backend, &AmbientConfig::default());
            app.manage(AmbientState {
                provider: Mutex::new(Some(provider)),
            });
            tracing::info!(target: "audio", "ambient audio plugin initialized");
            Ok(())
        })
        .on_drop(|app| {
            if let Some(state) = app.try_state::<AmbientState>() {
                state.unmount();
            }
        })
        .build()
}
