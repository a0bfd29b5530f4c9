//! Lookup of the mounted controller from anywhere on the UI thread.
//!
//! A provider is made visible with [`AmbientAudioProvider::provide`]; the
//! innermost live scope wins. Looking up with no scope in effect is a usage
//! error, never a silent default.

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::audio::{AmbientAudio, AmbientAudioProvider};
use crate::error::{AmbientError, Result};

thread_local! {
    static SCOPES: RefCell<Vec<(u64, AmbientAudio)>> = const { RefCell::new(Vec::new()) };
    static NEXT_SCOPE: std::cell::Cell<u64> = const { std::cell::Cell::new(0) };
}

/// Keeps a provider visible to [`use_ambient_audio`] on this thread.
///
/// Borrows the provider so the scope cannot outlive it, and is `!Send` so it
/// is dropped on the thread it was pushed on.
pub struct ProvideScope<'a> {
    id: u64,
    _provider: PhantomData<&'a AmbientAudioProvider>,
    _not_send: PhantomData<*const ()>,
}

impl AmbientAudioProvider {
    pub fn provide(&self) -> ProvideScope<'_> {
        let id = NEXT_SCOPE.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        SCOPES.with(|scopes| scopes.borrow_mut().push((id, self.audio())));
        ProvideScope {
            id,
            _provider: PhantomData,
            _not_send: PhantomData,
        }
    }
}

impl Drop for ProvideScope<'_> {
    fn drop(&mut self) {
        SCOPES.with(|scopes| scopes.borrow_mut().retain(|(id, _)| *id != self.id));
    }
}

/// The controller of the innermost provider scope on this thread.
pub fn use_ambient_audio() -> Result<AmbientAudio> {
    SCOPES.with(|scopes| {
        scopes
            .borrow()
            .last()
            .map(|(_, audio)| audio.clone())
            .ok_or(AmbientError::NoProvider)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PlaybackState, SilentBackend};
    use crate::config::AmbientConfig;
    use crate::state::{SignalStore, Signals};

    fn provider() -> AmbientAudioProvider {
        AmbientAudioProvider::mount(
            SignalStore::new(Signals::default()),
            &SilentBackend::new(),
            &AmbientConfig::default(),
        )
    }

    #[test]
    fn lookup_without_provider_is_a_usage_error() {
        let err = use_ambient_audio().err().unwrap();
        assert!(matches!(err, AmbientError::NoProvider));
        assert_eq!(
            err.to_string(),
            "ambient audio must be used within an AmbientAudioProvider"
        );
    }

    #[test]
    fn lookup_inside_scope_reaches_the_provider() {
        let provider = provider();
        {
            let _scope = provider.provide();
            use_ambient_audio().unwrap().play_day_sound();
        }
        assert_eq!(provider.audio().playback_state(), PlaybackState::Day);
        assert!(use_ambient_audio().is_err());
    }

    #[test]
    fn innermost_scope_wins() {
        let outer = provider();
        let inner = provider();
        let _outer_scope = outer.provide();
        {
            let _inner_scope = inner.provide();
            use_ambient_audio().unwrap().play_night_sound();
        }
        use_ambient_audio().unwrap().play_day_sound();

        assert_eq!(inner.audio().playback_state(), PlaybackState::Night);
        assert_eq!(outer.audio().playback_state(), PlaybackState::Day);
    }
}
