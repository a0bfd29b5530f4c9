use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

pub use self::signals::{Signal, Signals};

pub mod signals;

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

struct Entry {
    id: u64,
    signal: Signal,
    listener: Listener,
}

struct StoreInner {
    signals: Signals,
    listeners: Vec<Entry>,
    next_id: u64,
}

/// Process-wide mute / time-of-day state with change notification.
///
/// Listeners run synchronously on the thread that changed the value, after
/// the store lock has been released, and only when the value actually
/// flips. When one update flips both signals, mute listeners run first.
pub struct SignalStore {
    inner: Mutex<StoreInner>,
}

impl SignalStore {
    pub fn new(initial: Signals) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(StoreInner {
                signals: initial,
                listeners: Vec::new(),
                next_id: 0,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn signals(&self) -> Signals {
        self.lock().signals
    }

    pub fn is_muted(&self) -> bool {
        self.signals().is_muted
    }

    pub fn is_daytime(&self) -> bool {
        self.signals().is_daytime
    }

    pub fn set_muted(&self, muted: bool) {
        self.update(|s| s.is_muted = muted);
    }

    pub fn set_daytime(&self, daytime: bool) {
        self.update(|s| s.is_daytime = daytime);
    }

    /// Flip the mute flag, returning the new value.
    pub fn toggle_muted(&self) -> bool {
        self.update(|s| s.is_muted = !s.is_muted).is_muted
    }

    /// Change any number of fields at once and notify for each one that flipped.
    pub fn update(&self, change: impl FnOnce(&mut Signals)) -> Signals {
        let (next, pending) = {
            let mut inner = self.lock();
            let previous = inner.signals;
            change(&mut inner.signals);
            let next = inner.signals;

            let mut pending: Vec<(Listener, bool)> = Vec::new();
            for signal in [Signal::Muted, Signal::Daytime] {
                let value = next.get(signal);
                if previous.get(signal) == value {
                    continue;
                }
                tracing::debug!(target: "audio", ?signal, value, "signal changed");
                pending.extend(
                    inner
                        .listeners
                        .iter()
                        .filter(|entry| entry.signal == signal)
                        .map(|entry| (entry.listener.clone(), value)),
                );
            }
            (next, pending)
        };

        for (listener, value) in pending {
            listener(value);
        }
        next
    }

    /// Register `listener` for changes of `signal`. Dropping the returned
    /// [`Subscription`] removes it.
    pub fn subscribe(
        self: &Arc<Self>,
        signal: Signal,
        listener: impl Fn(bool) + Send + Sync + 'static,
    ) -> Subscription {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push(Entry {
            id,
            signal,
            listener: Arc::new(listener),
        });
        Subscription {
            store: Arc::downgrade(self),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn unsubscribe(&self, id: u64) {
        self.lock().listeners.retain(|entry| entry.id != id);
    }
}

/// Keeps one listener registered on a [`SignalStore`].
pub struct Subscription {
    store: Weak<SignalStore>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(self.id);
        }
    }
}
