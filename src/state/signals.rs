use serde::{Deserialize, Serialize};

/// The two booleans the ambient controller follows.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Signals {
    pub is_muted: bool,
    pub is_daytime: bool,
}

impl Default for Signals {
    fn default() -> Self {
        Self {
            is_muted: false,
            is_daytime: true,
        }
    }
}

impl Signals {
    pub fn get(&self, signal: Signal) -> bool {
        match signal {
            Signal::Muted => self.is_muted,
            Signal::Daytime => self.is_daytime,
        }
    }
}

/// Names one field of [`Signals`] for subscriptions.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    Muted,
    Daytime,
}
