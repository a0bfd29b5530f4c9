//! Error types for the ambient audio controller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmbientError {
    /// The controller was looked up outside of a mounted provider.
    #[error("ambient audio must be used within an AmbientAudioProvider")]
    NoProvider,

    #[error("failed to read audio asset {}: {io}", .path.display())]
    Asset {
        path: PathBuf,
        #[source]
        io: std::io::Error,
    },

    #[error("remote audio sources are not supported: {0}")]
    RemoteSource(String),

    #[error("failed to decode {source_name}: {reason}")]
    Decode { source_name: String, reason: String },

    #[error("audio output device unavailable: {0}")]
    Device(String),

    #[error("failed to create sink: {0}")]
    Sink(String),

    #[error("ambient audio state lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, AmbientError>;

impl From<AmbientError> for String {
    fn from(e: AmbientError) -> Self {
        e.to_string()
    }
}
