use std::path::{Path, PathBuf};
use std::sync::Once;

use crate::config::{ASSET_BASE_DIR, ASSET_DIR_ENV};
use crate::error::{AmbientError, Result};

/// Directory the ambient sources are resolved against.
///
/// `AMBIENT_AUDIO_DIR` wins over the dev-mode default.
pub fn asset_dir() -> PathBuf {
    std::env::var_os(ASSET_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(ASSET_BASE_DIR))
}

/// Map a track source to a file on disk.
///
/// Absolute paths and `file://` URLs are used as is, anything else is
/// relative to `base`.
pub fn resolve_source(base: &Path, source: &str) -> PathBuf {
    let source = source.strip_prefix("file://").unwrap_or(source);
    let path = Path::new(source);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(source)
    }
}

/// Remote sources (http/https) are not fetched; only local assets load.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

static REMOTE_WARNING: Once = Once::new();

/// Load a local audio asset into memory.
pub fn load_local_audio(source: &str) -> Result<Vec<u8>> {
    if is_remote(source) {
        REMOTE_WARNING.call_once(|| {
            tracing::warn!(target: "audio", source, "remote audio sources are unsupported, place the file in the asset directory");
        });
        return Err(AmbientError::RemoteSource(source.to_string()));
    }
    let path = resolve_source(&asset_dir(), source);
    std::fs::read(&path).map_err(|io| AmbientError::Asset { path, io })
}

/// Decoded PCM, shared by every sink queued for the track.
#[cfg(feature = "rodio")]
#[derive(Debug, Clone)]
pub struct DecodedTrack {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: std::sync::Arc<[f32]>,
}

#[cfg(feature = "rodio")]
impl DecodedTrack {
    /// A source over the shared samples, starting at the first frame.
    pub fn source(&self, looping: bool) -> SharedSamples {
        SharedSamples {
            channels: self.channels,
            sample_rate: self.sample_rate,
            samples: self.samples.clone(),
            pos: 0,
            looping,
        }
    }
}

/// Plays a [`DecodedTrack`] without copying its PCM; optionally wraps
/// around forever.
#[cfg(feature = "rodio")]
#[derive(Debug, Clone)]
pub struct SharedSamples {
    channels: u16,
    sample_rate: u32,
    samples: std::sync::Arc<[f32]>,
    pos: usize,
    looping: bool,
}

#[cfg(feature = "rodio")]
impl Iterator for SharedSamples {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.pos >= self.samples.len() {
            if !self.looping || self.samples.is_empty() {
                return None;
            }
            self.pos = 0;
        }
        let sample = self.samples[self.pos];
        self.pos += 1;
        Some(sample)
    }
}

#[cfg(feature = "rodio")]
impl rodio::Source for SharedSamples {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<std::time::Duration> {
        if self.looping {
            return None;
        }
        let frames = self.samples.len() as u64 / self.channels.max(1) as u64;
        Some(std::time::Duration::from_secs_f64(
            frames as f64 / self.sample_rate.max(1) as f64,
        ))
    }
}

/// Decode a whole file to PCM.
#[cfg(feature = "rodio")]
pub fn decode_audio(source_name: &str, data: Vec<u8>) -> Result<DecodedTrack> {
    use rodio::{Decoder, Source};

    let decoder = Decoder::new(std::io::Cursor::new(data)).map_err(|e| AmbientError::Decode {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })?;
    // Metadata has to be read before the decoder is consumed
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<f32> = decoder.convert_samples::<f32>().collect();
    if samples.is_empty() {
        return Err(AmbientError::Decode {
            source_name: source_name.to_string(),
            reason: "no samples".to_string(),
        });
    }
    Ok(DecodedTrack {
        channels,
        sample_rate,
        samples: samples.into(),
    })
}
