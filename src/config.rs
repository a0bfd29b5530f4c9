//! Configuration constants for the ambient tracks

use serde::{Deserialize, Serialize};

use crate::audio::SoundSpec;

/// Source of the daytime ambient loop, relative to the asset directory
pub const DAY_SOURCE: &str = "day-ambient.mp3";

/// Source of the nighttime ambient loop, relative to the asset directory
pub const NIGHT_SOURCE: &str = "night-ambient.mp3";

/// Playback volume shared by both tracks (0.0-1.0)
pub const AMBIENT_VOLUME: f32 = 0.4;

/// Both tracks loop forever
pub const AMBIENT_LOOP: bool = true;

/// In dev mode the assets live next to the frontend sources
pub const ASSET_BASE_DIR: &str = "../src/assets/audio/ambient";

/// Environment variable overriding [`ASSET_BASE_DIR`]
pub const ASSET_DIR_ENV: &str = "AMBIENT_AUDIO_DIR";

/// The two tracks owned by a controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientConfig {
    pub day: SoundSpec,
    pub night: SoundSpec,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            day: SoundSpec::new(DAY_SOURCE, AMBIENT_LOOP, AMBIENT_VOLUME),
            night: SoundSpec::new(NIGHT_SOURCE, AMBIENT_LOOP, AMBIENT_VOLUME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tracks_loop_at_fixed_volume() {
        let config = AmbientConfig::default();
        assert_eq!(config.day.source, DAY_SOURCE);
        assert_eq!(config.night.source, NIGHT_SOURCE);
        for spec in [&config.day, &config.night] {
            assert!(spec.looping);
            assert!((spec.volume - 0.4).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn config_deserializes_from_json() {
        let json = r#"{
            "day": { "source": "a.ogg", "looping": true, "volume": 0.4 },
            "night": { "source": "b.ogg", "looping": false, "volume": 0.9 }
        }"#;
        let config: AmbientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.day.source, "a.ogg");
        assert!(!config.night.looping);
    }

    #[test]
    fn config_volume_is_clamped_on_load() {
        let json = r#"{
            "day": { "source": "a.ogg", "looping": true, "volume": 5.0 },
            "night": { "source": "b.ogg", "looping": true, "volume": -1.0 }
        }"#;
        let config: AmbientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.day.volume, 1.0);
        assert_eq!(config.night.volume, 0.0);
    }
}
