//! Game settings and preferences
//!
//! Read from the `settings` key; the record is hand-edited, never written
//! by the game.

use serde::{Deserialize, Serialize};

use crate::consts::TARGET_FPS;
use crate::persistence::{self, SETTINGS_KEY, Store};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence all cues
    pub muted: bool,

    // === Pacing ===
    /// Frame pacing cap
    pub target_fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 0.2,
            muted: false,

            target_fps: TARGET_FPS,
        }
    }
}

impl Settings {
    /// Effective cue volume (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)).clamp(0.0, 1.0)
        }
    }

    /// Frame pacing cap, never above the simulation's 60 Hz design rate
    pub fn frame_rate(&self) -> u32 {
        self.target_fps.clamp(1, TARGET_FPS)
    }

    /// Load settings from the store
    pub fn load<S: Store + ?Sized>(store: &S) -> Self {
        persistence::load_or_default(store, SETTINGS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_mute_silences_cues() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_volumes_are_clamped() {
        let settings = Settings {
            master_volume: 3.0,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.5);
    }

    #[test]
    fn test_frame_rate_capped_at_sixty() {
        let settings = Settings {
            target_fps: 144,
            ..Default::default()
        };
        assert_eq!(settings.frame_rate(), 60);
    }

    #[test]
    fn test_partial_record_keeps_defaults() {
        let mut store = MemoryStore::default();
        store.save(SETTINGS_KEY, r#"{ "muted": true, "show_fps": true }"#).unwrap();
        let settings = Settings::load(&store);
        assert!(settings.muted);
        assert_eq!(settings.target_fps, 60);
    }
}
