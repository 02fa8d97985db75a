//! Player preferences carried in the save record
//!
//! Audio levels use a sentinel so the game can tell "never touched" apart
//! from any real gain, including 0.

use serde::{Deserialize, Serialize};

/// Marker for a volume the player never set
pub const VOLUME_UNSET: f32 = f32::MIN;

/// Name shown before the player enters one
pub const DEFAULT_DISPLAY_NAME: &str = "Mr. Drac";

/// Mixer gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioLevels {
    /// Master gain
    pub master: f32,
    /// Music bus gain
    pub music: f32,
    /// Sound effects bus gain
    pub sfx: f32,
}

impl Default for AudioLevels {
    fn default() -> Self {
        Self {
            master: VOLUME_UNSET,
            music: VOLUME_UNSET,
            sfx: VOLUME_UNSET,
        }
    }
}

impl AudioLevels {
    pub fn new(master: f32, music: f32, sfx: f32) -> Self {
        Self { master, music, sfx }
    }

    /// True once the player has saved any mixer setting
    pub fn is_set(&self) -> bool {
        [self.master, self.music, self.sfx]
            .iter()
            .any(|v| *v != VOLUME_UNSET)
    }

    /// Gain to apply, falling back to `default` for unset channels
    pub fn master_or(&self, default: f32) -> f32 {
        resolve(self.master, default)
    }

    pub fn music_or(&self, default: f32) -> f32 {
        resolve(self.music, default)
    }

    pub fn sfx_or(&self, default: f32) -> f32 {
        resolve(self.sfx, default)
    }
}

fn resolve(value: f32, default: f32) -> f32 {
    if value == VOLUME_UNSET { default } else { value }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Last name entered on the leaderboard
    pub display_name: String,
    /// Privacy/licence consent given
    pub consent_accepted: bool,
    /// Tutorial run finished
    pub tutorial_done: bool,
    pub audio: AudioLevels,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            consent_accepted: false,
            tutorial_done: false,
            audio: AudioLevels::default(),
        }
    }
}
