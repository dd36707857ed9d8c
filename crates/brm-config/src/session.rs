use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-session settings. Every setter clamps into the supported range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub track_count: i32,
    pub bouncer_count: i32,
    pub difficulty: i32,
    /// Beat playback starts from.
    pub playback_start: f64,
    /// Chart time at which the music track begins.
    pub music_start_sec: f64,
    pub metronome: bool,
    /// Scale applied to the frame delta fed to the music device.
    pub audio_damping: f64,
    /// When false, input-gated text boxes dismiss themselves.
    pub requires_player_input: bool,
    pub music_muted: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            track_count: Self::DEFAULT_TRACK_COUNT,
            bouncer_count: Self::DEFAULT_BOUNCER_COUNT,
            difficulty: Self::DEFAULT_DIFFICULTY,
            playback_start: 0.0,
            music_start_sec: 0.0,
            metronome: false,
            audio_damping: Self::DEFAULT_AUDIO_DAMPING,
            requires_player_input: true,
            music_muted: false,
        }
    }
}

impl SessionConfig {
    pub const MIN_TRACK_COUNT: i32 = 4;
    pub const MAX_TRACK_COUNT: i32 = 8;
    pub const DEFAULT_TRACK_COUNT: i32 = Self::MIN_TRACK_COUNT;

    pub const MIN_BOUNCER_COUNT: i32 = 5;
    pub const MAX_BOUNCER_COUNT: i32 = 15;
    pub const DEFAULT_BOUNCER_COUNT: i32 = 15;

    pub const MAX_DIFFICULTY: i32 = 5;
    pub const DEFAULT_DIFFICULTY: i32 = 0;

    pub const DEFAULT_AUDIO_DAMPING: f64 = 0.75;

    pub fn set_track_count(&mut self, count: i32) {
        self.track_count = count.clamp(Self::MIN_TRACK_COUNT, Self::MAX_TRACK_COUNT);
    }

    /// Negative counts restore the default.
    pub fn set_bouncer_count(&mut self, count: i32) {
        self.bouncer_count = if count < 0 {
            Self::DEFAULT_BOUNCER_COUNT
        } else {
            count.clamp(Self::MIN_BOUNCER_COUNT, Self::MAX_BOUNCER_COUNT)
        };
    }

    pub fn set_difficulty(&mut self, difficulty: i32) {
        self.difficulty = difficulty.clamp(0, Self::MAX_DIFFICULTY);
    }

    /// Returns a copy with every field forced into range.
    pub fn normalized(&self) -> Self {
        let mut config = self.clone();
        config.set_track_count(self.track_count);
        config.set_bouncer_count(self.bouncer_count);
        config.set_difficulty(self.difficulty);
        if !config.playback_start.is_finite() {
            config.playback_start = 0.0;
        }
        if !config.music_start_sec.is_finite() {
            config.music_start_sec = 0.0;
        }
        if !config.audio_damping.is_finite() || config.audio_damping < 0.0 {
            config.audio_damping = Self::DEFAULT_AUDIO_DAMPING;
        }
        config
    }

    /// Loads settings from `path`, falling back to defaults when it is absent.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config.normalized())
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
