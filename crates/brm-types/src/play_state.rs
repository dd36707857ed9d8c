use std::fmt;

use serde::{Deserialize, Serialize};

/// Playback state of a session clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlayState {
    #[default]
    Stopped,
    Paused,
    Playing,
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "STOPPED",
            Self::Paused => "PAUSED",
            Self::Playing => "PLAYING",
        };
        f.write_str(name)
    }
}

/// Lifecycle stage of a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlaybackCompletion {
    #[default]
    Waiting,
    Playing,
    Finished,
}
