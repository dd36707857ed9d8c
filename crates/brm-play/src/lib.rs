// Playback session: event scheduling, input judgment, scoring and music sync

mod chart;
mod engine;
mod error;
mod event;
mod hooks;
mod judge;
mod listener;
mod metronome;
mod music;
mod scene;
mod scheduler;
mod score;

#[cfg(test)]
mod test_utils;

pub use engine::Engine;
pub use error::PlayError;
pub use event::{Event, EventContext, EventId};
pub use hooks::{NoHooks, PlaybackHooks};
pub use judge::{ExpectedHit, JudgeWindows, JudgeWindowsBuilder, JudgmentEngine};
pub use listener::{EngineListener, ListenerId, Listeners};
pub use metronome::{Metronome, MetronomeTick};
pub use music::MusicSync;
pub use scene::{ActiveSpotlight, ActiveTextBox, SceneState, SongBanner, VisibleImage};
pub use scheduler::{ChartStats, EventScheduler};
pub use score::ScoreCalculator;
