use serde::{Deserialize, Serialize};

use crate::input::InputType;

/// Variant payload of a chart event.
///
/// The set is closed: every variant shares the same lifecycle and differs
/// only in what its hooks do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventKind {
    /// Editor-visible tempo marker. Display-only: it reports its tempo to
    /// the scene, while timing always comes from the tempo map.
    TempoMarker { bpm: f64 },
    /// Terminal marker; its start beat is the chart duration.
    End,
    /// Beat of the skill-star input.
    SkillStar,
    TextBox(TextBox),
    BgImage(BgImage),
    Spotlight(Spotlight),
    SongInfo(SongInfo),
    /// Music volume marker, `0.0..=1.0`.
    MusicVolume { volume: f32 },
    /// Plain gameplay trigger that launches a ball and expects inputs.
    Deploy(Deploy),
}

impl EventKind {
    /// Whether a skipped event of this kind must still run its hooks once.
    pub fn always_simulated(&self) -> bool {
        matches!(self, Self::TempoMarker { .. } | Self::MusicVolume { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TempoMarker { .. } => "tempoMarker",
            Self::End => "end",
            Self::SkillStar => "skillStar",
            Self::TextBox(_) => "textBox",
            Self::BgImage(_) => "bgImage",
            Self::Spotlight(_) => "spotlight",
            Self::SongInfo(_) => "songInfo",
            Self::MusicVolume { .. } => "musicVolume",
            Self::Deploy(_) => "deploy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    pub text: String,
    /// Pauses playback until the player dismisses it.
    #[serde(default)]
    pub requires_input: bool,
    #[serde(default = "default_secs_before_can_input")]
    pub secs_before_can_input: f64,
}

fn default_secs_before_can_input() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgImage {
    pub texture_hash: String,
    #[serde(default)]
    pub foreground: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spotlight {
    /// Alpha of the shadow drawn outside the lit area.
    #[serde(default = "default_shadow")]
    pub shadow: f32,
}

fn default_shadow() -> f32 {
    0.75
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub static_mode: bool,
}

impl SongInfo {
    /// "title - artist", skipping empty parts.
    pub fn concatenated(&self) -> String {
        match (self.title.is_empty(), self.artist.is_empty()) {
            (false, false) => format!("{} - {}", self.title, self.artist),
            (false, true) => self.title.clone(),
            (true, false) => self.artist.clone(),
            (true, true) => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deploy {
    pub inputs: Vec<ExpectedInput>,
}

/// An input the chart expects, relative to the start of its deploy event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedInput {
    pub beat_offset: f64,
    pub input: InputType,
}
