use anyhow::{Context, Result, bail};
use brm_timing::{TempoChange, TempoMap, TimeSignature, TimeSignatureMap, TimingError};
use brm_types::{Bounds, EventKind, ResultsText};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::session::SessionConfig;

/// Newest chart format version this crate reads and writes.
pub const CHART_VERSION: u32 = 1;

/// Serialized chart: timing, events and session defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartFile {
    pub version: u32,
    pub session: SessionConfig,
    pub tempos: Vec<TempoChange>,
    pub time_signatures: Vec<TimeSignature>,
    pub events: Vec<EventSpec>,
    pub results_text: ResultsText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<MusicSettings>,
}

impl Default for ChartFile {
    fn default() -> Self {
        Self {
            version: CHART_VERSION,
            session: SessionConfig::default(),
            tempos: Vec::new(),
            time_signatures: Vec::new(),
            events: Vec::new(),
            results_text: ResultsText::default(),
            music: None,
        }
    }
}

/// One event as stored in a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSpec {
    pub bounds: Bounds,
    pub kind: EventKind,
}

impl EventSpec {
    pub fn new(bounds: Bounds, kind: EventKind) -> Self {
        Self { bounds, kind }
    }
}

/// Music track properties needed to drive playback without the audio file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MusicSettings {
    /// Track length in seconds.
    pub duration: f64,
    #[serde(default)]
    pub looping: bool,
}

impl ChartFile {
    /// Loads a chart. Unlike settings, a missing chart is an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read chart {}", path.display()))?;
        let mut chart: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse chart {}", path.display()))?;
        if chart.version > CHART_VERSION {
            bail!(
                "chart {} has version {}, newest supported is {CHART_VERSION}",
                path.display(),
                chart.version
            );
        }
        chart.session = chart.session.normalized();
        info!(
            "loaded chart {} ({} tempo changes, {} events)",
            path.display(),
            chart.tempos.len(),
            chart.events.len()
        );
        Ok(chart)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write chart {}", path.display()))?;
        Ok(())
    }

    pub fn tempo_map(&self) -> Result<TempoMap, TimingError> {
        TempoMap::from_changes(self.tempos.iter().copied())
    }

    pub fn time_signature_map(&self) -> Result<TimeSignatureMap, TimingError> {
        TimeSignatureMap::from_signatures(self.time_signatures.iter().copied())
    }
}
