use brm_config::{CHART_VERSION, ChartFile, MusicSettings};
use log::info;

use crate::engine::Engine;
use crate::error::PlayError;
use crate::event::Event;

impl Engine {
    /// Builds a stopped session from a loaded chart.
    pub fn from_chart(chart: &ChartFile) -> Result<Self, PlayError> {
        let mut engine = Self::new(chart.session.clone());
        engine.set_tempos(chart.tempo_map()?)?;
        *engine.time_signatures_mut() = chart.time_signature_map()?;
        let added = engine.add_all_events(chart.events.iter().map(Event::from));
        engine.set_track_count(chart.session.track_count);
        engine.set_results_text(chart.results_text.clone());
        info!(
            "session ready: {} events, {} tempo changes, duration {} beats",
            added.len(),
            engine.tempos().len(),
            engine.stats().duration
        );
        Ok(engine)
    }

    /// Snapshot of the session as a chart. Music settings come from the
    /// attached track, if any.
    pub fn to_chart(&self) -> ChartFile {
        ChartFile {
            version: CHART_VERSION,
            session: self.config().clone(),
            tempos: self.tempos().changes().to_vec(),
            time_signatures: self.time_signatures().signatures().to_vec(),
            events: self.events().iter().map(Event::to_spec).collect(),
            results_text: self.results_text().clone(),
            music: self.music().map(|track| MusicSettings {
                duration: track.duration(),
                looping: track.is_looping(),
            }),
        }
    }
}
