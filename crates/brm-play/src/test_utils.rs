//! Fixtures shared by the unit tests.

use brm_types::{Bounds, Deploy, EventKind, ExpectedInput, InputType};

use crate::event::{Event, EventId};
use crate::hooks::PlaybackHooks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Start,
    Playing,
    End,
}

/// Hooks that record every call.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    pub calls: Vec<(EventId, Lifecycle)>,
    pub ticks: Vec<(i32, bool)>,
    pub skill_stars: usize,
    pub duds: Vec<InputType>,
    pub text_advances: Vec<bool>,
}

impl RecordingHooks {
    pub fn lifecycle_of(&self, id: EventId) -> Vec<Lifecycle> {
        self.calls
            .iter()
            .filter(|(event, _)| *event == id)
            .map(|(_, call)| *call)
            .collect()
    }
}

impl PlaybackHooks for RecordingHooks {
    fn on_event_start(&mut self, id: EventId, _kind: &EventKind) {
        self.calls.push((id, Lifecycle::Start));
    }

    fn on_event_playing(&mut self, id: EventId, _kind: &EventKind) {
        self.calls.push((id, Lifecycle::Playing));
    }

    fn on_event_end(&mut self, id: EventId, _kind: &EventKind) {
        self.calls.push((id, Lifecycle::End));
    }

    fn on_metronome_tick(&mut self, measure: i32, start_of_measure: bool) {
        self.ticks.push((measure, start_of_measure));
    }

    fn on_skill_star(&mut self) {
        self.skill_stars += 1;
    }

    fn on_dud(&mut self, input: InputType) {
        self.duds.push(input);
    }

    fn on_text_advance(&mut self, dismissed: bool) {
        self.text_advances.push(dismissed);
    }
}

/// Four-beat deploy at `x` expecting an A press at each offset.
pub fn deploy(x: f64, offsets: &[f64]) -> Event {
    Event::new(
        Bounds::new(x, 0.0, 4.0, 1.0),
        EventKind::Deploy(Deploy {
            inputs: offsets
                .iter()
                .map(|&beat_offset| ExpectedInput {
                    beat_offset,
                    input: InputType::A,
                })
                .collect(),
        }),
    )
}

/// Half-beat marker event at `x`.
pub fn marker(x: f64, kind: EventKind) -> Event {
    Event::new(Bounds::new(x, 0.0, 0.5, 1.0), kind)
}
