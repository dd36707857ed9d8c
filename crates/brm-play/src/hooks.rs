use std::cell::RefCell;
use std::rc::Rc;

use brm_types::{EventKind, InputType};

use crate::event::EventId;

/// Side-effect sink for playback: sound effects, animations, logging.
///
/// Every method defaults to a no-op.
pub trait PlaybackHooks {
    fn on_event_start(&mut self, _id: EventId, _kind: &EventKind) {}
    /// Called once per frame while the event is playing.
    fn on_event_playing(&mut self, _id: EventId, _kind: &EventKind) {}
    fn on_event_end(&mut self, _id: EventId, _kind: &EventKind) {}

    fn on_metronome_tick(&mut self, _measure: i32, _start_of_measure: bool) {}
    fn on_skill_star(&mut self) {}
    /// An input matched no expected input.
    fn on_dud(&mut self, _input: InputType) {}
    /// `dismissed` is false for the press and true for the release that
    /// closes the text box.
    fn on_text_advance(&mut self, _dismissed: bool) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl PlaybackHooks for NoHooks {}

/// Shared hooks, so the caller can keep reading state the engine writes.
impl<H: PlaybackHooks> PlaybackHooks for Rc<RefCell<H>> {
    fn on_event_start(&mut self, id: EventId, kind: &EventKind) {
        self.borrow_mut().on_event_start(id, kind);
    }

    fn on_event_playing(&mut self, id: EventId, kind: &EventKind) {
        self.borrow_mut().on_event_playing(id, kind);
    }

    fn on_event_end(&mut self, id: EventId, kind: &EventKind) {
        self.borrow_mut().on_event_end(id, kind);
    }

    fn on_metronome_tick(&mut self, measure: i32, start_of_measure: bool) {
        self.borrow_mut().on_metronome_tick(measure, start_of_measure);
    }

    fn on_skill_star(&mut self) {
        self.borrow_mut().on_skill_star();
    }

    fn on_dud(&mut self, input: InputType) {
        self.borrow_mut().on_dud(input);
    }

    fn on_text_advance(&mut self, dismissed: bool) {
        self.borrow_mut().on_text_advance(dismissed);
    }
}
