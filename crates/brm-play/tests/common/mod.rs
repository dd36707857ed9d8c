//! Shared fixtures for the session integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use brm_config::SessionConfig;
use brm_play::{Engine, EngineListener, Event, EventId, PlaybackHooks};
use brm_timing::Swing;
use brm_types::{Bounds, Deploy, EventKind, ExpectedInput, InputResult, InputType, PlayState};

/// Everything the engine reported through hooks and listeners.
#[derive(Debug, Default)]
pub struct Recorder {
    pub starts: Vec<EventId>,
    pub playing: Vec<EventId>,
    pub ends: Vec<EventId>,
    pub skill_stars: usize,
    pub duds: Vec<InputType>,
    pub state_changes: Vec<(PlayState, PlayState)>,
    pub added: Vec<EventId>,
    pub removed: Vec<EventId>,
    pub inputs: Vec<InputResult>,
}

impl Recorder {
    pub fn count(calls: &[EventId], id: EventId) -> usize {
        calls.iter().filter(|c| **c == id).count()
    }
}

impl PlaybackHooks for Recorder {
    fn on_event_start(&mut self, id: EventId, _kind: &EventKind) {
        self.starts.push(id);
    }

    fn on_event_playing(&mut self, id: EventId, _kind: &EventKind) {
        self.playing.push(id);
    }

    fn on_event_end(&mut self, id: EventId, _kind: &EventKind) {
        self.ends.push(id);
    }

    fn on_skill_star(&mut self) {
        self.skill_stars += 1;
    }

    fn on_dud(&mut self, input: InputType) {
        self.duds.push(input);
    }
}

/// Listener half of a shared [`Recorder`].
pub struct RecordingListener(pub Rc<RefCell<Recorder>>);

impl EngineListener for RecordingListener {
    fn on_play_state_changed(&mut self, old: PlayState, new: PlayState) {
        self.0.borrow_mut().state_changes.push((old, new));
    }

    fn on_event_added(&mut self, event: &Event) {
        self.0.borrow_mut().added.push(event.id());
    }

    fn on_event_removed(&mut self, event: &Event) {
        self.0.borrow_mut().removed.push(event.id());
    }

    fn on_input_received(&mut self, result: &InputResult) {
        self.0.borrow_mut().inputs.push(*result);
    }
}

/// A stopped session at a constant `bpm` with a shared recorder attached.
pub fn session(bpm: f64) -> (Engine, Rc<RefCell<Recorder>>) {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let mut engine = Engine::new(SessionConfig::default());
    engine.add_tempo_change(0.0, bpm, Swing::Straight).unwrap();
    engine.set_hooks(Box::new(recorder.clone()));
    engine.subscribe(Box::new(RecordingListener(recorder.clone())));
    (engine, recorder)
}

/// Deploy at `x` expecting one input per `(offset, input)`.
pub fn deploy(x: f64, width: f64, inputs: &[(f64, InputType)]) -> Event {
    Event::new(
        Bounds::new(x, 0.0, width, 1.0),
        EventKind::Deploy(Deploy {
            inputs: inputs
                .iter()
                .map(|&(beat_offset, input)| ExpectedInput { beat_offset, input })
                .collect(),
        }),
    )
}

pub fn end_at(x: f64) -> Event {
    Event::new(Bounds::new(x, 0.0, 1.0, 4.0), EventKind::End)
}

/// Runs `frames` updates of `delta` seconds.
pub fn run(engine: &mut Engine, frames: usize, delta: f64) {
    for _ in 0..frames {
        engine.update(delta);
    }
}
