use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use brm_config::EventSpec;
use brm_types::{Bounds, EventKind, InputType, PlaybackCompletion};

use crate::hooks::PlaybackHooks;
use crate::scene::SceneState;

static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an event. Clones of an event share its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u64);

impl EventId {
    fn next() -> Self {
        Self(NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an event hook may touch.
pub struct EventContext<'a> {
    pub beat: f64,
    pub scene: &'a mut SceneState,
    pub hooks: &'a mut dyn PlaybackHooks,
}

/// A timed chart event and its playback lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: EventId,
    pub bounds: Bounds,
    kind: EventKind,
    completion: PlaybackCompletion,
}

impl Event {
    pub fn new(bounds: Bounds, kind: EventKind) -> Self {
        Self {
            id: EventId::next(),
            bounds,
            kind,
            completion: PlaybackCompletion::Waiting,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut EventKind {
        &mut self.kind
    }

    pub fn completion(&self) -> PlaybackCompletion {
        self.completion
    }

    pub(crate) fn set_completion(&mut self, completion: PlaybackCompletion) {
        self.completion = completion;
    }

    /// Whether a skipped event must still run its hooks once.
    pub fn always_simulated(&self) -> bool {
        self.kind.always_simulated()
    }

    pub fn is_updateable(&self, beat: f64) -> bool {
        self.bounds.contains_beat(beat)
    }

    pub fn upper_bound(&self) -> f64 {
        self.bounds.max_x()
    }

    /// Absolute beats of the inputs this event expects.
    pub fn expected_inputs(&self) -> impl Iterator<Item = (f64, InputType)> + '_ {
        let inputs = match &self.kind {
            EventKind::Deploy(deploy) => deploy.inputs.as_slice(),
            _ => &[],
        };
        inputs
            .iter()
            .map(|i| (self.bounds.x + i.beat_offset, i.input))
    }

    pub fn to_spec(&self) -> EventSpec {
        EventSpec::new(self.bounds, self.kind.clone())
    }

    fn progress(&self, beat: f64) -> f64 {
        if self.bounds.width <= 0.0 {
            return 1.0;
        }
        ((beat - self.bounds.x) / self.bounds.width).clamp(0.0, 1.0)
    }

    pub(crate) fn on_start(&mut self, ctx: &mut EventContext<'_>) {
        ctx.hooks.on_event_start(self.id, &self.kind);
        match &self.kind {
            EventKind::TempoMarker { bpm } => ctx.scene.marker_bpm = Some(*bpm),
            EventKind::MusicVolume { volume } => ctx.scene.music_volume = volume.clamp(0.0, 1.0),
            EventKind::TextBox(text_box) => ctx.scene.open_text_box(self.id, text_box),
            EventKind::BgImage(image) => ctx.scene.show_image(self.id, image),
            EventKind::Spotlight(spotlight) => ctx.scene.light_spotlight(self.id, spotlight),
            EventKind::SongInfo(info) => {
                ctx.scene
                    .show_song_banner(self.id, info, self.progress(ctx.beat))
            }
            EventKind::End | EventKind::SkillStar | EventKind::Deploy(_) => {}
        }
    }

    pub(crate) fn while_playing(&mut self, ctx: &mut EventContext<'_>) {
        ctx.hooks.on_event_playing(self.id, &self.kind);
        let progress = self.progress(ctx.beat);
        match &self.kind {
            EventKind::BgImage(_) => ctx.scene.set_image_progress(self.id, progress),
            EventKind::SongInfo(info) => ctx.scene.show_song_banner(self.id, info, progress),
            _ => {}
        }
    }

    pub(crate) fn on_end(&mut self, ctx: &mut EventContext<'_>) {
        ctx.hooks.on_event_end(self.id, &self.kind);
        match &self.kind {
            EventKind::TextBox(text_box) if !text_box.requires_input => {
                ctx.scene.close_text_box(self.id)
            }
            EventKind::BgImage(_) => ctx.scene.hide_image(self.id),
            EventKind::Spotlight(_) => ctx.scene.clear_spotlight(self.id),
            EventKind::SongInfo(_) => ctx.scene.hide_song_banner(self.id),
            _ => {}
        }
    }
}

impl From<EventSpec> for Event {
    fn from(spec: EventSpec) -> Self {
        Self::new(spec.bounds, spec.kind)
    }
}

impl From<&EventSpec> for Event {
    fn from(spec: &EventSpec) -> Self {
        Self::new(spec.bounds, spec.kind.clone())
    }
}
