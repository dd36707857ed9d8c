use std::cmp::Ordering;

use brm_types::{EventKind, InputType, PlaybackCompletion};
use log::debug;

use crate::error::PlayError;
use crate::event::{Event, EventContext, EventId};

/// Statistics derived from the event collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStats {
    /// Beat at which playback stops: the end marker, else the furthest event
    /// end, else infinity.
    pub duration: f64,
    /// Furthest-right chart position.
    pub last_point: f64,
    /// Beat of the earliest skill-star marker, infinity when absent.
    pub skill_star_beat: f64,
    /// Some non-end event reaches the top of the visible tracks.
    pub events_touch_track_top: bool,
    pub expected_inputs: usize,
}

impl Default for ChartStats {
    fn default() -> Self {
        Self {
            duration: f64::INFINITY,
            last_point: 0.0,
            skill_star_beat: f64::INFINITY,
            events_touch_track_top: false,
            expected_inputs: 0,
        }
    }
}

impl ChartStats {
    pub fn has_skill_star(&self) -> bool {
        self.skill_star_beat.is_finite()
    }
}

/// Ordered event collection driving each event's lifecycle from the beat.
#[derive(Debug, Clone)]
pub struct EventScheduler {
    events: Vec<Event>,
    stats: ChartStats,
    track_count: i32,
    dirty: bool,
}

impl EventScheduler {
    pub fn new(track_count: i32) -> Self {
        Self {
            events: Vec::new(),
            stats: ChartStats::default(),
            track_count,
            dirty: false,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.get(id).is_some()
    }

    pub fn stats(&self) -> &ChartStats {
        &self.stats
    }

    pub fn track_count(&self) -> i32 {
        self.track_count
    }

    pub fn add(&mut self, event: Event) -> Result<EventId, PlayError> {
        let id = event.id();
        if self.contains(id) {
            return Err(PlayError::DuplicateEvent(id));
        }
        self.events.push(event);
        self.dirty = true;
        self.refresh();
        Ok(id)
    }

    pub fn remove(&mut self, id: EventId) -> Result<Event, PlayError> {
        let index = self
            .events
            .iter()
            .position(|e| e.id() == id)
            .ok_or(PlayError::EventNotFound(id))?;
        let removed = self.events.remove(index);
        self.dirty = true;
        self.refresh();
        Ok(removed)
    }

    /// Adds every event not already present. Returns the ids that were added.
    pub fn add_all<I>(&mut self, events: I) -> Vec<EventId>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut added = Vec::new();
        for event in events {
            let id = event.id();
            if self.contains(id) || added.contains(&id) {
                continue;
            }
            self.events.push(event);
            added.push(id);
            self.dirty = true;
        }
        self.refresh();
        added
    }

    /// Removes every listed event that is present and returns them.
    pub fn remove_all(&mut self, ids: &[EventId]) -> Vec<Event> {
        let (removed, kept): (Vec<Event>, Vec<Event>) = std::mem::take(&mut self.events)
            .into_iter()
            .partition(|e| ids.contains(&e.id()));
        self.events = kept;
        if !removed.is_empty() {
            self.dirty = true;
        }
        self.refresh();
        removed
    }

    /// Mutates one event in place, then re-sorts and refreshes statistics.
    pub fn edit<F>(&mut self, id: EventId, edit: F) -> Result<(), PlayError>
    where
        F: FnOnce(&mut Event),
    {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(PlayError::EventNotFound(id))?;
        edit(event);
        self.dirty = true;
        self.refresh();
        Ok(())
    }

    /// Changes the visible track count and stretches end markers to span it.
    pub fn set_track_count(&mut self, track_count: i32) {
        self.track_count = track_count;
        for event in self.events.iter_mut().filter(|e| e.kind().is_end()) {
            event.bounds.y = 0.0;
            event.bounds.height = track_count as f64;
        }
        self.dirty = true;
        self.refresh();
    }

    /// Whether every non-end event fits within `track_count` tracks.
    pub fn would_fit_track_count(&self, track_count: i32) -> bool {
        if track_count < 1 {
            return false;
        }
        self.events
            .iter()
            .filter(|e| !e.kind().is_end())
            .all(|e| e.bounds.max_y().round() as i32 <= track_count)
    }

    /// Absolute beats of every expected input in the chart, in event order.
    pub fn expected_inputs(&self) -> Vec<(f64, InputType)> {
        self.events.iter().flat_map(Event::expected_inputs).collect()
    }

    /// Sorts and recomputes statistics if anything changed since the last
    /// refresh.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.events.sort_by(compare_position);
        self.stats = self.compute_stats();
        self.dirty = false;
    }

    fn compute_stats(&self) -> ChartStats {
        let end = self.events.iter().find(|e| e.kind().is_end());
        let furthest = self
            .events
            .iter()
            .map(|e| e.bounds.max_x())
            .max_by(f64::total_cmp);
        let duration = end
            .map(|e| e.bounds.x)
            .or(furthest)
            .unwrap_or(f64::INFINITY);
        let last_point = end.map(|e| e.bounds.x).or(furthest).unwrap_or(0.0);
        let skill_star_beat = self
            .events
            .iter()
            .find(|e| matches!(e.kind(), EventKind::SkillStar))
            .map_or(f64::INFINITY, |e| e.bounds.x);
        let events_touch_track_top = self
            .events
            .iter()
            .filter(|e| !e.kind().is_end())
            .any(|e| e.bounds.max_y() as i32 >= self.track_count);
        let expected_inputs = self.events.iter().map(|e| e.expected_inputs().count()).sum();
        ChartStats {
            duration,
            last_point,
            skill_star_beat,
            events_touch_track_top,
            expected_inputs,
        }
    }

    /// Puts every event into its starting state for playback from `beat`.
    ///
    /// Events entirely behind `beat` finish immediately; always-simulated
    /// ones first run their whole lifecycle once. The rest wait.
    pub fn catch_up(&mut self, beat: f64, ctx: &mut EventContext<'_>) {
        let mut simulated = 0;
        for event in &mut self.events {
            if event.upper_bound() < beat {
                if event.always_simulated() {
                    event.set_completion(PlaybackCompletion::Playing);
                    event.on_start(ctx);
                    event.while_playing(ctx);
                    event.set_completion(PlaybackCompletion::Finished);
                    event.on_end(ctx);
                    simulated += 1;
                }
                event.set_completion(PlaybackCompletion::Finished);
            } else {
                event.set_completion(PlaybackCompletion::Waiting);
            }
        }
        debug!("caught up to beat {beat}, simulated {simulated} skipped events");
    }

    /// Advances every unfinished event to `beat`, in collection order.
    pub fn update(&mut self, beat: f64, ctx: &mut EventContext<'_>) {
        for event in &mut self.events {
            if event.completion() != PlaybackCompletion::Finished {
                update_event(event, beat, ctx);
            }
        }
    }
}

fn update_event(event: &mut Event, beat: f64, ctx: &mut EventContext<'_>) {
    if event.completion() == PlaybackCompletion::Waiting {
        if event.is_updateable(beat) {
            event.set_completion(PlaybackCompletion::Playing);
            event.on_start(ctx);
        } else if beat >= event.upper_bound() {
            // skipped over in a single frame
            if event.always_simulated() {
                event.set_completion(PlaybackCompletion::Playing);
                event.on_start(ctx);
                event.while_playing(ctx);
            }
            event.on_end(ctx);
            event.set_completion(PlaybackCompletion::Finished);
        }
    }

    if event.completion() == PlaybackCompletion::Playing {
        event.while_playing(ctx);
        if beat >= event.upper_bound() {
            event.set_completion(PlaybackCompletion::Finished);
            event.on_end(ctx);
        }
    }
}

fn compare_position(a: &Event, b: &Event) -> Ordering {
    a.bounds
        .x
        .total_cmp(&b.bounds.x)
        .then_with(|| a.bounds.y.total_cmp(&b.bounds.y))
        .then_with(|| a.id().cmp(&b.id()))
}
