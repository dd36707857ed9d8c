use std::collections::HashMap;

use brm_audio::{AudioSyncAdapter, SeekFlag};
use brm_config::SessionConfig;
use brm_timing::{Clock, Swing, TempoMap, TimeSignatureMap, TimingError};
use brm_types::{InputResult, InputType, PlayState, ResultsText, Score};
use log::{debug, info, warn};

use crate::error::PlayError;
use crate::event::{Event, EventContext, EventId};
use crate::hooks::{NoHooks, PlaybackHooks};
use crate::judge::{JudgeWindows, JudgmentEngine};
use crate::listener::{EngineListener, ListenerId, Listeners};
use crate::metronome::Metronome;
use crate::music::MusicSync;
use crate::scene::SceneState;
use crate::scheduler::{ChartStats, EventScheduler};
use crate::score::ScoreCalculator;

/// A play session: clock, events, judgment and music, stepped by the caller
/// once per frame.
pub struct Engine {
    clock: Clock,
    time_signatures: TimeSignatureMap,
    scheduler: EventScheduler,
    judgment: JudgmentEngine,
    config: SessionConfig,
    results_text: ResultsText,
    music: Option<MusicSync>,
    seek_flag: SeekFlag,
    metronome: Metronome,
    scene: SceneState,
    listeners: Listeners,
    hooks: Box<dyn PlaybackHooks>,
    held_inputs: HashMap<InputType, bool>,
}

impl Engine {
    pub fn new(config: SessionConfig) -> Self {
        let config = config.normalized();
        Self {
            clock: Clock::default(),
            time_signatures: TimeSignatureMap::new(),
            scheduler: EventScheduler::new(config.track_count),
            judgment: JudgmentEngine::default(),
            results_text: ResultsText::default(),
            music: None,
            seek_flag: SeekFlag::new(),
            metronome: Metronome::new(),
            scene: SceneState::default(),
            listeners: Listeners::new(),
            hooks: Box::new(NoHooks),
            held_inputs: HashMap::new(),
            config,
        }
    }

    // ---- clock ----

    pub fn play_state(&self) -> PlayState {
        self.clock.play_state()
    }

    pub fn seconds(&self) -> f64 {
        self.clock.seconds()
    }

    pub fn beat(&self) -> f64 {
        self.clock.beat()
    }

    pub fn loop_index(&self) -> i32 {
        self.clock.loop_index()
    }

    /// Changes the play state. Same-state requests are ignored; PLAYING is
    /// refused while the tempo map is empty.
    pub fn set_play_state(&mut self, state: PlayState) -> Result<(), PlayError> {
        let old = match self.clock.transition(state) {
            Ok(Some(old)) => old,
            Ok(None) => return Ok(()),
            Err(err) => {
                warn!("cannot enter {state}: {err}");
                return Err(err.into());
            }
        };
        info!("play state {old} -> {state}");

        match state {
            PlayState::Stopped => {
                if let Some(music) = &mut self.music {
                    music.pause();
                }
                self.scene.reset();
            }
            PlayState::Paused => {
                if let Some(music) = &mut self.music {
                    music.pause();
                }
            }
            PlayState::Playing => {
                if old == PlayState::Stopped {
                    self.begin_run()?;
                }
                if let Some(music) = &mut self.music {
                    music.start(
                        &mut self.clock,
                        self.config.music_start_sec,
                        self.scene.music_volume,
                        self.config.music_muted,
                    );
                }
            }
        }

        self.listeners
            .notify(|l| l.on_play_state_changed(old, state));
        Ok(())
    }

    /// Resets the session for a run starting at the playback-start beat.
    fn begin_run(&mut self) -> Result<(), PlayError> {
        self.scheduler.refresh();
        let start = self.config.playback_start;
        self.clock.set_beat(start)?;
        self.scene.reset();
        self.held_inputs.clear();

        let beat = self.clock.beat();
        let mut ctx = EventContext {
            beat,
            scene: &mut self.scene,
            hooks: self.hooks.as_mut(),
        };
        self.scheduler.catch_up(beat, &mut ctx);

        let skill_star_beat = self.scheduler.stats().skill_star_beat;
        self.judgment
            .arm(self.scheduler.expected_inputs(), start, skill_star_beat);
        self.metronome.reset(start);
        Ok(())
    }

    fn change_state(&mut self, state: PlayState) {
        if let Err(err) = self.set_play_state(state) {
            warn!("play state change to {state} failed: {err}");
        }
    }

    /// Advances the session by one frame of `delta` seconds.
    pub fn update(&mut self, delta: f64) {
        self.update_text_box(delta);
        if self.clock.play_state() != PlayState::Playing {
            return;
        }

        if let Some(music) = &mut self.music {
            music.step(delta, self.config.audio_damping);
        }
        self.clock.advance(delta);
        if let Some(music) = &mut self.music {
            music.resync(&mut self.clock, self.config.music_start_sec);
            if music.track().is_playing() {
                music.apply_volume(self.scene.music_volume, self.config.music_muted);
            }
        }

        let beat = self.clock.beat();
        let mut ctx = EventContext {
            beat,
            scene: &mut self.scene,
            hooks: self.hooks.as_mut(),
        };
        self.scheduler.update(beat, &mut ctx);

        if let Some(tick) = self.metronome.update(beat, &self.time_signatures) {
            if self.config.metronome {
                self.hooks
                    .on_metronome_tick(tick.measure, tick.start_of_measure);
            }
        }

        if self.scene.take_pause_request() {
            self.change_state(PlayState::Paused);
        }
        if self.clock.play_state() != PlayState::Stopped && beat >= self.scheduler.stats().duration {
            info!("reached chart end at beat {beat:.3}");
            self.change_state(PlayState::Stopped);
        }
    }

    fn update_text_box(&mut self, delta: f64) {
        let Some(text_box) = self.scene.text_box.as_mut() else {
            return;
        };
        if !text_box.requires_input {
            return;
        }
        if text_box.secs_before_can_input > 0.0 {
            text_box.secs_before_can_input -= delta;
        }
        if text_box.secs_before_can_input <= 0.0 && !self.config.requires_player_input {
            debug!("dismissing text box {} without player input", text_box.source);
            self.scene.text_box = None;
            self.change_state(PlayState::Playing);
        }
    }

    // ---- timing maps ----

    pub fn tempos(&self) -> &TempoMap {
        self.clock.tempos()
    }

    pub fn set_tempos(&mut self, tempos: TempoMap) -> Result<(), PlayError> {
        Ok(self.clock.set_tempos(tempos)?)
    }

    pub fn add_tempo_change(&mut self, beat: f64, bpm: f64, swing: Swing) -> Result<(), PlayError> {
        Ok(self.clock.add_tempo_change(beat, bpm, swing)?)
    }

    pub fn remove_tempo_change(&mut self, beat: f64) -> Result<(), PlayError> {
        Ok(self.clock.remove_tempo_change(beat)?)
    }

    pub fn set_tempo_bpm(&mut self, beat: f64, bpm: f64) -> Result<(), PlayError> {
        Ok(self.clock.set_tempo_bpm(beat, bpm)?)
    }

    pub fn time_signatures(&self) -> &TimeSignatureMap {
        &self.time_signatures
    }

    pub fn time_signatures_mut(&mut self) -> &mut TimeSignatureMap {
        &mut self.time_signatures
    }

    // ---- events ----

    pub fn events(&self) -> &[Event] {
        self.scheduler.events()
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.scheduler.get(id)
    }

    pub fn stats(&self) -> ChartStats {
        *self.scheduler.stats()
    }

    pub fn add_event(&mut self, event: Event) -> Result<EventId, PlayError> {
        let id = self.scheduler.add(event)?;
        if let Some(event) = self.scheduler.get(id) {
            self.listeners.notify(|l| l.on_event_added(event));
        }
        Ok(id)
    }

    pub fn remove_event(&mut self, id: EventId) -> Result<Event, PlayError> {
        let removed = self.scheduler.remove(id)?;
        self.listeners.notify(|l| l.on_event_removed(&removed));
        Ok(removed)
    }

    /// Adds every event not already in the session.
    pub fn add_all_events<I>(&mut self, events: I) -> Vec<EventId>
    where
        I: IntoIterator<Item = Event>,
    {
        let added = self.scheduler.add_all(events);
        for id in &added {
            if let Some(event) = self.scheduler.get(*id) {
                self.listeners.notify(|l| l.on_event_added(event));
            }
        }
        added
    }

    pub fn remove_all_events(&mut self, ids: &[EventId]) -> Vec<Event> {
        let removed = self.scheduler.remove_all(ids);
        for event in &removed {
            self.listeners.notify(|l| l.on_event_removed(event));
        }
        removed
    }

    pub fn edit_event<F>(&mut self, id: EventId, edit: F) -> Result<(), PlayError>
    where
        F: FnOnce(&mut Event),
    {
        self.scheduler.edit(id, edit)
    }

    // ---- input and scoring ----

    /// Handles a press (`down`) or release of `input`.
    ///
    /// While a text box is open, A only drives the text box. Otherwise a
    /// press during playback is judged; returns the recorded result, or
    /// `None` for duds and ignored inputs.
    pub fn fire_input(&mut self, input: InputType, down: bool) -> Option<InputResult> {
        self.held_inputs.insert(input, down);

        if input == InputType::A {
            if let Some(text_box) = &self.scene.text_box {
                if text_box.can_dismiss() {
                    if down {
                        self.hooks.on_text_advance(false);
                    } else {
                        self.hooks.on_text_advance(true);
                        self.scene.text_box = None;
                        self.change_state(PlayState::Playing);
                    }
                }
                return None;
            }
        }

        if !down || self.clock.play_state() != PlayState::Playing {
            return None;
        }
        let beat = self.clock.beat();
        match self.judgment.submit(input, beat, self.clock.tempos()) {
            Some(result) => {
                self.listeners.notify(|l| l.on_input_received(&result));
                if self.judgment.is_skill_star_hit(&result) {
                    self.fire_skill_star();
                }
                Some(result)
            }
            None => {
                debug!("dud {input:?} at beat {beat:.3}");
                self.hooks.on_dud(input);
                None
            }
        }
    }

    pub fn is_input_held(&self, input: InputType) -> bool {
        self.held_inputs.get(&input).copied().unwrap_or(false)
    }

    /// Awards the skill star once per run. Returns whether it was awarded.
    pub fn fire_skill_star(&mut self) -> bool {
        if !self.judgment.fire_skill_star() {
            return false;
        }
        info!("skill star earned");
        self.hooks.on_skill_star();
        true
    }

    pub fn compute_score(&self) -> Score {
        ScoreCalculator::new(self.judgment.expected_count()).compute(
            self.judgment.results(),
            self.judgment.got_skill_star(),
            &self.results_text,
        )
    }

    pub fn judgment(&self) -> &JudgmentEngine {
        &self.judgment
    }

    pub fn set_judge_windows(&mut self, windows: JudgeWindows) {
        self.judgment.set_windows(windows);
    }

    pub fn results_text(&self) -> &ResultsText {
        &self.results_text
    }

    pub fn set_results_text(&mut self, results_text: ResultsText) {
        self.results_text = results_text;
    }

    // ---- music ----

    /// Replaces the music track, returning the previous one paused.
    pub fn set_music(
        &mut self,
        track: Option<Box<dyn AudioSyncAdapter>>,
    ) -> Option<Box<dyn AudioSyncAdapter>> {
        let old = self.music.take().map(|mut music| {
            music.pause();
            music.into_track()
        });
        self.music = track.map(|track| MusicSync::new(track, self.seek_flag.clone()));
        if self.clock.play_state() == PlayState::Playing {
            if let Some(music) = &mut self.music {
                music.start(
                    &mut self.clock,
                    self.config.music_start_sec,
                    self.scene.music_volume,
                    self.config.music_muted,
                );
            }
        }
        old
    }

    pub fn music(&self) -> Option<&dyn AudioSyncAdapter> {
        self.music.as_ref().map(MusicSync::track)
    }

    pub fn music_mut(&mut self) -> Option<&mut dyn AudioSyncAdapter> {
        self.music.as_mut().map(MusicSync::track_mut)
    }

    /// Moves the music track to the clock position.
    pub fn seek_music(&mut self) {
        if let Some(music) = &mut self.music {
            music.seek(&mut self.clock, self.config.music_start_sec);
        }
    }

    /// Jumps to `beat`.
    ///
    /// While stopped this moves the playback start. Otherwise the clock and
    /// music move, and events are re-primed as if playback had started there.
    pub fn seek_to_beat(&mut self, beat: f64) -> Result<(), PlayError> {
        if !beat.is_finite() || beat < 0.0 {
            return Err(TimingError::InvalidBeat { beat }.into());
        }
        let state = self.clock.play_state();
        if state == PlayState::Stopped {
            self.config.playback_start = beat;
            return Ok(());
        }

        self.clock.set_beat(beat)?;
        self.scene.reset();
        let mut ctx = EventContext {
            beat,
            scene: &mut self.scene,
            hooks: self.hooks.as_mut(),
        };
        self.scheduler.catch_up(beat, &mut ctx);
        self.metronome.reset(beat);

        if let Some(music) = &mut self.music {
            if state == PlayState::Playing {
                music.start(
                    &mut self.clock,
                    self.config.music_start_sec,
                    self.scene.music_volume,
                    self.config.music_muted,
                );
            } else {
                music.reset();
                music.seek(&mut self.clock, self.config.music_start_sec);
            }
        }
        info!("seeked to beat {beat:.3} ({:.3}s)", self.clock.seconds());
        Ok(())
    }

    /// Handle to the flag raised during programmatic music seeks.
    pub fn seek_flag(&self) -> SeekFlag {
        self.seek_flag.clone()
    }

    // ---- observers ----

    pub fn subscribe(&mut self, listener: Box<dyn EngineListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Returns whether the listener was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id).is_some()
    }

    /// Installs playback hooks, returning the previous ones.
    pub fn set_hooks(&mut self, hooks: Box<dyn PlaybackHooks>) -> Box<dyn PlaybackHooks> {
        std::mem::replace(&mut self.hooks, hooks)
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    // ---- session settings ----

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn track_count(&self) -> i32 {
        self.config.track_count
    }

    /// Clamps the track count and stretches end markers to match.
    pub fn set_track_count(&mut self, track_count: i32) {
        self.config.set_track_count(track_count);
        self.scheduler.set_track_count(self.config.track_count);
    }

    pub fn would_events_fit_new_track_count(&self, track_count: i32) -> bool {
        self.scheduler.would_fit_track_count(track_count)
    }

    pub fn can_increase_track_count(&self) -> bool {
        self.config.track_count < SessionConfig::MAX_TRACK_COUNT
    }

    pub fn can_decrease_track_count(&self) -> bool {
        self.config.track_count > SessionConfig::MIN_TRACK_COUNT
    }

    pub fn bouncer_count(&self) -> i32 {
        self.config.bouncer_count
    }

    pub fn set_bouncer_count(&mut self, bouncer_count: i32) {
        self.config.set_bouncer_count(bouncer_count);
    }

    pub fn difficulty(&self) -> i32 {
        self.config.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: i32) {
        self.config.set_difficulty(difficulty);
    }

    /// Filled stars for the difficulty followed by empty ones; empty when
    /// the difficulty is unset.
    pub fn difficulty_string(&self) -> String {
        let difficulty = self.config.difficulty;
        if difficulty == 0 {
            return String::new();
        }
        let empty = SessionConfig::MAX_DIFFICULTY - difficulty;
        format!(
            "{}{}",
            "★".repeat(difficulty as usize),
            "☆".repeat(empty as usize)
        )
    }

    pub fn set_playback_start(&mut self, beat: f64) {
        self.config.playback_start = beat;
    }

    pub fn set_music_start_sec(&mut self, seconds: f64) {
        self.config.music_start_sec = seconds;
    }

    pub fn set_metronome(&mut self, enabled: bool) {
        self.config.metronome = enabled;
    }

    pub fn set_music_muted(&mut self, muted: bool) {
        self.config.music_muted = muted;
    }

    pub fn set_requires_player_input(&mut self, required: bool) {
        self.config.requires_player_input = required;
    }

    pub fn set_audio_damping(&mut self, damping: f64) {
        self.config.audio_damping = damping;
        self.config = self.config.normalized();
    }

    pub fn debug_string(&self) -> String {
        let tempo = self
            .clock
            .tempos()
            .tempo_at_seconds(self.clock.seconds())
            .map_or_else(|| "none".to_string(), |bpm| bpm.to_string());
        format!(
            "beat: {}\nseconds: {}\ntempo: {}\nevents: {}\nplayState: {}",
            self.clock.beat(),
            self.clock.seconds(),
            tempo,
            self.scheduler.len(),
            self.clock.play_state()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::test_utils::{RecordingHooks, deploy, marker};
    use brm_types::{EventKind, TextBox};

    fn engine_120() -> Engine {
        let mut engine = Engine::new(SessionConfig::default());
        engine.add_tempo_change(0.0, 120.0, Swing::Straight).unwrap();
        engine
    }

    #[test]
    fn refuses_to_play_without_tempo() {
        let mut engine = Engine::new(SessionConfig::default());
        assert_eq!(
            engine.set_play_state(PlayState::Playing),
            Err(PlayError::Timing(TimingError::EmptyTempoMap))
        );
        assert_eq!(engine.play_state(), PlayState::Stopped);
    }

    #[test]
    fn stops_at_chart_end() {
        let mut engine = engine_120();
        engine.add_event(marker(2.0, EventKind::End)).unwrap();
        engine.set_play_state(PlayState::Playing).unwrap();
        for _ in 0..70 {
            engine.update(1.0 / 60.0);
        }
        assert_eq!(engine.play_state(), PlayState::Stopped);
        assert_eq!(engine.seconds(), 0.0);
    }

    #[test]
    fn input_text_box_pauses_until_released() {
        let mut engine = engine_120();
        engine
            .add_event(marker(
                0.5,
                EventKind::TextBox(TextBox {
                    text: "Press A".into(),
                    requires_input: true,
                    secs_before_can_input: 0.5,
                }),
            ))
            .unwrap();
        engine.set_play_state(PlayState::Playing).unwrap();
        for _ in 0..20 {
            engine.update(0.05);
        }
        assert_eq!(engine.play_state(), PlayState::Paused);
        // the lock-out has run out while paused
        assert!(engine.scene().text_box.as_ref().unwrap().can_dismiss());

        assert!(engine.fire_input(InputType::A, true).is_none());
        assert_eq!(engine.play_state(), PlayState::Paused);
        engine.fire_input(InputType::A, false);
        assert_eq!(engine.play_state(), PlayState::Playing);
        assert!(engine.scene().text_box.is_none());
    }

    #[test]
    fn robot_mode_dismisses_text_boxes() {
        let mut engine = engine_120();
        engine.set_requires_player_input(false);
        engine
            .add_event(marker(
                0.25,
                EventKind::TextBox(TextBox {
                    text: "Watch".into(),
                    requires_input: true,
                    secs_before_can_input: 0.2,
                }),
            ))
            .unwrap();
        engine.set_play_state(PlayState::Playing).unwrap();
        engine.update(0.2);
        assert_eq!(engine.play_state(), PlayState::Paused);
        engine.update(0.1);
        engine.update(0.1);
        assert_eq!(engine.play_state(), PlayState::Playing);
    }

    #[test]
    fn dud_reaches_hooks() {
        let hooks = Rc::new(RefCell::new(RecordingHooks::default()));
        let mut engine = engine_120();
        engine.set_hooks(Box::new(hooks.clone()));
        engine.add_event(deploy(0.0, &[3.0])).unwrap();
        engine.set_play_state(PlayState::Playing).unwrap();
        engine.update(0.1);

        assert!(engine.fire_input(InputType::A, true).is_none());
        assert!(engine.is_input_held(InputType::A));
        engine.fire_input(InputType::A, false);
        assert!(!engine.is_input_held(InputType::A));
        assert_eq!(hooks.borrow().duds, vec![InputType::A]);
        assert!(engine.judgment().results().is_empty());
    }

    #[test]
    fn input_ignored_unless_playing() {
        let hooks = Rc::new(RefCell::new(RecordingHooks::default()));
        let mut engine = engine_120();
        engine.set_hooks(Box::new(hooks.clone()));
        assert!(engine.fire_input(InputType::A, true).is_none());
        assert!(hooks.borrow().duds.is_empty());
    }

    #[test]
    fn metronome_ticks_only_when_enabled() {
        let hooks = Rc::new(RefCell::new(RecordingHooks::default()));
        let mut engine = engine_120();
        engine.set_hooks(Box::new(hooks.clone()));
        engine.time_signatures_mut().add(0, 4).unwrap();
        engine.set_play_state(PlayState::Playing).unwrap();
        for _ in 0..4 {
            engine.update(0.25);
        }
        assert!(hooks.borrow().ticks.is_empty());

        engine.set_metronome(true);
        for _ in 0..4 {
            engine.update(0.25);
        }
        // beats 2.5..4.0: the last beat of measure 0, then the next downbeat
        assert_eq!(hooks.borrow().ticks, vec![(0, false), (1, true)]);
    }

    #[test]
    fn difficulty_string_renders_stars() {
        let mut engine = engine_120();
        assert_eq!(engine.difficulty_string(), "");
        engine.set_difficulty(2);
        assert_eq!(engine.difficulty_string(), "★★☆☆☆");
        engine.set_difficulty(9);
        assert_eq!(engine.difficulty_string(), "★★★★★");
    }

    #[test]
    fn track_count_bounds() {
        let mut engine = engine_120();
        assert!(engine.can_increase_track_count());
        assert!(!engine.can_decrease_track_count());
        engine.set_track_count(8);
        assert!(!engine.can_increase_track_count());
        engine.set_track_count(1);
        assert_eq!(engine.track_count(), 4);
    }

    #[test]
    fn debug_string_lists_state() {
        let engine = engine_120();
        let text = engine.debug_string();
        assert!(text.contains("tempo: 120"));
        assert!(text.contains("events: 0"));
        assert!(text.ends_with("playState: STOPPED"));
    }
}
