use brm_types::PlayState;
use log::{debug, warn};

use crate::error::TimingError;
use crate::swing::Swing;
use crate::tempo::TempoMap;

/// Session clock: playback position in seconds, the beat derived from it,
/// the play state and the audio loop counter.
///
/// `beat` is always recomputed from `seconds` through the tempo map. While the
/// map is empty the beat is pinned to 0 and the clock refuses to play.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    tempos: TempoMap,
    seconds: f64,
    beat: f64,
    play_state: PlayState,
    loop_index: i32,
}

impl Clock {
    pub fn new(tempos: TempoMap) -> Self {
        let mut clock = Self {
            tempos,
            ..Self::default()
        };
        clock.set_seconds(0.0);
        clock
    }

    pub fn tempos(&self) -> &TempoMap {
        &self.tempos
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn beat(&self) -> f64 {
        self.beat
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn loop_index(&self) -> i32 {
        self.loop_index
    }

    /// Whether `beat` is backed by a tempo map.
    pub fn is_beat_defined(&self) -> bool {
        !self.tempos.is_empty()
    }

    pub fn set_seconds(&mut self, seconds: f64) {
        self.seconds = seconds;
        self.beat = self.tempos.beat_at(seconds).unwrap_or(0.0);
    }

    /// Seeks to `beat`. Returns the new position in seconds.
    pub fn set_beat(&mut self, beat: f64) -> Result<f64, TimingError> {
        let seconds = self
            .tempos
            .seconds_at(beat)
            .ok_or(TimingError::EmptyTempoMap)?;
        self.set_seconds(seconds);
        Ok(seconds)
    }

    /// Moves time forward by `delta` seconds while playing.
    pub fn advance(&mut self, delta: f64) {
        if self.play_state == PlayState::Playing {
            self.set_seconds(self.seconds + delta);
        }
    }

    /// Changes the play state.
    ///
    /// Returns the previous state, or `None` when `state` is already current.
    /// Entering PLAYING requires a non-empty tempo map. Entering STOPPED
    /// rewinds to zero and clears the loop counter.
    pub fn transition(&mut self, state: PlayState) -> Result<Option<PlayState>, TimingError> {
        let old = self.play_state;
        if old == state {
            return Ok(None);
        }
        if state == PlayState::Playing && self.tempos.is_empty() {
            warn!("refusing {old} -> {state}: tempo map is empty");
            return Err(TimingError::EmptyTempoMap);
        }
        self.play_state = state;
        if state == PlayState::Stopped {
            self.loop_index = 0;
            self.set_seconds(0.0);
        }
        Ok(Some(old))
    }

    /// Records a wrap of looping audio. Ignored unless playing.
    pub fn wrap_loop(&mut self) {
        if self.play_state == PlayState::Playing {
            self.loop_index += 1;
            debug!("audio loop wrapped, loop index {}", self.loop_index);
        }
    }

    pub fn set_loop_index(&mut self, loop_index: i32) {
        self.loop_index = loop_index;
    }

    /// Replaces the tempo map. Refused while the clock is running and the
    /// new map is empty.
    pub fn set_tempos(&mut self, tempos: TempoMap) -> Result<(), TimingError> {
        if tempos.is_empty() && self.play_state != PlayState::Stopped {
            return Err(TimingError::LastTempoInUse {
                state: self.play_state,
            });
        }
        self.tempos = tempos;
        self.refresh_beat();
        Ok(())
    }

    pub fn add_tempo_change(
        &mut self,
        beat: f64,
        bpm: f64,
        swing: Swing,
    ) -> Result<(), TimingError> {
        self.tempos.add(beat, bpm, swing)?;
        self.refresh_beat();
        Ok(())
    }

    pub fn remove_tempo_change(&mut self, beat: f64) -> Result<(), TimingError> {
        if self.tempos.len() == 1 && self.play_state != PlayState::Stopped {
            return Err(TimingError::LastTempoInUse {
                state: self.play_state,
            });
        }
        self.tempos.remove(beat)?;
        self.refresh_beat();
        Ok(())
    }

    pub fn set_tempo_bpm(&mut self, beat: f64, bpm: f64) -> Result<(), TimingError> {
        self.tempos.set_bpm(beat, bpm)?;
        self.refresh_beat();
        Ok(())
    }

    fn refresh_beat(&mut self) {
        self.set_seconds(self.seconds);
    }
}
