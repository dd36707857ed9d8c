use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::TimingError;
use crate::swing::Swing;

/// A tempo change starting at `beat`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    pub beat: f64,
    pub bpm: f64,
    #[serde(default)]
    pub swing: Swing,
    /// Derived start time, recomputed by the owning map.
    #[serde(skip)]
    seconds: f64,
}

impl TempoChange {
    pub fn new(beat: f64, bpm: f64, swing: Swing) -> Self {
        Self {
            beat,
            bpm,
            swing,
            seconds: 0.0,
        }
    }

    /// Start time of this change in seconds.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }
}

/// Seconds between two beats at a constant `bpm`.
pub fn seconds_between(from_beat: f64, to_beat: f64, bpm: f64) -> f64 {
    if bpm <= 0.0 || from_beat == to_beat {
        return 0.0;
    }
    (to_beat - from_beat) * 60.0 / bpm
}

/// Ordered tempo changes with cached start times.
///
/// The first change governs everything before it, so the map behaves as if
/// its first entry sat at beat 0. Conversions return `None` on an empty map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TempoMap {
    changes: Vec<TempoChange>,
}

impl TempoMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from unordered changes, rejecting duplicates.
    pub fn from_changes<I>(changes: I) -> Result<Self, TimingError>
    where
        I: IntoIterator<Item = TempoChange>,
    {
        let mut map = Self::new();
        for change in changes {
            map.add(change.beat, change.bpm, change.swing)?;
        }
        Ok(map)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn changes(&self) -> &[TempoChange] {
        &self.changes
    }

    /// Inserts a tempo change, keeping the map sorted by beat.
    pub fn add(&mut self, beat: f64, bpm: f64, swing: Swing) -> Result<(), TimingError> {
        validate_beat(beat)?;
        validate_bpm(bpm)?;
        let beat = beat + 0.0;
        let index = match self.search_beat(beat) {
            Ok(_) => return Err(TimingError::DuplicateTempoChange { beat }),
            Err(index) => index,
        };
        self.changes.insert(index, TempoChange::new(beat, bpm, swing));
        self.recompute_from(index);
        debug!("tempo change added at beat {beat}: {bpm} BPM");
        Ok(())
    }

    /// Removes the tempo change starting exactly at `beat`.
    pub fn remove(&mut self, beat: f64) -> Result<TempoChange, TimingError> {
        let index = self
            .search_beat(beat)
            .map_err(|_| TimingError::TempoChangeNotFound { beat })?;
        let removed = self.changes.remove(index);
        self.recompute_from(index.saturating_sub(1));
        Ok(removed)
    }

    /// Changes the tempo of an existing change.
    pub fn set_bpm(&mut self, beat: f64, bpm: f64) -> Result<(), TimingError> {
        validate_bpm(bpm)?;
        let index = self
            .search_beat(beat)
            .map_err(|_| TimingError::TempoChangeNotFound { beat })?;
        self.changes[index].bpm = bpm;
        self.recompute_from(index);
        Ok(())
    }

    pub fn set_swing(&mut self, beat: f64, swing: Swing) -> Result<(), TimingError> {
        let index = self
            .search_beat(beat)
            .map_err(|_| TimingError::TempoChangeNotFound { beat })?;
        self.changes[index].swing = swing;
        Ok(())
    }

    /// Moves a tempo change to a new beat, re-sorting the map.
    pub fn move_change(&mut self, from_beat: f64, to_beat: f64) -> Result<(), TimingError> {
        validate_beat(to_beat)?;
        if from_beat == to_beat {
            return Ok(());
        }
        if self.search_beat(to_beat).is_ok() {
            return Err(TimingError::DuplicateTempoChange { beat: to_beat });
        }
        let removed = self.remove(from_beat)?;
        self.add(to_beat, removed.bpm, removed.swing)
    }

    pub fn seconds_at(&self, beat: f64) -> Option<f64> {
        let change = self.change_at_beat(beat)?;
        Some(change.seconds + (beat - change.beat) * change.seconds_per_beat())
    }

    pub fn beat_at(&self, seconds: f64) -> Option<f64> {
        let change = self.change_at_seconds(seconds)?;
        Some(change.beat + (seconds - change.seconds) / change.seconds_per_beat())
    }

    pub fn bpm_at(&self, beat: f64) -> Option<f64> {
        self.change_at_beat(beat).map(|c| c.bpm)
    }

    pub fn tempo_at_seconds(&self, seconds: f64) -> Option<f64> {
        self.change_at_seconds(seconds).map(|c| c.bpm)
    }

    pub fn swing_at(&self, beat: f64) -> Option<Swing> {
        self.change_at_beat(beat).map(|c| c.swing)
    }

    /// Applies the swing of the segment containing `beat`, measured from the
    /// segment start.
    pub fn swung_beat(&self, beat: f64) -> Option<f64> {
        let change = self.change_at_beat(beat)?;
        Some(change.beat + change.swing.to_swung(beat - change.beat))
    }

    /// Inverse of [`TempoMap::swung_beat`].
    pub fn straight_beat(&self, swung_beat: f64) -> Option<f64> {
        let change = self.change_at_beat(swung_beat)?;
        Some(change.beat + change.swing.to_straight(swung_beat - change.beat))
    }

    fn change_at_beat(&self, beat: f64) -> Option<&TempoChange> {
        if self.changes.is_empty() {
            return None;
        }
        let pos = self.changes.partition_point(|c| c.beat <= beat);
        self.changes.get(pos.saturating_sub(1))
    }

    fn change_at_seconds(&self, seconds: f64) -> Option<&TempoChange> {
        if self.changes.is_empty() {
            return None;
        }
        let pos = self.changes.partition_point(|c| c.seconds <= seconds);
        self.changes.get(pos.saturating_sub(1))
    }

    fn search_beat(&self, beat: f64) -> Result<usize, usize> {
        // -0.0 + 0.0 == +0.0, so both zeroes hit the same entry
        let beat = beat + 0.0;
        self.changes.binary_search_by(|c| c.beat.total_cmp(&beat))
    }

    /// Re-derives cached start times for `index` and everything after it.
    fn recompute_from(&mut self, index: usize) {
        for i in index..self.changes.len() {
            let seconds = if i == 0 {
                let first = &self.changes[0];
                seconds_between(0.0, first.beat, first.bpm)
            } else {
                let prev = &self.changes[i - 1];
                prev.seconds + seconds_between(prev.beat, self.changes[i].beat, prev.bpm)
            };
            self.changes[i].seconds = seconds;
        }
    }
}

fn validate_beat(beat: f64) -> Result<(), TimingError> {
    if !beat.is_finite() || beat < 0.0 {
        return Err(TimingError::InvalidBeat { beat });
    }
    Ok(())
}

fn validate_bpm(bpm: f64) -> Result<(), TimingError> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(TimingError::InvalidTempo { bpm });
    }
    Ok(())
}
