use brm_timing::TimeSignatureMap;

/// A metronome beat boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetronomeTick {
    pub measure: i32,
    /// Beat within the measure, `-1` without time signatures.
    pub part: i32,
    pub start_of_measure: bool,
}

/// Detects crossings of (measure, beat-in-measure) boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metronome {
    last_measure: i32,
    last_part: i32,
}

impl Default for Metronome {
    fn default() -> Self {
        Self {
            last_measure: -1,
            last_part: -1,
        }
    }
}

impl Metronome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primes the metronome so the first boundary at or after
    /// `playback_start` ticks.
    pub fn reset(&mut self, playback_start: f64) {
        self.last_measure = (playback_start - 1.0).ceil() as i32;
        self.last_part = -1;
    }

    /// Returns a tick when `beat` entered a new measure or beat-in-measure.
    /// Without time signatures every whole beat counts as a measure.
    pub fn update(&mut self, beat: f64, signatures: &TimeSignatureMap) -> Option<MetronomeTick> {
        let measure = signatures
            .measure_at(beat)
            .filter(|m| *m >= 0)
            .unwrap_or(beat.floor() as i32);
        let part = signatures.measure_part(beat).map_or(-1, |p| p as i32);
        if measure == self.last_measure && part == self.last_part {
            return None;
        }
        self.last_measure = measure;
        self.last_part = part;
        Some(MetronomeTick {
            measure,
            part,
            start_of_measure: part == 0,
        })
    }
}
