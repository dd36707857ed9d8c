use serde::{Deserialize, Serialize};

use crate::error::TimingError;

/// A time signature taking effect at `measure`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSignature {
    pub measure: i32,
    pub beats_per_measure: u32,
    /// Derived beat at which `measure` starts.
    #[serde(skip)]
    beat: f64,
}

impl TimeSignature {
    pub fn new(measure: i32, beats_per_measure: u32) -> Self {
        Self {
            measure,
            beats_per_measure,
            beat: 0.0,
        }
    }

    /// Beat at which this signature starts.
    pub fn beat(&self) -> f64 {
        self.beat
    }
}

/// Ordered time signatures, converting beats into measures.
///
/// Measures before the first signature are counted from measure 0 with the
/// first signature's length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSignatureMap {
    signatures: Vec<TimeSignature>,
}

impl TimeSignatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_signatures<I>(signatures: I) -> Result<Self, TimingError>
    where
        I: IntoIterator<Item = TimeSignature>,
    {
        let mut map = Self::new();
        for sig in signatures {
            map.add(sig.measure, sig.beats_per_measure)?;
        }
        Ok(map)
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn signatures(&self) -> &[TimeSignature] {
        &self.signatures
    }

    pub fn add(&mut self, measure: i32, beats_per_measure: u32) -> Result<(), TimingError> {
        if measure < 0 || beats_per_measure == 0 {
            return Err(TimingError::InvalidTimeSignature {
                measure,
                beats_per_measure,
            });
        }
        let index = match self.signatures.binary_search_by_key(&measure, |s| s.measure) {
            Ok(_) => return Err(TimingError::DuplicateTimeSignature { measure }),
            Err(index) => index,
        };
        self.signatures.insert(index, TimeSignature::new(measure, beats_per_measure));
        self.recompute_from(index);
        Ok(())
    }

    pub fn remove(&mut self, measure: i32) -> Option<TimeSignature> {
        let index = self
            .signatures
            .binary_search_by_key(&measure, |s| s.measure)
            .ok()?;
        let removed = self.signatures.remove(index);
        self.recompute_from(index.saturating_sub(1));
        Some(removed)
    }

    /// Measure containing `beat`, or `None` for an empty map or negative beat.
    pub fn measure_at(&self, beat: f64) -> Option<i32> {
        let sig = self.signature_at(beat)?;
        let into = ((beat - sig.beat) / sig.beats_per_measure as f64).floor() as i32;
        Some(sig.measure + into)
    }

    /// Whole beats elapsed within the measure containing `beat`.
    pub fn measure_part(&self, beat: f64) -> Option<u32> {
        let sig = self.signature_at(beat)?;
        let bpm = sig.beats_per_measure as f64;
        let within = (beat - sig.beat).rem_euclid(bpm);
        Some(within.floor() as u32)
    }

    /// Beat at which `measure` starts.
    pub fn measure_start_beat(&self, measure: i32) -> Option<f64> {
        if measure < 0 || self.signatures.is_empty() {
            return None;
        }
        let pos = self.signatures.partition_point(|s| s.measure <= measure);
        let sig = &self.signatures[pos.saturating_sub(1)];
        Some(sig.beat + (measure - sig.measure) as f64 * sig.beats_per_measure as f64)
    }

    pub fn beats_per_measure_at(&self, beat: f64) -> Option<u32> {
        self.signature_at(beat).map(|s| s.beats_per_measure)
    }

    fn signature_at(&self, beat: f64) -> Option<&TimeSignature> {
        if self.signatures.is_empty() || beat < 0.0 || !beat.is_finite() {
            return None;
        }
        let pos = self.signatures.partition_point(|s| s.beat <= beat);
        self.signatures.get(pos.saturating_sub(1))
    }

    fn recompute_from(&mut self, index: usize) {
        for i in index..self.signatures.len() {
            let beat = if i == 0 {
                let first = &self.signatures[0];
                first.measure as f64 * first.beats_per_measure as f64
            } else {
                let prev = &self.signatures[i - 1];
                let measures = (self.signatures[i].measure - prev.measure) as f64;
                prev.beat + measures * prev.beats_per_measure as f64
            };
            self.signatures[i].beat = beat;
        }
    }
}
