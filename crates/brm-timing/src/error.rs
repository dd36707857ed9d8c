use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimingError {
    #[error("tempo map is empty")]
    EmptyTempoMap,

    #[error("a tempo change already exists at beat {beat}")]
    DuplicateTempoChange { beat: f64 },

    #[error("no tempo change at beat {beat}")]
    TempoChangeNotFound { beat: f64 },

    #[error("invalid tempo: {bpm} BPM")]
    InvalidTempo { bpm: f64 },

    #[error("invalid beat position: {beat}")]
    InvalidBeat { beat: f64 },

    #[error("cannot remove the last tempo change while the clock is {state}")]
    LastTempoInUse { state: brm_types::PlayState },

    #[error("a time signature already starts at measure {measure}")]
    DuplicateTimeSignature { measure: i32 },

    #[error("invalid time signature at measure {measure}: {beats_per_measure} beats per measure")]
    InvalidTimeSignature { measure: i32, beats_per_measure: u32 },
}
