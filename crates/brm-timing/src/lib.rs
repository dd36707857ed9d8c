// Tempo map, time signatures, swing and the session clock

mod clock;
mod error;
mod swing;
mod tempo;
mod time_signature;

pub use clock::Clock;
pub use error::TimingError;
pub use swing::Swing;
pub use tempo::{TempoChange, TempoMap, seconds_between};
pub use time_signature::{TimeSignature, TimeSignatureMap};
