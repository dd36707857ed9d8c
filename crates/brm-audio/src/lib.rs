// Music track abstraction polled by the play clock, plus a simulated device

mod adapter;
mod seek;
mod simulated;

pub use adapter::AudioSyncAdapter;
pub use seek::{SeekFlag, SeekGuard};
pub use simulated::SimulatedTrack;
