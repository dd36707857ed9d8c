/// A playable music track the session clock synchronises against.
///
/// Positions and durations are in seconds from the start of the track.
/// Implementations: a real device binding, [`crate::SimulatedTrack`] for
/// headless runs and tests.
pub trait AudioSyncAdapter {
    fn play(&mut self);
    fn pause(&mut self);
    /// Stops playback and rewinds to the start.
    fn stop(&mut self);

    fn set_position(&mut self, seconds: f64);
    /// Last position reported by the device. May lag the true position.
    fn position(&self) -> f64;

    fn is_playing(&self) -> bool;
    fn is_looping(&self) -> bool;
    fn duration(&self) -> f64;

    /// Volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;

    /// Steps the device's timeline estimate by `delta` seconds.
    ///
    /// Devices that run on their own thread may treat this as a no-op.
    fn update(&mut self, _delta: f64) {}
}
