use log::debug;

use crate::adapter::AudioSyncAdapter;

/// In-memory music track with a deterministic timeline.
///
/// The true position advances only through [`AudioSyncAdapter::update`].
/// The reported position is refreshed every `report_interval` seconds of
/// playback, imitating devices that report position in buffer-sized steps.
#[derive(Debug, Clone)]
pub struct SimulatedTrack {
    duration: f64,
    looping: bool,
    position: f64,
    reported: f64,
    report_interval: f64,
    since_report: f64,
    playing: bool,
    volume: f32,
}

impl SimulatedTrack {
    pub fn new(duration: f64, looping: bool) -> Self {
        Self {
            duration: duration.max(0.0),
            looping,
            position: 0.0,
            reported: 0.0,
            report_interval: 0.0,
            since_report: 0.0,
            playing: false,
            volume: 1.0,
        }
    }

    /// Sets the reporting granularity. `0.0` reports every update.
    pub fn with_report_interval(mut self, seconds: f64) -> Self {
        self.report_interval = seconds.max(0.0);
        self
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Position the device would report with no latency.
    pub fn true_position(&self) -> f64 {
        self.position
    }

    fn report(&mut self) {
        self.reported = self.position;
        self.since_report = 0.0;
    }
}

impl AudioSyncAdapter for SimulatedTrack {
    fn play(&mut self) {
        if self.duration > 0.0 {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position = 0.0;
        self.report();
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds.clamp(0.0, self.duration);
        self.report();
    }

    fn position(&self) -> f64 {
        self.reported
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn is_looping(&self) -> bool {
        self.looping
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn update(&mut self, delta: f64) {
        if !self.playing || delta <= 0.0 {
            return;
        }
        self.position += delta;
        self.since_report += delta;
        if self.position >= self.duration {
            if self.looping {
                self.position = self.position.rem_euclid(self.duration);
                debug!("simulated track wrapped to {:.3}s", self.position);
            } else {
                self.position = self.duration;
                self.playing = false;
                self.report();
                return;
            }
        }
        if self.since_report >= self.report_interval {
            self.report();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_while_playing() {
        let mut track = SimulatedTrack::new(10.0, false);
        track.update(1.0);
        assert_eq!(track.position(), 0.0);

        track.play();
        track.update(1.5);
        assert!((track.position() - 1.5).abs() < 1e-9);

        track.pause();
        track.update(1.0);
        assert!((track.position() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn looping_track_wraps() {
        let mut track = SimulatedTrack::new(4.0, true);
        track.play();
        track.update(3.5);
        track.update(1.0);
        assert!((track.position() - 0.5).abs() < 1e-9);
        assert!(track.is_playing());
    }

    #[test]
    fn non_looping_track_ends() {
        let mut track = SimulatedTrack::new(2.0, false);
        track.play();
        track.update(3.0);
        assert_eq!(track.position(), 2.0);
        assert!(!track.is_playing());
    }

    #[test]
    fn coarse_reporting_lags_true_position() {
        let mut track = SimulatedTrack::new(10.0, false).with_report_interval(0.1);
        track.play();
        track.update(0.05);
        assert_eq!(track.position(), 0.0);
        assert!((track.true_position() - 0.05).abs() < 1e-9);
        track.update(0.05);
        assert!((track.position() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn seek_and_stop_report_immediately() {
        let mut track = SimulatedTrack::new(10.0, false).with_report_interval(1.0);
        track.set_position(4.0);
        assert_eq!(track.position(), 4.0);
        track.set_position(40.0);
        assert_eq!(track.position(), 10.0);
        track.play();
        track.stop();
        assert_eq!(track.position(), 0.0);
        assert!(!track.is_playing());
    }

    #[test]
    fn volume_is_clamped() {
        let mut track = SimulatedTrack::new(1.0, false);
        track.set_volume(1.5);
        assert_eq!(track.volume(), 1.0);
        track.set_volume(-0.5);
        assert_eq!(track.volume(), 0.0);
    }
}
