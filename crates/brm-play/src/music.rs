use brm_audio::{AudioSyncAdapter, SeekFlag};
use brm_timing::Clock;
use log::debug;

/// Keeps the session clock locked to a music track.
pub struct MusicSync {
    track: Box<dyn AudioSyncAdapter>,
    seek_flag: SeekFlag,
    last_position: f64,
    schedule_play: bool,
    /// The clock has adopted a device position since the last start.
    settled: bool,
}

impl MusicSync {
    pub fn new(track: Box<dyn AudioSyncAdapter>, seek_flag: SeekFlag) -> Self {
        Self {
            track,
            seek_flag,
            last_position: -1.0,
            schedule_play: true,
            settled: false,
        }
    }

    pub fn track(&self) -> &dyn AudioSyncAdapter {
        self.track.as_ref()
    }

    pub fn track_mut(&mut self) -> &mut dyn AudioSyncAdapter {
        self.track.as_mut()
    }

    pub fn into_track(self) -> Box<dyn AudioSyncAdapter> {
        self.track
    }

    /// Forgets the last polled position and re-arms delayed start.
    pub fn reset(&mut self) {
        self.last_position = 0.0;
        self.schedule_play = true;
        self.settled = false;
    }

    /// Steps the device timeline by `delta`, scaled by `damping` until the
    /// clock first adopts a device position after a start.
    pub fn step(&mut self, delta: f64, damping: f64) {
        let scale = if self.settled { 1.0 } else { damping };
        self.track.update(delta * scale);
    }

    /// Starts the track once the clock reaches `music_start` and adopts the
    /// device position when it moved.
    ///
    /// Any drop in a looping track's position is a wrap.
    pub fn resync(&mut self, clock: &mut Clock, music_start: f64) {
        if self.schedule_play && clock.seconds() >= music_start {
            self.track.play();
            self.schedule_play = false;
        }
        if !self.track.is_playing() || self.seek_flag.is_seeking() {
            return;
        }

        let old = self.last_position;
        let new = self.track.position();
        if old == new {
            return;
        }
        if self.track.is_looping() {
            let duration = self.track.duration();
            if new < old {
                clock.wrap_loop();
            }
            clock.set_seconds(new + music_start + clock.loop_index() as f64 * duration);
        } else {
            clock.set_seconds(new + music_start);
        }
        self.last_position = new;
        self.settled = true;
    }

    /// Applies `volume`, or silence when muted, if it differs from the track.
    pub fn apply_volume(&mut self, volume: f32, muted: bool) {
        let target = if muted { 0.0 } else { volume };
        if self.track.volume() != target {
            self.track.set_volume(target);
        }
    }

    /// Moves the track to the clock position. Looping tracks also
    /// re-derive the clock's loop index.
    pub fn seek(&mut self, clock: &mut Clock, music_start: f64) {
        let _guard = self.seek_flag.raise();
        let offset = (clock.seconds() - music_start).max(0.0);
        let duration = self.track.duration();
        if self.track.is_looping() && duration > 0.0 {
            self.track.set_position(offset.rem_euclid(duration));
            clock.set_loop_index((offset / duration).floor() as i32);
        } else {
            self.track.set_position(offset);
        }
        self.last_position = self.track.position();
        debug!(
            "music seeked to {:.3}s (loop {})",
            self.last_position,
            clock.loop_index()
        );
    }

    /// Starts or stops the track for a clock that just began playing.
    pub fn start(&mut self, clock: &mut Clock, music_start: f64, volume: f32, muted: bool) {
        self.reset();
        if clock.seconds() >= music_start {
            self.track.play();
            self.schedule_play = false;
            self.apply_volume(volume, muted);
            self.seek(clock, music_start);
        } else {
            self.track.stop();
        }
    }

    pub fn pause(&mut self) {
        self.track.pause();
    }
}

impl std::fmt::Debug for MusicSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicSync")
            .field("position", &self.track.position())
            .field("playing", &self.track.is_playing())
            .field("looping", &self.track.is_looping())
            .field("last_position", &self.last_position)
            .finish()
    }
}
