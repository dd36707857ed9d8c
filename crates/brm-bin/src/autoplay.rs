use brm_play::Engine;
use brm_types::InputType;
use log::debug;

/// Presses every expected input on time, shifted by a fixed offset, and
/// optionally misses every `miss_every`-th one.
#[derive(Debug, Clone, Copy)]
pub struct AutoPlayer {
    offset_seconds: f64,
    miss_every: usize,
    cursor: usize,
    pressed: usize,
    missed: usize,
}

impl AutoPlayer {
    pub fn new(offset_seconds: f64, miss_every: usize) -> Self {
        Self {
            offset_seconds,
            miss_every,
            cursor: 0,
            pressed: 0,
            missed: 0,
        }
    }

    pub fn pressed(&self) -> usize {
        self.pressed
    }

    pub fn missed(&self) -> usize {
        self.missed
    }

    /// Fires the inputs that have come due since the last call.
    pub fn step(&mut self, engine: &mut Engine) {
        let now = engine.seconds();
        let mut due: Vec<InputType> = Vec::new();
        let expected = engine.judgment().expected();
        while let Some(hit) = expected.get(self.cursor) {
            let Some(at) = engine.tempos().seconds_at(hit.beat) else {
                break;
            };
            if at + self.offset_seconds > now {
                break;
            }
            self.cursor += 1;
            if self.miss_every > 0 && self.cursor % self.miss_every == 0 {
                debug!("autoplay skipping input at beat {}", hit.beat);
                self.missed += 1;
                continue;
            }
            due.push(hit.input);
        }

        for input in due {
            engine.fire_input(input, true);
            engine.fire_input(input, false);
            self.pressed += 1;
        }
    }
}
