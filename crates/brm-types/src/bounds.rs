use serde::{Deserialize, Serialize};

/// Placement of an event on the chart.
///
/// `x` is the start beat and `width` the duration in beats. `y` and `height`
/// are measured in tracks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// End beat of the event.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Top track edge of the event.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `beat` lies in the half-open range `[x, x + width)`.
    pub fn contains_beat(&self, beat: f64) -> bool {
        beat >= self.x && beat < self.max_x()
    }
}
