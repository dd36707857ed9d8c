use serde::{Deserialize, Serialize};

/// Swing feel of a tempo segment.
///
/// Swing moves the off-beat of every eighth-note pair later without changing
/// the segment's beats-per-minute, so beat↔seconds conversion is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Swing {
    #[default]
    Straight,
    Swing,
}

impl Swing {
    /// Length in beats of one swung subdivision (an eighth note).
    pub const DIVISION: f64 = 0.5;

    /// Percentage of a subdivision pair taken by its first half.
    pub fn ratio(self) -> u8 {
        match self {
            Self::Straight => 50,
            Self::Swing => 60,
        }
    }

    /// Maps a straight beat position to where it lands under this swing.
    pub fn to_swung(self, beat: f64) -> f64 {
        if self == Self::Straight {
            return beat;
        }
        let ratio = self.ratio() as f64 / 100.0;
        let pair = Self::DIVISION * 2.0;
        let base = (beat / pair).floor() * pair;
        let frac = (beat - base) / pair;
        let swung = if frac < 0.5 {
            frac / 0.5 * ratio
        } else {
            ratio + (frac - 0.5) / 0.5 * (1.0 - ratio)
        };
        base + swung * pair
    }

    /// Inverse of [`Swing::to_swung`].
    pub fn to_straight(self, swung_beat: f64) -> f64 {
        if self == Self::Straight {
            return swung_beat;
        }
        let ratio = self.ratio() as f64 / 100.0;
        let pair = Self::DIVISION * 2.0;
        let base = (swung_beat / pair).floor() * pair;
        let frac = (swung_beat - base) / pair;
        let straight = if frac < ratio {
            frac / ratio * 0.5
        } else {
            0.5 + (frac - ratio) / (1.0 - ratio) * 0.5
        };
        base + straight * pair
    }
}
