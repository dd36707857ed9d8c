use serde::{Deserialize, Serialize};

/// Abstract player input, already mapped from a physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputType {
    A,
    Dpad,
}

/// Accuracy tier of a judged input, tightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JudgmentTier {
    Ace,
    Good,
    Barely,
    Miss,
}

impl JudgmentTier {
    /// Score weight of this tier. Decreases monotonically from ACE.
    pub fn weight(self) -> f32 {
        match self {
            Self::Ace => 1.0,
            Self::Good => 0.8,
            Self::Barely => 0.5,
            Self::Miss => 0.0,
        }
    }
}

/// One judged input. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputResult {
    pub input_type: InputType,
    /// Signed offset from the expected input; negative is early.
    pub raw_offset_seconds: f64,
    pub tier: JudgmentTier,
    /// Beat of the expected input this judgment consumed.
    pub expected_beat: f64,
}

impl InputResult {
    pub fn new(
        input_type: InputType,
        raw_offset_seconds: f64,
        tier: JudgmentTier,
        expected_beat: f64,
    ) -> Self {
        Self {
            input_type,
            raw_offset_seconds,
            tier,
            expected_beat,
        }
    }

    pub fn weight(&self) -> f32 {
        self.tier.weight()
    }

    pub fn is_early(&self) -> bool {
        self.raw_offset_seconds < 0.0
    }
}
