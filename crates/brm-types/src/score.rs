use serde::{Deserialize, Serialize};

/// Final result of a play session. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Rounded and clamped to `0..=100`.
    pub percentage: u8,
    /// Unclamped, unrounded percentage.
    pub raw_percentage: f32,
    pub got_skill_star: bool,
    /// Every expected input was recorded.
    pub perfect: bool,
    pub title: String,
    pub comment_line: String,
}

/// Chart-supplied commentary shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct ResultsText {
    pub title: String,
    /// `[0, 50)`
    pub second_negative: String,
    /// `[50, 60)`
    pub first_negative: String,
    /// `[60, 75)`
    pub ok: String,
    /// `[75, 85)`
    pub first_positive: String,
    /// `[85, 100]`
    pub second_positive: String,
}

impl Default for ResultsText {
    fn default() -> Self {
        Self {
            title: "Bouncy Road".to_string(),
            second_negative: "You couldn't keep the balls in the air.".to_string(),
            first_negative: "You dropped quite a few balls.".to_string(),
            ok: "That was OK.".to_string(),
            first_positive: "Nice bouncing!".to_string(),
            second_positive: "Superb! Every bounce was on the beat.".to_string(),
        }
    }
}

impl ResultsText {
    /// Comment line for a displayed percentage.
    pub fn line_for(&self, percentage: u8) -> &str {
        match percentage {
            0..50 => &self.second_negative,
            50..60 => &self.first_negative,
            60..75 => &self.ok,
            75..85 => &self.first_positive,
            _ => &self.second_positive,
        }
    }
}
