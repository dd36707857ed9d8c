use brm_types::{InputResult, ResultsText, Score};

/// Reduces a session's judgments to a [`Score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCalculator {
    expected_inputs: usize,
}

impl ScoreCalculator {
    pub fn new(expected_inputs: usize) -> Self {
        Self { expected_inputs }
    }

    /// `Σ weight / expected * 100`, unclamped. An empty chart counts as one
    /// expected input.
    pub fn raw_percentage(&self, results: &[InputResult]) -> f32 {
        let total: f64 = results.iter().map(|r| r.weight() as f64).sum();
        (total / self.expected_inputs.max(1) as f64 * 100.0) as f32
    }

    pub fn compute(&self, results: &[InputResult], got_skill_star: bool, text: &ResultsText) -> Score {
        let raw_percentage = self.raw_percentage(results);
        let percentage = raw_percentage.round().clamp(0.0, 100.0) as u8;
        Score {
            percentage,
            raw_percentage,
            got_skill_star,
            perfect: results.len() == self.expected_inputs,
            title: text.title.clone(),
            comment_line: text.line_for(percentage).to_string(),
        }
    }
}
