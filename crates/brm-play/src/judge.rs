use brm_timing::TempoMap;
use brm_types::{InputResult, InputType, JudgmentTier};
use log::debug;
use serde::{Deserialize, Serialize};

/// Timing windows in seconds, measured as the absolute offset from the
/// expected input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JudgeWindows {
    pub ace: f64,
    pub good: f64,
    pub barely: f64,
    /// Outermost window. Inputs beyond it are duds.
    pub max: f64,
}

impl JudgeWindows {
    pub const ACE: f64 = 1.0 / 60.0;
    pub const GOOD: f64 = 3.5 / 60.0;
    pub const BARELY: f64 = 5.0 / 60.0;
    pub const MAX: f64 = 7.0 / 60.0;

    pub fn builder() -> JudgeWindowsBuilder {
        JudgeWindowsBuilder::default()
    }

    /// Tier for a signed offset, or `None` outside every window.
    pub fn classify(&self, offset_seconds: f64) -> Option<JudgmentTier> {
        let abs_offset = offset_seconds.abs();

        if abs_offset <= self.ace {
            Some(JudgmentTier::Ace)
        } else if abs_offset <= self.good {
            Some(JudgmentTier::Good)
        } else if abs_offset <= self.barely {
            Some(JudgmentTier::Barely)
        } else if abs_offset <= self.max {
            Some(JudgmentTier::Miss)
        } else {
            None
        }
    }
}

impl Default for JudgeWindows {
    fn default() -> Self {
        Self {
            ace: Self::ACE,
            good: Self::GOOD,
            barely: Self::BARELY,
            max: Self::MAX,
        }
    }
}

#[derive(Debug, Default)]
pub struct JudgeWindowsBuilder {
    ace: Option<f64>,
    good: Option<f64>,
    barely: Option<f64>,
    max: Option<f64>,
}

impl JudgeWindowsBuilder {
    pub fn ace(mut self, seconds: f64) -> Self {
        self.ace = Some(seconds);
        self
    }

    pub fn good(mut self, seconds: f64) -> Self {
        self.good = Some(seconds);
        self
    }

    pub fn barely(mut self, seconds: f64) -> Self {
        self.barely = Some(seconds);
        self
    }

    pub fn max(mut self, seconds: f64) -> Self {
        self.max = Some(seconds);
        self
    }

    pub fn build(self) -> JudgeWindows {
        let default = JudgeWindows::default();
        JudgeWindows {
            ace: self.ace.unwrap_or(default.ace),
            good: self.good.unwrap_or(default.good),
            barely: self.barely.unwrap_or(default.barely),
            max: self.max.unwrap_or(default.max),
        }
    }
}

/// An input the chart expects at `beat`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedHit {
    pub beat: f64,
    pub input: InputType,
    pub consumed: bool,
}

/// Matches player inputs to expected inputs and keeps the session's log.
#[derive(Debug, Clone, Default)]
pub struct JudgmentEngine {
    windows: JudgeWindows,
    expected: Vec<ExpectedHit>,
    results: Vec<InputResult>,
    expected_count: usize,
    skill_star_beat: Option<f64>,
    got_skill_star: bool,
}

impl JudgmentEngine {
    pub fn new(windows: JudgeWindows) -> Self {
        Self {
            windows,
            ..Self::default()
        }
    }

    pub fn windows(&self) -> &JudgeWindows {
        &self.windows
    }

    pub fn set_windows(&mut self, windows: JudgeWindows) {
        self.windows = windows;
    }

    /// Clears the log and loads the inputs of a new run starting at
    /// `from_beat`. Inputs before it are not expected.
    pub fn arm<I>(&mut self, inputs: I, from_beat: f64, skill_star_beat: f64)
    where
        I: IntoIterator<Item = (f64, InputType)>,
    {
        self.reset();
        self.expected = inputs
            .into_iter()
            .filter(|(beat, _)| *beat >= from_beat)
            .map(|(beat, input)| ExpectedHit {
                beat,
                input,
                consumed: false,
            })
            .collect();
        self.expected.sort_by(|a, b| a.beat.total_cmp(&b.beat));
        self.expected_count = self.expected.len();
        self.skill_star_beat = skill_star_beat.is_finite().then_some(skill_star_beat);
        debug!(
            "judgment armed from beat {from_beat}: {} expected inputs",
            self.expected_count
        );
    }

    /// Drops every recorded result and expected input.
    pub fn reset(&mut self) {
        self.expected.clear();
        self.results.clear();
        self.expected_count = 0;
        self.skill_star_beat = None;
        self.got_skill_star = false;
    }

    /// Judges an input made at `beat` against the closest unconsumed
    /// expected input of the same type.
    ///
    /// Returns `None` for a dud: nothing within the outermost window.
    pub fn submit(&mut self, input: InputType, beat: f64, tempos: &TempoMap) -> Option<InputResult> {
        let seconds = tempos.seconds_at(beat)?;
        let (index, offset) = self
            .expected
            .iter()
            .enumerate()
            .filter(|(_, hit)| !hit.consumed && hit.input == input)
            .filter_map(|(i, hit)| Some((i, seconds - tempos.seconds_at(hit.beat)?)))
            .min_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))?;
        let tier = self.windows.classify(offset)?;

        let hit = &mut self.expected[index];
        hit.consumed = true;
        let result = InputResult::new(input, offset, tier, hit.beat);
        debug!(
            "{input:?} at beat {beat:.3}: {tier:?} ({:+.1} ms)",
            offset * 1000.0
        );
        self.results.push(result);
        Some(result)
    }

    pub fn results(&self) -> &[InputResult] {
        &self.results
    }

    /// Inputs expected this run, fixed when the run started.
    pub fn expected_count(&self) -> usize {
        self.expected_count
    }

    pub fn expected(&self) -> &[ExpectedHit] {
        &self.expected
    }

    /// Unconsumed expected inputs, earliest first.
    pub fn pending(&self) -> impl Iterator<Item = &ExpectedHit> {
        self.expected.iter().filter(|h| !h.consumed)
    }

    pub fn skill_star_beat(&self) -> Option<f64> {
        self.skill_star_beat
    }

    pub fn got_skill_star(&self) -> bool {
        self.got_skill_star
    }

    /// Whether `result` is an ACE on the skill-star input.
    pub fn is_skill_star_hit(&self, result: &InputResult) -> bool {
        result.tier == JudgmentTier::Ace
            && self
                .skill_star_beat
                .is_some_and(|beat| (result.expected_beat - beat).abs() < 1e-9)
    }

    /// Awards the skill star. Returns false if already awarded or the chart
    /// has none.
    pub fn fire_skill_star(&mut self) -> bool {
        if self.got_skill_star || self.skill_star_beat.is_none() {
            return false;
        }
        self.got_skill_star = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brm_timing::Swing;

    fn tempos_60() -> TempoMap {
        // one beat per second keeps offsets readable
        let mut map = TempoMap::new();
        map.add(0.0, 60.0, Swing::Straight).unwrap();
        map
    }

    fn armed(beats: &[f64]) -> JudgmentEngine {
        let mut engine = JudgmentEngine::new(JudgeWindows::default());
        engine.arm(beats.iter().map(|&b| (b, InputType::A)), 0.0, f64::INFINITY);
        engine
    }

    #[test]
    fn test_default_windows() {
        let windows = JudgeWindows::default();
        assert!((windows.ace - 1.0 / 60.0).abs() < 1e-12);
        assert!((windows.good - 3.5 / 60.0).abs() < 1e-12);
        assert!((windows.barely - 5.0 / 60.0).abs() < 1e-12);
        assert!((windows.max - 7.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_classify_tiers() {
        let windows = JudgeWindows::default();
        assert_eq!(windows.classify(0.9 / 60.0), Some(JudgmentTier::Ace));
        assert_eq!(windows.classify(-3.0 / 60.0), Some(JudgmentTier::Good));
        assert_eq!(windows.classify(4.0 / 60.0), Some(JudgmentTier::Barely));
        assert_eq!(windows.classify(-6.0 / 60.0), Some(JudgmentTier::Miss));
        assert_eq!(windows.classify(10.0 / 60.0), None);
    }

    #[test]
    fn test_builder_overrides() {
        let windows = JudgeWindows::builder().ace(0.01).max(0.2).build();
        assert_eq!(windows.ace, 0.01);
        assert_eq!(windows.max, 0.2);
        assert_eq!(windows.good, JudgeWindows::GOOD);
    }

    #[test]
    fn test_windows_from_partial_json() {
        let windows: JudgeWindows = serde_json::from_str(r#"{"ace":0.02}"#).unwrap();
        assert_eq!(windows.ace, 0.02);
        assert_eq!(windows.barely, JudgeWindows::BARELY);
    }

    #[test]
    fn test_submit_consumes_closest() {
        let tempos = tempos_60();
        let mut engine = armed(&[1.0, 2.0]);
        let result = engine.submit(InputType::A, 2.01, &tempos).unwrap();
        assert_eq!(result.expected_beat, 2.0);
        assert_eq!(result.tier, JudgmentTier::Ace);
        assert_eq!(engine.pending().count(), 1);

        // the same expected input cannot be judged twice
        assert!(engine.submit(InputType::A, 2.0, &tempos).is_none());
        assert_eq!(engine.results().len(), 1);
    }

    #[test]
    fn test_input_type_must_match() {
        let tempos = tempos_60();
        let mut engine = armed(&[1.0]);
        assert!(engine.submit(InputType::Dpad, 1.0, &tempos).is_none());
        assert!(engine.submit(InputType::A, 1.0, &tempos).is_some());
    }

    #[test]
    fn test_dud_records_nothing() {
        let tempos = tempos_60();
        let mut engine = armed(&[1.0]);
        assert!(engine.submit(InputType::A, 1.0 + 10.0 / 60.0, &tempos).is_none());
        assert!(engine.results().is_empty());
        assert_eq!(engine.pending().count(), 1);
    }

    #[test]
    fn test_arm_skips_inputs_before_start() {
        let mut engine = JudgmentEngine::default();
        engine.arm(
            [(1.0, InputType::A), (5.0, InputType::A), (4.0, InputType::Dpad)],
            4.0,
            f64::INFINITY,
        );
        assert_eq!(engine.expected_count(), 2);
        let beats: Vec<f64> = engine.expected().iter().map(|h| h.beat).collect();
        assert_eq!(beats, vec![4.0, 5.0]);
    }

    #[test]
    fn test_skill_star() {
        let tempos = tempos_60();
        let mut engine = JudgmentEngine::default();
        engine.arm([(3.0, InputType::A), (4.0, InputType::A)], 0.0, 4.0);

        let early = engine.submit(InputType::A, 3.0, &tempos).unwrap();
        assert!(!engine.is_skill_star_hit(&early));

        let sloppy = engine.submit(InputType::A, 4.0 + 3.0 / 60.0, &tempos).unwrap();
        assert_eq!(sloppy.tier, JudgmentTier::Good);
        assert!(!engine.is_skill_star_hit(&sloppy));

        assert!(engine.fire_skill_star());
        assert!(!engine.fire_skill_star());
        assert!(engine.got_skill_star());

        engine.reset();
        assert!(!engine.got_skill_star());
        assert!(!engine.fire_skill_star());
    }
}
