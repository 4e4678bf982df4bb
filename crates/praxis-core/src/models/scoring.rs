use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The kinds of score a template's scoring rules produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScoreType {
    /// Unscaled sum of item responses.
    Raw,
    /// Normed score, typically mean=10, SD=3.
    Scaled,
    /// Percentile rank (0–100).
    Percentile,
    /// T-score, mean=50, SD=10.
    TScore,
    /// Standard normal deviate.
    ZScore,
}

/// Defines the valid range for a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl ScoreRange {
    pub fn contains(&self, value: f64) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        if let Some(step) = self.step {
            let offset = value - self.min;
            let remainder = offset % step;
            // Allow floating point tolerance
            remainder < 1e-9 || (step - remainder) < 1e-9
        } else {
            true
        }
    }
}

/// How a template turns a set of answers into scores. Evaluated by the
/// external scoring process; the engine only carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringConfig {
    pub item_count: u32,
    pub item_range: ScoreRange,
    pub total_range: ScoreRange,
    pub score_types: Vec<ScoreType>,
    /// 1-based item numbers whose responses are inverted before summing.
    #[serde(default)]
    pub reverse_scored_items: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityLevel {
    Minimal,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
}

/// One band of an ordered interpretation table. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InterpretationRange {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub description: String,
    pub severity: Option<SeverityLevel>,
}

impl InterpretationRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicalCutoff {
    pub label: String,
    pub score: f64,
    pub description: String,
}

/// Find the first interpretation band containing `value`.
pub fn interpret(rules: &[InterpretationRange], value: f64) -> Option<&InterpretationRange> {
    rules.iter().find(|r| r.contains(value))
}
