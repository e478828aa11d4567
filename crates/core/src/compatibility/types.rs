//! Types for compatibility scoring

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::ColorRelation;

/// Match quality of two items, always within `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CompatibilityScore(f64);

impl CompatibilityScore {
    pub const MIN: Self = Self(0.0);
    pub const MAX: Self = Self(1.0);

    /// Clamps into range; NaN becomes the minimum.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for CompatibilityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Individual scoring components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct ComponentScores {
    /// Color harmony (0.0 - 1.0)
    pub color: f64,
    /// Pattern mix (0.0 - 1.0)
    pub pattern: f64,
    /// Style agreement (0.0 - 1.0)
    pub style: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    /// score >= 0.80
    Strong,
    /// score 0.60 - 0.79
    Good,
    /// score below 0.60
    Fair,
}

impl MatchStrength {
    pub fn from_score(score: CompatibilityScore) -> Self {
        let value = score.value();
        if value >= 0.80 {
            MatchStrength::Strong
        } else if value >= 0.60 {
            MatchStrength::Good
        } else {
            MatchStrength::Fair
        }
    }

    pub fn display_percentage(&self, score: CompatibilityScore) -> String {
        format!("{:.0}% match", score.value() * 100.0)
    }
}

/// Result of scoring one pair of items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compatibility {
    pub score: CompatibilityScore,
    pub components: ComponentScores,
    pub color_relation: ColorRelation,
    pub strength: MatchStrength,
    /// Human-readable reasons, never empty
    pub reasons: Vec<String>,
}
