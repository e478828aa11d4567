//! Pairwise compatibility rules
//!
//! Scores how well two garments of complementary categories go together,
//! from color harmony, pattern mix and style agreement.

mod palette;
mod scoring;
mod types;

pub use palette::{ColorRelation, ColorTable, RelationScores};
pub use scoring::{AccentSummary, CompatibilityRules, RuleBasedScorer, ScoringWeights};
pub use types::*;

/// Default scoring weights
pub const DEFAULT_WEIGHTS: ScoringWeights =
    ScoringWeights { color: 0.50, pattern: 0.20, style: 0.30 };

/// Default sub-score for each color relation. Complementary colors rank first,
/// then a matching tone, then a neutral, then anything else.
pub const DEFAULT_RELATION_SCORES: RelationScores = RelationScores {
    complementary: 1.00,
    analogous: 0.85,
    monochrome: 0.75,
    neutral: 0.70,
    unrelated: 0.45,
    clash: 0.15,
};

/// Penalty per accent color that clashes with the other item's main color
pub const ACCENT_CLASH_PENALTY: f64 = 0.10;

/// Bonus per accent color that repeats the other item's main color
pub const ACCENT_ECHO_BONUS: f64 = 0.05;
