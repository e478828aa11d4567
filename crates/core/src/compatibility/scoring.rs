//! Rule-based scoring of item pairs

use crate::config::ScoringConfig;
use crate::domain::item::{Color, Item, Pattern, Style};
use crate::errors::InvalidPairError;

use super::palette::{ColorRelation, ColorTable, RelationScores};
use super::types::*;
use super::{ACCENT_CLASH_PENALTY, ACCENT_ECHO_BONUS};

const BOTH_SOLID: f64 = 0.85;
const ONE_PATTERNED: f64 = 1.00;
const BOTH_PATTERNED: f64 = 0.20;

const SAME_STYLE: f64 = 1.00;

/// Weights for scoring components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Weight for color harmony (default: 0.50)
    pub color: f64,
    /// Weight for pattern mix (default: 0.20)
    pub pattern: f64,
    /// Weight for style agreement (default: 0.30)
    pub style: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.color + self.pattern + self.style
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Scores a pair of items. Implementations must be pure and symmetric.
pub trait CompatibilityRules: Send + Sync {
    fn score(&self, left: &Item, right: &Item) -> Result<Compatibility, InvalidPairError>;
}

/// Fixed-table scorer over color, pattern and style.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedScorer {
    weights: ScoringWeights,
    relations: RelationScores,
    palette: ColorTable,
}

impl RuleBasedScorer {
    pub fn new(weights: ScoringWeights, relations: RelationScores, palette: ColorTable) -> Self {
        Self { weights, relations, palette }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        let palette =
            ColorTable::new(config.complements.iter().copied(), config.clashes.iter().copied());
        Self::new(config.weights, config.relations, palette)
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights, ..Self::default() }
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    pub fn palette(&self) -> &ColorTable {
        &self.palette
    }

    /// Weighted mean of the components, clamped to the score range.
    pub fn calculate_total_score(&self, components: &ComponentScores) -> CompatibilityScore {
        let total_weight = self.weights.total();
        if total_weight <= 0.0 {
            return CompatibilityScore::MIN;
        }

        let weighted = components.color * self.weights.color
            + components.pattern * self.weights.pattern
            + components.style * self.weights.style;

        CompatibilityScore::new(weighted / total_weight)
    }

    /// Color harmony of the two main colors, nudged by accent colors.
    ///
    /// Accents are compared against the other item's main color in both
    /// directions and only counted, so the result does not depend on argument order.
    pub fn color_harmony(&self, left: &Item, right: &Item) -> (f64, ColorRelation, AccentSummary) {
        let relation = self.palette.relation(left.primary_color, right.primary_color);
        let mut accents = AccentSummary::default();

        for (secondary, other_primary) in [
            (&left.secondary_colors, right.primary_color),
            (&right.secondary_colors, left.primary_color),
        ] {
            for accent in secondary {
                match self.palette.relation(*accent, other_primary) {
                    ColorRelation::Clash => accents.clashes += 1,
                    ColorRelation::Monochrome => accents.echoes += 1,
                    _ => {}
                }
            }
        }

        let score = self.relations.score(relation)
            - f64::from(accents.clashes) * ACCENT_CLASH_PENALTY
            + f64::from(accents.echoes) * ACCENT_ECHO_BONUS;

        (score.clamp(0.0, 1.0), relation, accents)
    }

    pub fn pattern_score(&self, left: Pattern, right: Pattern) -> f64 {
        match (left.is_solid(), right.is_solid()) {
            (true, true) => BOTH_SOLID,
            (false, false) => BOTH_PATTERNED,
            _ => ONE_PATTERNED,
        }
    }

    pub fn style_score(&self, left: Style, right: Style) -> f64 {
        use Style::*;

        match (left, right) {
            (Casual, Streetwear) | (Streetwear, Casual) => 0.70,
            (Sporty, Streetwear) | (Streetwear, Sporty) => 0.70,
            (Business, Formal) | (Formal, Business) => 0.70,
            (Casual, Sporty) | (Sporty, Casual) => 0.60,
            (Business, Casual) | (Casual, Business) => 0.50,
            (Casual, Formal) | (Formal, Casual) => 0.30,
            (Business, Streetwear) | (Streetwear, Business) => 0.30,
            (Formal, Streetwear) | (Streetwear, Formal) => 0.10,
            (Business, Sporty) | (Sporty, Business) => 0.10,
            (Formal, Sporty) | (Sporty, Formal) => 0.00,
            // every remaining combination is a style paired with itself
            _ => SAME_STYLE,
        }
    }

    /// Generate human-readable reasoning
    pub fn generate_reasoning(
        &self,
        left: &Item,
        right: &Item,
        relation: ColorRelation,
        accents: AccentSummary,
        components: &ComponentScores,
    ) -> Vec<String> {
        let mut reasons = Vec::new();
        let (low, high) = ordered_colors(left.primary_color, right.primary_color);

        reasons.push(match relation {
            ColorRelation::Complementary => format!("complementary colors ({low} & {high})"),
            ColorRelation::Analogous => format!("analogous colors ({low} & {high})"),
            ColorRelation::Monochrome => format!("matching {low} tones"),
            ColorRelation::Neutral => {
                let (neutral, other) = if low.is_neutral() { (low, high) } else { (high, low) };
                format!("neutral {neutral} grounds {other}")
            }
            ColorRelation::Unrelated => format!("loosely related colors ({low} & {high})"),
            ColorRelation::Clash => format!("clashing colors ({low} & {high})"),
        });

        if accents.clashes > 0 {
            reasons.push("accent colors clash with the main palette".to_string());
        }
        if accents.echoes > 0 {
            reasons.push("accent colors echo the main palette".to_string());
        }

        match (left.pattern.is_solid(), right.pattern.is_solid()) {
            (true, true) => reasons.push("two solid pieces".to_string()),
            (true, false) => reasons.push(format!("{} pattern balanced by a solid", right.pattern)),
            (false, true) => reasons.push(format!("{} pattern balanced by a solid", left.pattern)),
            (false, false) => reasons.push("both items are patterned".to_string()),
        }

        if left.style == right.style {
            reasons.push(format!("shared {} style", left.style));
        } else {
            let (low, high) = if left.style <= right.style {
                (left.style, right.style)
            } else {
                (right.style, left.style)
            };
            if components.style >= 0.5 {
                reasons.push(format!("{low} and {high} styles blend"));
            } else {
                reasons.push(format!("{low} and {high} styles diverge"));
            }
        }

        reasons
    }
}

impl CompatibilityRules for RuleBasedScorer {
    fn score(&self, left: &Item, right: &Item) -> Result<Compatibility, InvalidPairError> {
        if !left.category.complements(right.category) {
            return Err(InvalidPairError {
                left_id: left.id.clone(),
                left: left.category,
                right_id: Some(right.id.clone()),
                right: right.category,
            });
        }

        let (color, relation, accents) = self.color_harmony(left, right);
        let components = ComponentScores {
            color,
            pattern: self.pattern_score(left.pattern, right.pattern),
            style: self.style_score(left.style, right.style),
        };
        let score = self.calculate_total_score(&components);

        Ok(Compatibility {
            score,
            components,
            color_relation: relation,
            strength: MatchStrength::from_score(score),
            reasons: self.generate_reasoning(left, right, relation, accents, &components),
        })
    }
}

/// Accent colors that clashed with or repeated the other item's main color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccentSummary {
    pub clashes: u32,
    pub echoes: u32,
}

fn ordered_colors(a: Color, b: Color) -> (Color, Color) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::Category;

    fn top(color: Color, pattern: Pattern, style: Style) -> Item {
        Item::new("T1", Category::Top, color, pattern, style)
    }

    fn bottom(id: &str, color: Color, pattern: Pattern, style: Style) -> Item {
        Item::new(id, Category::Bottom, color, pattern, style)
    }

    #[test]
    fn test_total_score_calculation() {
        let scorer = RuleBasedScorer::default();
        let components = ComponentScores { color: 0.8, pattern: 0.5, style: 1.0 };

        let total = scorer.calculate_total_score(&components);
        // (0.8 * 0.5) + (0.5 * 0.2) + (1.0 * 0.3) = 0.40 + 0.10 + 0.30 = 0.80
        assert!((total.value() - 0.80).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weights_score_minimum() {
        let scorer =
            RuleBasedScorer::with_weights(ScoringWeights { color: 0.0, pattern: 0.0, style: 0.0 });
        let total = scorer.calculate_total_score(&ComponentScores { color: 1.0, pattern: 1.0, style: 1.0 });
        assert_eq!(total, CompatibilityScore::MIN);
    }

    #[test]
    fn test_same_category_is_rejected() {
        let scorer = RuleBasedScorer::default();
        let item = top(Color::Blue, Pattern::Solid, Style::Casual);

        let error = scorer.score(&item, &item).unwrap_err();
        assert_eq!(error.left, Category::Top);
        assert_eq!(error.right, Category::Top);
    }

    #[test]
    fn test_navy_casual_beats_orange_plaid_formal() {
        let scorer = RuleBasedScorer::default();
        let t1 = top(Color::Blue, Pattern::Solid, Style::Casual);
        let b1 = bottom("B1", Color::Navy, Pattern::Solid, Style::Casual);
        let b2 = bottom("B2", Color::Orange, Pattern::Plaid, Style::Formal);

        let first = scorer.score(&t1, &b1).expect("valid pair");
        let second = scorer.score(&t1, &b2).expect("valid pair");

        // 0.85 * 0.5 + 0.85 * 0.2 + 1.0 * 0.3
        assert!((first.score.value() - 0.895).abs() < 1e-9);
        // 1.0 * 0.5 + 1.0 * 0.2 + 0.3 * 0.3
        assert!((second.score.value() - 0.79).abs() < 1e-9);
        assert_eq!(first.color_relation, ColorRelation::Analogous);
        assert_eq!(second.color_relation, ColorRelation::Complementary);
        assert_eq!(first.strength, MatchStrength::Strong);
        assert_eq!(second.strength, MatchStrength::Good);
    }

    #[test]
    fn test_both_patterned_is_penalised() {
        let scorer = RuleBasedScorer::default();
        assert_eq!(scorer.pattern_score(Pattern::Striped, Pattern::Floral), BOTH_PATTERNED);
        assert_eq!(scorer.pattern_score(Pattern::Solid, Pattern::Floral), ONE_PATTERNED);
        assert_eq!(scorer.pattern_score(Pattern::Solid, Pattern::Solid), BOTH_SOLID);
    }

    #[test]
    fn test_style_table_is_symmetric_and_divergent_styles_score_low() {
        let scorer = RuleBasedScorer::default();
        let styles =
            [Style::Casual, Style::Formal, Style::Business, Style::Sporty, Style::Streetwear];

        for a in styles {
            for b in styles {
                assert_eq!(scorer.style_score(a, b), scorer.style_score(b, a));
            }
            assert_eq!(scorer.style_score(a, a), SAME_STYLE);
        }
        assert_eq!(scorer.style_score(Style::Formal, Style::Sporty), 0.0);
    }

    #[test]
    fn test_accent_colors_adjust_harmony_symmetrically() {
        let scorer = RuleBasedScorer::default();
        let shirt = top(Color::Red, Pattern::Solid, Style::Casual).with_secondary_colors([Color::Pink]);
        let trousers = bottom("B1", Color::Green, Pattern::Solid, Style::Casual)
            .with_secondary_colors([Color::Red]);

        let forward = scorer.score(&shirt, &trousers).expect("valid pair");
        let backward = scorer.score(&trousers, &shirt).expect("valid pair");

        // complementary 1.0, pink clashes with green (-0.10), red echoes red (+0.05)
        assert!((forward.components.color - 0.95).abs() < 1e-9);
        assert_eq!(forward.score, backward.score);
        assert!(forward.reasons.iter().any(|reason| reason.contains("clash with")));
        assert!(forward.reasons.iter().any(|reason| reason.contains("echo")));
    }

    #[test]
    fn test_reasoning_mentions_each_factor() {
        let scorer = RuleBasedScorer::default();
        let t1 = top(Color::Blue, Pattern::Solid, Style::Casual);
        let b2 = bottom("B2", Color::Orange, Pattern::Plaid, Style::Formal);

        let result = scorer.score(&t1, &b2).expect("valid pair");
        assert_eq!(
            result.reasons,
            vec![
                "complementary colors (orange & blue)".to_string(),
                "plaid pattern balanced by a solid".to_string(),
                "casual and formal styles diverge".to_string(),
            ]
        );
    }
}
