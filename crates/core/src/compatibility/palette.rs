use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::item::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRelation {
    Complementary,
    Analogous,
    Monochrome,
    Neutral,
    Unrelated,
    Clash,
}

impl ColorRelation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complementary => "complementary",
            Self::Analogous => "analogous",
            Self::Monochrome => "monochrome",
            Self::Neutral => "neutral",
            Self::Unrelated => "unrelated",
            Self::Clash => "clash",
        }
    }
}

/// Color harmony sub-score for each relation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelationScores {
    pub complementary: f64,
    pub analogous: f64,
    pub monochrome: f64,
    pub neutral: f64,
    pub unrelated: f64,
    pub clash: f64,
}

impl RelationScores {
    pub fn score(&self, relation: ColorRelation) -> f64 {
        match relation {
            ColorRelation::Complementary => self.complementary,
            ColorRelation::Analogous => self.analogous,
            ColorRelation::Monochrome => self.monochrome,
            ColorRelation::Neutral => self.neutral,
            ColorRelation::Unrelated => self.unrelated,
            ColorRelation::Clash => self.clash,
        }
    }
}

impl Default for RelationScores {
    fn default() -> Self {
        super::DEFAULT_RELATION_SCORES
    }
}

const DEFAULT_COMPLEMENTS: &[(Color, Color)] = &[
    (Color::Red, Color::Green),
    (Color::Blue, Color::Orange),
    (Color::Yellow, Color::Purple),
    (Color::Black, Color::White),
    (Color::Pink, Color::Gray),
    (Color::Navy, Color::Orange),
];

const DEFAULT_CLASHES: &[(Color, Color)] = &[
    (Color::Red, Color::Pink),
    (Color::Orange, Color::Pink),
    (Color::Orange, Color::Purple),
    (Color::Yellow, Color::Pink),
    (Color::Green, Color::Pink),
];

/// Color-relationship table keyed by unordered color pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable {
    complements: BTreeSet<(Color, Color)>,
    clashes: BTreeSet<(Color, Color)>,
}

fn pair_key(a: Color, b: Color) -> (Color, Color) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ColorTable {
    pub fn new(
        complements: impl IntoIterator<Item = (Color, Color)>,
        clashes: impl IntoIterator<Item = (Color, Color)>,
    ) -> Self {
        Self {
            complements: complements.into_iter().map(|(a, b)| pair_key(a, b)).collect(),
            clashes: clashes.into_iter().map(|(a, b)| pair_key(a, b)).collect(),
        }
    }

    pub fn complements(&self) -> impl Iterator<Item = (Color, Color)> + '_ {
        self.complements.iter().copied()
    }

    pub fn clashes(&self) -> impl Iterator<Item = (Color, Color)> + '_ {
        self.clashes.iter().copied()
    }

    /// Symmetric relation between two colors.
    ///
    /// Precedence: identical, table complement, table clash, neutral, then
    /// hue-wheel proximity.
    pub fn relation(&self, a: Color, b: Color) -> ColorRelation {
        if a == b {
            return ColorRelation::Monochrome;
        }

        let key = pair_key(a, b);
        if self.complements.contains(&key) {
            ColorRelation::Complementary
        } else if self.clashes.contains(&key) {
            ColorRelation::Clash
        } else if a.is_neutral() || b.is_neutral() {
            ColorRelation::Neutral
        } else if a.family().is_adjacent(b.family()) {
            ColorRelation::Analogous
        } else {
            ColorRelation::Unrelated
        }
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new(DEFAULT_COMPLEMENTS.iter().copied(), DEFAULT_CLASHES.iter().copied())
    }
}
