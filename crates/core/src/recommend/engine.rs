//! Recommender implementation

use tracing::info;

use crate::catalog::Catalog;
use crate::compatibility::{CompatibilityRules, CompatibilityScore, RuleBasedScorer};
use crate::config::AppConfig;
use crate::domain::item::{Category, Item};
use crate::errors::{InvalidPairError, RecommendError};

use super::types::*;
use super::{RecommendResult, DEFAULT_LIMIT};

/// Category suggested for an item when the caller does not name one.
pub fn default_target(category: Category) -> Category {
    match category {
        Category::Top => Category::Bottom,
        Category::Bottom => Category::Top,
        Category::Outerwear => Category::Top,
        Category::Footwear => Category::Bottom,
        Category::Dress => Category::Footwear,
    }
}

/// Ranks the catalog's bottoms for `item` with the default rules.
pub fn recommend(item: &Item, catalog: &Catalog, limit: usize) -> RecommendResult<Recommendation> {
    Recommender::new().recommend(item, catalog, Some(limit))
}

/// Ranks candidates with a set of compatibility rules. Holds no catalog
/// state; every call is a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct Recommender<R = RuleBasedScorer> {
    rules: R,
    default_limit: usize,
    min_score: CompatibilityScore,
}

impl Recommender<RuleBasedScorer> {
    pub fn new() -> Self {
        Self::with_rules(RuleBasedScorer::default())
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_rules(RuleBasedScorer::from_config(&config.scoring))
            .with_default_limit(config.recommender.default_limit)
            .with_min_score(config.recommender.min_score)
    }
}

impl Default for Recommender<RuleBasedScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CompatibilityRules> Recommender<R> {
    pub fn with_rules(rules: R) -> Self {
        Self { rules, default_limit: DEFAULT_LIMIT, min_score: CompatibilityScore::MIN }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    /// Candidates scoring below this are left out of the ranking.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = CompatibilityScore::new(min_score);
        self
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Ranks the catalog's bottoms for `item`.
    pub fn recommend(
        &self,
        item: &Item,
        catalog: &Catalog,
        limit: Option<usize>,
    ) -> RecommendResult<Recommendation> {
        self.recommend_for(item, Category::Bottom, catalog, limit)
    }

    /// Ranks catalog items of `target` for `item`, best first, ties broken by id.
    ///
    /// A `target` that `item` cannot be worn with is rejected before the
    /// catalog is consulted. `None` uses the default limit; zero is raised
    /// to one.
    pub fn recommend_for(
        &self,
        item: &Item,
        target: Category,
        catalog: &Catalog,
        limit: Option<usize>,
    ) -> RecommendResult<Recommendation> {
        if !item.category.complements(target) {
            return Err(InvalidPairError {
                left_id: item.id.clone(),
                left: item.category,
                right_id: None,
                right: target,
            }
            .into());
        }

        let candidates: Vec<&Item> = catalog
            .items_by_category(target)
            .into_iter()
            .filter(|candidate| candidate.id != item.id)
            .collect();

        if candidates.is_empty() {
            return Err(RecommendError::EmptyCatalog { category: target });
        }

        let mut ranked = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let compatibility = self.rules.score(item, candidate)?;
            if compatibility.score.total_cmp(&self.min_score).is_lt() {
                continue;
            }
            ranked.push(RankedItem { item: (*candidate).clone(), compatibility });
        }

        ranked.sort_by(|a, b| {
            b.score().total_cmp(&a.score()).then_with(|| a.item.id.cmp(&b.item.id))
        });

        let limit = limit.unwrap_or(self.default_limit).max(1);
        ranked.truncate(limit);

        info!(
            event_name = "recommend.completed",
            query_id = %item.id,
            target = %target,
            candidates = candidates.len(),
            returned = ranked.len(),
            "recommendation ranked"
        );

        Ok(Recommendation {
            query: item.id.clone(),
            target,
            candidates_considered: candidates.len(),
            items: ranked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::{ColorRelation, Compatibility, ComponentScores, MatchStrength};
    use crate::domain::item::{Color, ItemId, Pattern, Style};

    fn wardrobe() -> Catalog {
        Catalog::from_items(vec![
            Item::new("T1", Category::Top, Color::Blue, Pattern::Solid, Style::Casual),
            Item::new("B1", Category::Bottom, Color::Navy, Pattern::Solid, Style::Casual),
            Item::new("B2", Category::Bottom, Color::Orange, Pattern::Plaid, Style::Formal),
            Item::new("B3", Category::Bottom, Color::Pink, Pattern::Floral, Style::Sporty),
            Item::new("S1", Category::Footwear, Color::White, Pattern::Solid, Style::Casual),
        ])
        .expect("valid wardrobe")
    }

    /// Scores every valid pair the same so ordering falls back to ids.
    struct FlatRules;

    impl CompatibilityRules for FlatRules {
        fn score(&self, left: &Item, right: &Item) -> Result<Compatibility, InvalidPairError> {
            if !left.category.complements(right.category) {
                return Err(InvalidPairError {
                    left_id: left.id.clone(),
                    left: left.category,
                    right_id: Some(right.id.clone()),
                    right: right.category,
                });
            }
            Ok(Compatibility {
                score: CompatibilityScore::new(0.5),
                components: ComponentScores::default(),
                color_relation: ColorRelation::Neutral,
                strength: MatchStrength::Fair,
                reasons: vec!["flat".to_string()],
            })
        }
    }

    #[test]
    fn test_default_limit_applies_when_unspecified() {
        let catalog = wardrobe();
        let top = catalog.get(&"T1".into()).expect("T1").clone();

        let recommendation =
            Recommender::new().with_default_limit(2).recommend(&top, &catalog, None).expect("ranked");

        assert_eq!(recommendation.len(), 2);
        assert_eq!(recommendation.candidates_considered, 3);
        assert_eq!(recommendation.target, Category::Bottom);
    }

    #[test]
    fn test_zero_limit_returns_single_best_match() {
        let catalog = wardrobe();
        let top = catalog.get(&"T1".into()).expect("T1").clone();

        let recommendation = recommend(&top, &catalog, 0).expect("ranked");
        assert_eq!(recommendation.ids(), vec![&ItemId::from("B1")]);
    }

    #[test]
    fn test_ties_are_broken_by_id() {
        let catalog = wardrobe();
        let top = catalog.get(&"T1".into()).expect("T1").clone();

        let recommendation = Recommender::with_rules(FlatRules)
            .recommend(&top, &catalog, Some(10))
            .expect("ranked");

        let ids: Vec<_> = recommendation.ids().into_iter().map(|id| id.0.clone()).collect();
        assert_eq!(ids, vec!["B1", "B2", "B3"]);
    }

    #[test]
    fn test_min_score_filters_weak_matches() {
        let catalog = wardrobe();
        let top = catalog.get(&"T1".into()).expect("T1").clone();

        let recommendation = Recommender::new()
            .with_min_score(0.85)
            .recommend(&top, &catalog, Some(10))
            .expect("ranked");

        assert_eq!(recommendation.ids(), vec![&ItemId::from("B1")]);
        assert_eq!(recommendation.candidates_considered, 3);
    }

    #[test]
    fn test_recommend_for_other_categories() {
        let catalog = wardrobe();
        let shoes = catalog.get(&"S1".into()).expect("S1").clone();

        assert_eq!(default_target(Category::Footwear), Category::Bottom);
        let recommendation = Recommender::new()
            .recommend_for(&shoes, default_target(shoes.category), &catalog, None)
            .expect("ranked");
        assert_eq!(recommendation.len(), 3);

        let tops = Recommender::new()
            .recommend_for(&shoes, Category::Top, &catalog, None)
            .expect("ranked");
        assert_eq!(tops.ids(), vec![&ItemId::from("T1")]);
    }

    #[test]
    fn test_non_complementary_target_surfaces_invalid_pair() {
        let catalog = wardrobe();
        let top = catalog.get(&"T1".into()).expect("T1").clone();
        let other_top = Item::new("T9", Category::Top, Color::Red, Pattern::Solid, Style::Casual);

        let error = Recommender::new()
            .recommend_for(&other_top, Category::Top, &catalog, None)
            .unwrap_err();
        assert!(matches!(error, RecommendError::InvalidPair(_)));

        // rejected even when the query is the only item of the target category
        let error =
            Recommender::new().recommend_for(&top, Category::Top, &catalog, None).unwrap_err();
        assert_eq!(
            error,
            RecommendError::InvalidPair(InvalidPairError {
                left_id: ItemId::from("T1"),
                left: Category::Top,
                right_id: None,
                right: Category::Top,
            })
        );
    }

    #[test]
    fn test_bottom_query_is_invalid_regardless_of_other_bottoms() {
        let lone_bottom = Catalog::from_items(vec![
            Item::new("T1", Category::Top, Color::Blue, Pattern::Solid, Style::Casual),
            Item::new("B1", Category::Bottom, Color::Navy, Pattern::Solid, Style::Casual),
        ])
        .expect("valid wardrobe");
        let query = lone_bottom.get(&"B1".into()).expect("B1").clone();
        let error = recommend(&query, &lone_bottom, 5).unwrap_err();
        assert!(matches!(error, RecommendError::InvalidPair(ref pair) if pair.right_id.is_none()));

        let many_bottoms = wardrobe();
        let query = many_bottoms.get(&"B2".into()).expect("B2").clone();
        let error = recommend(&query, &many_bottoms, 5).unwrap_err();
        assert!(matches!(error, RecommendError::InvalidPair(ref pair) if pair.right_id.is_none()));
    }

    #[test]
    fn test_invalid_target_is_rejected_before_empty_category() {
        let catalog = Catalog::from_items(vec![Item::new(
            "T1",
            Category::Top,
            Color::Blue,
            Pattern::Solid,
            Style::Casual,
        )])
        .expect("valid wardrobe");
        let dress = Item::new("D1", Category::Dress, Color::Black, Pattern::Solid, Style::Formal);

        let error =
            Recommender::new().recommend_for(&dress, Category::Bottom, &catalog, None).unwrap_err();
        assert!(matches!(error, RecommendError::InvalidPair(_)));

        let error = Recommender::new()
            .recommend_for(&dress, Category::Footwear, &catalog, None)
            .unwrap_err();
        assert_eq!(error, RecommendError::EmptyCatalog { category: Category::Footwear });
    }
}
