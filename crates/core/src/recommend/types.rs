//! Types for the recommender

use serde::Serialize;

use crate::compatibility::{Compatibility, CompatibilityScore};
use crate::domain::item::{Category, Item, ItemId};

/// A candidate with its compatibility against the query item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    pub item: Item,
    #[serde(flatten)]
    pub compatibility: Compatibility,
}

impl RankedItem {
    pub fn score(&self) -> CompatibilityScore {
        self.compatibility.score
    }
}

/// Ranked matches for one query item, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub query: ItemId,
    pub target: Category,
    /// Candidates of the target category that were scored
    pub candidates_considered: usize,
    pub items: Vec<RankedItem>,
}

impl Recommendation {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<&ItemId> {
        self.items.iter().map(|ranked| &ranked.item.id).collect()
    }

    pub fn scores(&self) -> Vec<CompatibilityScore> {
        self.items.iter().map(RankedItem::score).collect()
    }

    pub fn best(&self) -> Option<&RankedItem> {
        self.items.first()
    }
}
