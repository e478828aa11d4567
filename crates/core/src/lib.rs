pub mod annotations;
pub mod catalog;
pub mod compatibility;
pub mod config;
pub mod domain;
pub mod errors;
pub mod images;
pub mod recommend;

pub use annotations::{AnnotationSet, AnnotationTable};
pub use catalog::{load_catalog, Catalog, CatalogFormat};
pub use compatibility::{
    ColorRelation, ColorTable, Compatibility, CompatibilityRules, CompatibilityScore,
    ComponentScores, MatchStrength, RuleBasedScorer, ScoringWeights,
};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::item::{Category, Color, Item, ItemId, Pattern, Style};
pub use errors::{ApplicationError, InterfaceError, InvalidPairError, LoadError, RecommendError};
pub use images::ImageIndex;
pub use recommend::{default_target, recommend, RankedItem, Recommendation, Recommender};
