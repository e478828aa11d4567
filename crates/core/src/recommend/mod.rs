//! Outfit recommender
//!
//! Ranks catalog items of a complementary category against a selected item.

mod engine;
mod types;

pub use engine::{default_target, recommend, Recommender};
pub use types::*;

use crate::errors::RecommendError;

/// Result type for recommendation operations
pub type RecommendResult<T> = Result<T, RecommendError>;

/// Matches returned when the caller does not ask for a specific count
pub const DEFAULT_LIMIT: usize = 5;

/// Upper bound accepted for the configured default limit
pub const MAX_LIMIT: usize = 100;
