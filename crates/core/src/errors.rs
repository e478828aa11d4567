use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::item::{Category, ItemId, TokenError};

/// Catalog data that could not be turned into items.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read catalog `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("unsupported catalog format `{0}` (expected .toml or .json)")]
    UnsupportedFormat(String),
    #[error("malformed catalog document: {0}")]
    Malformed(String),
    #[error("item #{index} is missing required attribute `{attribute}`")]
    MissingAttribute { index: usize, attribute: &'static str },
    #[error("item #{index} (`{id}`): {source}")]
    InvalidAttribute {
        index: usize,
        id: String,
        #[source]
        source: TokenError,
    },
    #[error("item #{index} has an empty id")]
    EmptyId { index: usize },
    #[error("duplicate item id `{0}`")]
    DuplicateId(ItemId),
    #[error("image root `{path}` is not a directory")]
    ImageRoot { path: PathBuf },
    #[error("no images found under `{path}`")]
    NoImages { path: PathBuf },
    #[error("annotations directory `{path}` does not exist")]
    AnnotationsDir { path: PathBuf },
}

/// Two items whose categories cannot be worn together were compared.
///
/// `right_id` is `None` when an item was matched against a whole category
/// it cannot pair with, before any candidate was picked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidPairError {
    pub left_id: ItemId,
    pub left: Category,
    pub right_id: Option<ItemId>,
    pub right: Category,
}

impl fmt::Display for InvalidPairError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.right_id {
            Some(right_id) => write!(
                f,
                "cannot pair `{}` ({}) with `{right_id}` ({})",
                self.left_id, self.left, self.right
            ),
            None => write!(
                f,
                "cannot pair `{}` ({}) with {} items",
                self.left_id, self.left, self.right
            ),
        }
    }
}

impl std::error::Error for InvalidPairError {}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("no {category} items available to recommend")]
    EmptyCatalog { category: Category },
    #[error(transparent)]
    InvalidPair(#[from] InvalidPairError),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Recommend(#[from] RecommendError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("invalid catalog: {message}")]
    InvalidCatalog { message: String, correlation_id: String },
    #[error("no matches: {message}")]
    NoMatches { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCatalog { .. } => {
                "The wardrobe catalog could not be loaded. Check the catalog file and try again."
            }
            Self::NoMatches { .. } => "No matches found.",
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::InvalidCatalog { correlation_id, .. }
            | Self::NoMatches { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::InvalidCatalog { correlation_id: id, .. }
            | InterfaceError::NoMatches { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let message = value.to_string();
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Load(_) => Self::InvalidCatalog { message, correlation_id },
            ApplicationError::Recommend(RecommendError::EmptyCatalog { .. }) => {
                Self::NoMatches { message, correlation_id }
            }
            ApplicationError::Recommend(RecommendError::InvalidPair(_)) => {
                Self::Internal { message, correlation_id }
            }
        }
    }
}
