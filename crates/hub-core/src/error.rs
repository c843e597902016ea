//! Domain-level error types.

use thiserror::Error;

use crate::ports::StoreError;

/// Bad user input. Raised before any backend call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Body must not be empty")]
    EmptyBody,
}

/// Post service errors - what the read and write paths surface to a view.
///
/// A missing post is not represented here: lookups return `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum PostError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load posts: {0}")]
    Fetch(#[source] StoreError),

    #[error("Failed to save post: {0}")]
    Write(#[source] StoreError),
}

impl PostError {
    /// Whether the failure came from the user's input rather than the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, PostError::Validation(_))
    }
}
