//! Document store port.

use async_trait::async_trait;

use super::Subscription;
use crate::domain::{NewPost, Post, PostId};

/// One item of a collection subscription: the full collection, or the
/// reason the backend could not deliver it.
pub type PostSnapshot = Result<Vec<Post>, StoreError>;

/// Post collection in a document store.
///
/// The store owns identity and time: it picks the id and the creation
/// instant of every record it accepts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a record with a server-assigned id and timestamp.
    async fn create(&self, post: NewPost) -> Result<PostId, StoreError>;

    /// Fetch a single record. `Ok(None)` if no record has this id.
    async fn get(&self, id: &PostId) -> Result<Option<Post>, StoreError>;

    /// Listen to the collection ordered by creation instant, newest first.
    ///
    /// The first item is the current snapshot; every later change to the
    /// collection delivers another complete snapshot. Dropping the
    /// subscription stops delivery.
    async fn subscribe(&self) -> Result<Subscription<PostSnapshot>, StoreError>;

    /// Every id in the collection, newest first.
    async fn list_ids(&self) -> Result<Vec<PostId>, StoreError>;
}

/// Store operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}
