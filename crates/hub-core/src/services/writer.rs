//! Write side of the post repository.

use std::sync::Arc;

use crate::domain::{Identity, PostDraft, PostId, mask_email};
use crate::error::PostError;
use crate::ports::PostStore;

#[derive(Clone)]
pub struct PostWriter {
    store: Arc<dyn PostStore>,
}

impl PostWriter {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// Validate `draft` and submit it attributed to `author`.
    ///
    /// The caller is responsible for `author` being the signed-in identity;
    /// whether that identity may write is for the store's policy to decide.
    /// Id and creation instant come back from the store.
    pub async fn create(&self, draft: &PostDraft, author: &Identity) -> Result<PostId, PostError> {
        let record = draft.validate(author).inspect_err(|e| {
            tracing::debug!(reason = %e, "Draft rejected");
        })?;
        let tag_count = record.tags.len();

        match self.store.create(record).await {
            Ok(id) => {
                tracing::info!(
                    post_id = %id,
                    author = %mask_email(&author.email),
                    tags = tag_count,
                    "Post created"
                );
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(
                    author = %mask_email(&author.email),
                    error = %e,
                    "Store rejected post"
                );
                Err(PostError::Write(e))
            }
        }
    }
}
