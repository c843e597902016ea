//! Read side of the post repository.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};

use crate::domain::{Post, PostId};
use crate::error::PostError;
use crate::ports::{PostSnapshot, PostStore, StoreError, Subscription};

/// Newest first; equal instants fall back to ascending id so every
/// snapshot of the same data has the same order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[derive(Clone)]
pub struct PostReader {
    store: Arc<dyn PostStore>,
}

impl PostReader {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// Live feed of the whole collection.
    ///
    /// Never fails up front: if the store refuses the subscription the feed
    /// yields that error once and then ends.
    pub async fn observe_list(&self) -> PostFeed {
        match self.store.subscribe().await {
            Ok(subscription) => {
                tracing::debug!("Subscribed to post collection");
                PostFeed {
                    state: FeedState::Live(subscription),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to subscribe to post collection");
                PostFeed {
                    state: FeedState::Failed(Some(e)),
                }
            }
        }
    }

    /// Fetch one post. `Ok(None)` is the ordinary not-found outcome.
    pub async fn get_by_id(&self, id: &PostId) -> Result<Option<Post>, PostError> {
        let post = self.store.get(id).await.map_err(|e| {
            tracing::error!(post_id = %id, error = %e, "Failed to fetch post");
            PostError::Fetch(e)
        })?;

        if post.is_none() {
            tracing::debug!(post_id = %id, "Post not found");
        }
        Ok(post)
    }

    /// Every post id, newest first. Used to enumerate detail pages ahead of time.
    pub async fn list_ids(&self) -> Result<Vec<PostId>, PostError> {
        let ids = self.store.list_ids().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to enumerate posts");
            PostError::Fetch(e)
        })?;
        tracing::debug!(count = ids.len(), "Enumerated posts");
        Ok(ids)
    }
}

enum FeedState {
    Live(Subscription<PostSnapshot>),
    Failed(Option<StoreError>),
}

/// Full-replace stream of sorted post snapshots.
///
/// Dropping the feed unsubscribes from the store.
pub struct PostFeed {
    state: FeedState,
}

impl PostFeed {
    /// Wait for the next snapshot. `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<Result<Vec<Post>, PostError>> {
        StreamExt::next(self).await
    }

    fn shape(snapshot: PostSnapshot) -> Result<Vec<Post>, PostError> {
        match snapshot {
            Ok(mut posts) => {
                sort_newest_first(&mut posts);
                tracing::debug!(count = posts.len(), "Post snapshot received");
                Ok(posts)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Post subscription reported an error");
                Err(PostError::Fetch(e))
            }
        }
    }
}

impl Stream for PostFeed {
    type Item = Result<Vec<Post>, PostError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match &mut self.state {
            FeedState::Live(subscription) => Pin::new(subscription)
                .poll_next(cx)
                .map(|item| item.map(Self::shape)),
            FeedState::Failed(error) => {
                Poll::Ready(error.take().map(|e| Err(PostError::Fetch(e))))
            }
        }
    }
}
