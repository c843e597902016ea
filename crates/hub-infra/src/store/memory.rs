//! In-memory post store.
//!
//! Behaves like a managed document store as far as clients can tell: ids
//! and creation instants are assigned here, every change is pushed to all
//! subscribers as a full snapshot, and writes go through a server-side
//! policy. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use hub_core::domain::{NewPost, Post, PostId, Timestamp, mask_email};
use hub_core::ports::{Listeners, PostSnapshot, PostStore, StoreError, Subscription};
use hub_core::services::sort_newest_first;

/// Who may create posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Any record attributed to a signed-in author.
    #[default]
    AnyAuthor,
    /// Only authors whose email is listed (compared case-insensitively).
    AllowList(Vec<String>),
}

impl WritePolicy {
    fn check(&self, author_email: Option<&str>) -> Result<(), StoreError> {
        let email = author_email
            .ok_or_else(|| StoreError::PermissionDenied("write requires an author".to_string()))?;

        match self {
            WritePolicy::AnyAuthor => Ok(()),
            WritePolicy::AllowList(allowed) => {
                if allowed.iter().any(|a| a.eq_ignore_ascii_case(email)) {
                    Ok(())
                } else {
                    Err(StoreError::PermissionDenied(format!(
                        "{} may not publish posts",
                        mask_email(email)
                    )))
                }
            }
        }
    }
}

/// In-memory post store configuration.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPostStoreConfig {
    pub write_policy: WritePolicy,
}

#[derive(Default)]
struct StoreInner {
    posts: HashMap<PostId, Post>,
    last_assigned: Option<Timestamp>,
    offline: bool,
}

impl StoreInner {
    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline {
            Err(StoreError::Unavailable("store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn snapshot(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.values().cloned().collect();
        sort_newest_first(&mut posts);
        posts
    }

    /// Never behind the previous assignment, even if the wall clock steps back.
    fn next_timestamp(&mut self) -> Timestamp {
        let now = Timestamp::now();
        let assigned = match self.last_assigned {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_assigned = Some(assigned);
        assigned
    }

    fn next_id(&self) -> PostId {
        loop {
            let id = PostId::new(Uuid::new_v4().simple().to_string());
            if !self.posts.contains_key(&id) {
                return id;
            }
        }
    }
}

/// In-memory post collection with live snapshot subscriptions.
pub struct InMemoryPostStore {
    inner: RwLock<StoreInner>,
    listeners: Listeners<PostSnapshot>,
    config: InMemoryPostStoreConfig,
}

impl InMemoryPostStore {
    pub fn new(config: InMemoryPostStoreConfig) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            listeners: Listeners::new(),
            config,
        }
    }

    /// Simulate losing (or regaining) the connection to the backend.
    ///
    /// Going offline pushes an `Unavailable` error to every subscriber;
    /// coming back pushes a fresh snapshot.
    pub async fn set_offline(&self, offline: bool) {
        let mut inner = self.inner.write().await;
        if inner.offline == offline {
            return;
        }
        inner.offline = offline;

        if offline {
            tracing::warn!("Post store went offline");
            self.listeners
                .notify(&Err(StoreError::Unavailable("connection lost".to_string())));
        } else {
            tracing::info!("Post store back online");
            self.listeners.notify(&Ok(inner.snapshot()));
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of open collection subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new(InMemoryPostStoreConfig::default())
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create(&self, post: NewPost) -> Result<PostId, StoreError> {
        let mut inner = self.inner.write().await;
        inner.ensure_online()?;
        self.config.write_policy.check(post.author_email.as_deref())?;

        let id = inner.next_id();
        let created_at = inner.next_timestamp();
        inner
            .posts
            .insert(id.clone(), post.into_post(id.clone(), created_at));

        let delivered = self.listeners.notify(&Ok(inner.snapshot()));
        tracing::debug!(
            post_id = %id,
            seconds = created_at.seconds,
            subscribers = delivered,
            "Post stored"
        );

        Ok(id)
    }

    async fn get(&self, id: &PostId) -> Result<Option<Post>, StoreError> {
        let inner = self.inner.read().await;
        inner.ensure_online()?;
        Ok(inner.posts.get(id).cloned())
    }

    async fn subscribe(&self) -> Result<Subscription<PostSnapshot>, StoreError> {
        let inner = self.inner.read().await;
        inner.ensure_online()?;
        let subscription = self.listeners.subscribe(Some(Ok(inner.snapshot())));
        tracing::debug!(subscribers = self.listeners.len(), "Collection subscribed");
        Ok(subscription)
    }

    async fn list_ids(&self) -> Result<Vec<PostId>, StoreError> {
        let inner = self.inner.read().await;
        inner.ensure_online()?;
        Ok(inner.snapshot().into_iter().map(|p| p.id).collect())
    }
}
