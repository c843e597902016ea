//! Test doubles for the ports.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Identity, NewPost, Post, PostId, Timestamp};
use crate::ports::lock;
use crate::ports::{
    AuthBackend, AuthError, Listeners, PostSnapshot, PostStore, StoreError, Subscription,
};

#[derive(Default)]
struct AuthState {
    confirmed: bool,
    current: Option<Identity>,
    accounts: Vec<(Identity, String)>,
    fail_sign_out: bool,
}

pub(crate) struct FakeAuth {
    state: Mutex<AuthState>,
    listeners: Listeners<Option<Identity>>,
}

impl FakeAuth {
    pub fn unconfirmed() -> Self {
        Self {
            state: Mutex::new(AuthState::default()),
            listeners: Listeners::new(),
        }
    }

    pub fn confirmed(current: Option<Identity>) -> Self {
        let auth = Self::unconfirmed();
        {
            let mut state = lock(&auth.state);
            state.confirmed = true;
            state.current = current;
        }
        auth
    }

    pub fn with_account(self, identity: Identity, password: &str) -> Self {
        lock(&self.state)
            .accounts
            .push((identity, password.to_string()));
        self
    }

    pub fn confirm(&self, current: Option<Identity>) {
        let mut state = lock(&self.state);
        state.confirmed = true;
        state.current = current.clone();
        self.listeners.notify(&current);
    }

    pub fn fail_sign_out(&self) {
        lock(&self.state).fail_sign_out = true;
    }

    pub fn watchers(&self) -> usize {
        self.listeners.len()
    }
}

#[async_trait]
impl AuthBackend for FakeAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let mut state = lock(&self.state);
        let identity = state
            .accounts
            .iter()
            .find(|(id, pw)| id.email == email && pw == password)
            .map(|(id, _)| id.clone())
            .ok_or(AuthError::InvalidCredentials)?;
        state.current = Some(identity.clone());
        self.listeners.notify(&state.current);
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut state = lock(&self.state);
        if state.fail_sign_out {
            return Err(AuthError::Backend("network unreachable".to_string()));
        }
        state.current = None;
        self.listeners.notify(&None);
        Ok(())
    }

    fn watch_identity(&self) -> Subscription<Option<Identity>> {
        let state = lock(&self.state);
        let initial = state.confirmed.then(|| state.current.clone());
        self.listeners.subscribe(initial)
    }
}

#[derive(Default)]
struct StoreState {
    posts: Vec<Post>,
    next_id: u64,
    fail_reads: bool,
    fail_writes: bool,
}

/// Keeps posts in insertion order so callers have to sort.
pub(crate) struct FakeStore {
    state: Mutex<StoreState>,
    listeners: Listeners<PostSnapshot>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            listeners: Listeners::new(),
        }
    }

    /// Insert a post as if another client had written it.
    pub fn insert(&self, post: Post) {
        let mut state = lock(&self.state);
        state.posts.push(post);
        self.listeners.notify(&Ok(state.posts.clone()));
    }

    pub fn fail_reads(&self) {
        lock(&self.state).fail_reads = true;
    }

    pub fn fail_writes(&self) {
        lock(&self.state).fail_writes = true;
    }

    /// Push a transport failure to every subscriber.
    pub fn break_subscriptions(&self) {
        self.listeners
            .notify(&Err(StoreError::Unavailable("connection reset".to_string())));
    }

    pub fn watchers(&self) -> usize {
        self.listeners.len()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).posts.len()
    }
}

#[async_trait]
impl PostStore for FakeStore {
    async fn create(&self, post: NewPost) -> Result<PostId, StoreError> {
        let mut state = lock(&self.state);
        if state.fail_writes {
            return Err(StoreError::PermissionDenied("missing write rights".to_string()));
        }
        state.next_id += 1;
        let id = PostId::new(format!("post-{}", state.next_id));
        let created_at = Timestamp::new(1_000 + state.next_id as i64, 0);
        state.posts.push(post.into_post(id.clone(), created_at));
        self.listeners.notify(&Ok(state.posts.clone()));
        Ok(id)
    }

    async fn get(&self, id: &PostId) -> Result<Option<Post>, StoreError> {
        let state = lock(&self.state);
        if state.fail_reads {
            return Err(StoreError::Unavailable("offline".to_string()));
        }
        Ok(state.posts.iter().find(|p| &p.id == id).cloned())
    }

    async fn subscribe(&self) -> Result<Subscription<PostSnapshot>, StoreError> {
        let state = lock(&self.state);
        if state.fail_reads {
            return Err(StoreError::Unavailable("offline".to_string()));
        }
        Ok(self.listeners.subscribe(Some(Ok(state.posts.clone()))))
    }

    async fn list_ids(&self) -> Result<Vec<PostId>, StoreError> {
        let state = lock(&self.state);
        if state.fail_reads {
            return Err(StoreError::Unavailable("offline".to_string()));
        }
        Ok(state.posts.iter().map(|p| p.id.clone()).collect())
    }
}
