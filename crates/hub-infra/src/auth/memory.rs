//! In-memory credential backend.
//!
//! Models one client's auth session: a registry of email/password
//! accounts plus the identity currently signed in on this client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use hub_core::domain::{Identity, mask_email};
use hub_core::ports::{AuthBackend, AuthError, Listeners, Subscription, lock};

use super::password::Argon2PasswordService;

struct Account {
    identity: Identity,
    password_hash: String,
}

pub struct InMemoryAuthBackend {
    /// Keyed by lowercased email.
    accounts: RwLock<HashMap<String, Account>>,
    current: Mutex<Option<Identity>>,
    listeners: Listeners<Option<Identity>>,
    passwords: Argon2PasswordService,
    reject_sign_out: AtomicBool,
}

impl InMemoryAuthBackend {
    pub fn new(passwords: Argon2PasswordService) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            current: Mutex::new(None),
            listeners: Listeners::new(),
            passwords,
            reject_sign_out: AtomicBool::new(false),
        }
    }

    /// Create an account. The password is stored as an Argon2 hash.
    pub async fn register(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let key = email.trim().to_lowercase();
        let password_hash = self.passwords.hash(password)?;

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(AuthError::Backend(format!(
                "{} is already registered",
                mask_email(&key)
            )));
        }

        let identity = Identity::new(Uuid::new_v4().to_string(), email.trim());
        accounts.insert(
            key,
            Account {
                identity: identity.clone(),
                password_hash,
            },
        );

        tracing::info!(email = %mask_email(email), "Account registered");
        Ok(identity)
    }

    /// End the current session from the backend side, e.g. a revoked token.
    pub fn invalidate(&self) {
        if self.replace_current(None) {
            tracing::warn!("Session invalidated by backend");
        }
    }

    /// Make every following sign-out fail (or succeed again).
    pub fn reject_sign_out(&self, reject: bool) {
        self.reject_sign_out.store(reject, Ordering::Relaxed);
    }

    /// Number of open identity subscriptions.
    pub fn watcher_count(&self) -> usize {
        self.listeners.len()
    }

    /// Swap the signed-in identity; notifies only on an actual change.
    fn replace_current(&self, next: Option<Identity>) -> bool {
        let mut current = lock(&self.current);
        if *current == next {
            return false;
        }
        *current = next;
        self.listeners.notify(&current);
        true
    }
}

impl Default for InMemoryAuthBackend {
    fn default() -> Self {
        Self::new(Argon2PasswordService::new())
    }
}

#[async_trait]
impl AuthBackend for InMemoryAuthBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let (identity, password_hash) = {
            let accounts = self.accounts.read().await;
            let account = accounts
                .get(&email.trim().to_lowercase())
                .ok_or(AuthError::InvalidCredentials)?;
            (account.identity.clone(), account.password_hash.clone())
        };
        if !self.passwords.verify(password, &password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.replace_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.reject_sign_out.load(Ordering::Relaxed) {
            return Err(AuthError::Session("sign-out rejected by backend".to_string()));
        }
        self.replace_current(None);
        Ok(())
    }

    fn watch_identity(&self) -> Subscription<Option<Identity>> {
        let current = lock(&self.current);
        self.listeners.subscribe(Some(current.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn backend_with_ann() -> InMemoryAuthBackend {
        let backend = InMemoryAuthBackend::new(Argon2PasswordService::light().unwrap());
        backend.register("Ann@Example.com", "secret").await.unwrap();
        backend
    }

    #[tokio::test]
    async fn test_sign_in_and_out_notify_watchers() {
        let backend = backend_with_ann().await;
        let mut watch = backend.watch_identity();
        assert_eq!(watch.next().await, Some(None));

        let identity = backend.sign_in("ann@example.com", "secret").await.unwrap();
        assert_eq!(identity.email, "Ann@Example.com");
        assert_eq!(watch.next().await, Some(Some(identity)));

        backend.sign_out().await.unwrap();
        assert_eq!(watch.next().await, Some(None));
    }

    #[tokio::test]
    async fn test_bad_password_and_unknown_email_look_the_same() {
        let backend = backend_with_ann().await;

        assert_eq!(
            backend.sign_in("ann@example.com", "nope").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            backend.sign_in("bob@example.com", "secret").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let backend = backend_with_ann().await;

        let result = backend.register("ann@example.com", "other").await;

        assert!(matches!(result, Err(AuthError::Backend(_))));
    }

    #[tokio::test]
    async fn test_concurrent_registration_of_one_email() {
        let backend = InMemoryAuthBackend::new(Argon2PasswordService::light().unwrap());

        let (first, second) = tokio::join!(
            backend.register("bob@example.com", "one"),
            backend.register("Bob@Example.com", "two"),
        );

        assert_eq!(
            [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
            1
        );
        let password = if first.is_ok() { "one" } else { "two" };
        assert!(backend.sign_in("bob@example.com", password).await.is_ok());
    }

    #[tokio::test]
    async fn test_accounts_readable_while_registering() {
        let backend = backend_with_ann().await;

        let (registered, signed_in) = tokio::join!(
            backend.register("bob@example.com", "pw"),
            backend.sign_in("ann@example.com", "secret"),
        );

        assert!(registered.is_ok());
        assert!(signed_in.is_ok());
    }

    #[tokio::test]
    async fn test_invalidate_signs_out() {
        let backend = backend_with_ann().await;
        backend.sign_in("ann@example.com", "secret").await.unwrap();
        let mut watch = backend.watch_identity();
        assert!(watch.next().await.unwrap().is_some());

        backend.invalidate();

        assert_eq!(watch.next().await, Some(None));
    }

    #[tokio::test]
    async fn test_rejected_sign_out_keeps_session() {
        let backend = backend_with_ann().await;
        backend.sign_in("ann@example.com", "secret").await.unwrap();
        backend.reject_sign_out(true);

        assert!(matches!(backend.sign_out().await, Err(AuthError::Session(_))));
        assert!(lock(&backend.current).is_some());
    }

    #[tokio::test]
    async fn test_repeated_sign_out_emits_nothing() {
        let backend = backend_with_ann().await;
        let mut watch = backend.watch_identity();
        watch.next().await;

        backend.sign_out().await.unwrap();

        assert!(watch.try_next().is_none());
    }
}
