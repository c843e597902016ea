//! Authentication port.

use async_trait::async_trait;

use super::Subscription;
use crate::domain::Identity;

/// Credential-based auth provider for a single client.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Sign the current user out.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Listen to identity changes.
    ///
    /// The first item is the current identity (or its absence) once the
    /// backend has confirmed it; each later sign-in, sign-out or
    /// invalidation delivers one more item.
    fn watch_identity(&self) -> Subscription<Option<Identity>>;
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session error: {0}")]
    Session(String),

    #[error("Auth backend error: {0}")]
    Backend(String),

    #[error("Hashing error: {0}")]
    Hashing(String),
}
