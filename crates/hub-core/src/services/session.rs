//! Auth session provider.
//!
//! Owns the single subscription to the backend's identity notifications and
//! re-publishes it as a stream of [`Session`] snapshots. Everything else in
//! the app observes the session through here and never talks to the auth
//! backend's notification channel directly.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::domain::{Session, mask_email};
use crate::ports::lock;
use crate::ports::{AuthBackend, AuthError, Listeners, Subscription};

/// Latest confirmed session. `None` until the backend reports initial status.
type SessionSlot = Arc<Mutex<Option<Session>>>;

pub struct SessionProvider {
    backend: Arc<dyn AuthBackend>,
    current: SessionSlot,
    listeners: Listeners<Session>,
    task: JoinHandle<()>,
}

impl SessionProvider {
    /// Subscribe to the backend and start forwarding identity changes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(backend: Arc<dyn AuthBackend>) -> Self {
        let current: SessionSlot = Arc::new(Mutex::new(None));
        let listeners = Listeners::new();
        let mut changes = backend.watch_identity();

        let slot = Arc::clone(&current);
        let fanout = listeners.clone();
        let task = tokio::spawn(async move {
            while let Some(identity) = changes.next().await {
                let session = Session::from(identity);
                let delivered = {
                    let mut latest = lock(&slot);
                    *latest = Some(session.clone());
                    fanout.notify(&session)
                };
                tracing::debug!(
                    authenticated = session.is_authenticated(),
                    listeners = delivered,
                    "Session changed"
                );
            }
            tracing::info!("Auth change stream ended");
        });

        tracing::info!("Session provider started");

        Self {
            backend,
            current,
            listeners,
            task,
        }
    }

    /// Stream of session snapshots.
    ///
    /// If the initial status is already known it is replayed as the first
    /// item; otherwise the first item arrives once the backend confirms it.
    pub fn observe_session(&self) -> Subscription<Session> {
        let latest = lock(&self.current);
        self.listeners.subscribe(latest.clone())
    }

    /// Latest confirmed session, or `None` while auth status is still loading.
    pub fn current(&self) -> Option<Session> {
        lock(&self.current).clone()
    }

    /// Wait until the backend has confirmed the initial status.
    pub async fn ready(&self) -> Option<Session> {
        if let Some(session) = self.current() {
            return Some(session);
        }
        self.observe_session().next().await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        match self.backend.sign_in(email, password).await {
            Ok(identity) => {
                tracing::info!(email = %mask_email(&identity.email), "Signed in");
                Ok(Session::signed_in(identity))
            }
            Err(e) => {
                tracing::warn!(email = %mask_email(email), error = %e, "Sign-in failed");
                Err(e)
            }
        }
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.backend.sign_out().await.map_err(|e| {
            tracing::error!(error = %e, "Sign-out failed");
            match e {
                AuthError::Session(msg) => AuthError::Session(msg),
                other => AuthError::Session(other.to_string()),
            }
        })?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Stop listening to the backend.
    pub fn shutdown(self) {}
}

impl Drop for SessionProvider {
    fn drop(&mut self) {
        // Aborting drops the task's backend subscription.
        self.task.abort();
        tracing::debug!("Session provider stopped");
    }
}
