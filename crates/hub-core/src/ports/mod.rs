//! Ports - trait definitions for the external backend.
//! These are the "interfaces" a document store and an auth provider must implement.

mod auth;
mod store;
mod subscription;

pub use auth::{AuthBackend, AuthError};
pub use store::{PostSnapshot, PostStore, StoreError};
pub use subscription::{Listeners, Subscription, lock};
