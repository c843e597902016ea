//! # Hub Infrastructure
//!
//! Concrete implementations of the ports defined in `hub-core`.
//! Both backends live in-process: they stand in for a managed document
//! store and auth provider during development, tests and static builds.
//!
//! ## Feature Flags
//!
//! - `auth` (default) - In-memory credential backend with Argon2 password hashes
//! - `minimal` - Post store only

pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

pub use store::{InMemoryPostStore, InMemoryPostStoreConfig, WritePolicy};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, InMemoryAuthBackend};
