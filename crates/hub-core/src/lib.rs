//! # Hub Core
//!
//! The domain layer of the knowledge hub blog.
//! This crate holds the post and session model, the ports a backend must
//! implement, and the read/write/session services built on top of them.
//! It knows nothing about any concrete backend.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{PostError, ValidationError};
