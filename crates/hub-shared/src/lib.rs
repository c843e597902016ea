//! # Hub Shared
//!
//! Presentation state shared by every front end of the knowledge hub.
//! Views here are plain state machines: they hold the latest snapshot,
//! turn errors into messages, and never panic on a backend failure.
//! Rendering them to markup is left to the front end.

pub mod format;
pub mod view;

pub use view::{
    Composer, ComposerMode, DetailState, DetailView, ListState, ListView, Notice, PostCard,
    PostPage,
};
