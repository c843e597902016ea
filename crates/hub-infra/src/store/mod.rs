//! Document store implementations.

mod memory;

pub use memory::{InMemoryPostStore, InMemoryPostStoreConfig, WritePolicy};
