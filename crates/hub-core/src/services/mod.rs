//! Services - the read, write and session logic every view talks to.

mod reader;
mod session;
mod writer;

#[cfg(test)]
mod testing;

pub use reader::{PostFeed, PostReader, sort_newest_first};
pub use session::SessionProvider;
pub use writer::PostWriter;
