//! Domain entities - the core business objects.

mod draft;
mod post;
mod session;

pub use draft::{PostDraft, parse_tags};
pub use post::{NewPost, Post, PostId, Timestamp};
pub use session::{Identity, Session, mask_email};
