//! View state machines and the view models they render.

mod composer;
mod detail;
mod list;

pub use composer::{Composer, ComposerMode, Notice};
pub use detail::{DetailState, DetailView};
pub use list::{ListState, ListView};

use serde::Serialize;

use hub_core::domain::{Post, PostId};

use crate::format::{EXCERPT_CHARS, date_label, excerpt, youtube_embed_url};

/// Route of a post's detail page.
pub fn detail_href(id: &PostId) -> String {
    format!("/blog/{id}")
}

/// One entry of the post list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCard {
    pub id: PostId,
    pub title: String,
    pub date: String,
    pub author_email: Option<String>,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub embed_url: Option<String>,
    pub href: String,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            date: date_label(post.created_at),
            author_email: post.author_email.clone(),
            excerpt: excerpt(&post.body, EXCERPT_CHARS),
            tags: post.tags.clone(),
            embed_url: post.video_url.as_deref().and_then(youtube_embed_url),
            href: detail_href(&post.id),
        }
    }
}

/// A post's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPage {
    pub id: PostId,
    pub title: String,
    pub date: String,
    pub author_email: Option<String>,
    pub body: String,
    pub tags: Vec<String>,
    pub video_url: Option<String>,
    pub embed_url: Option<String>,
}

impl From<&Post> for PostPage {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            date: date_label(post.created_at),
            author_email: post.author_email.clone(),
            body: post.body.clone(),
            tags: post.tags.clone(),
            video_url: post.video_url.clone(),
            embed_url: post.video_url.as_deref().and_then(youtube_embed_url),
        }
    }
}
