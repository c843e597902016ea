use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::post::NewPost;
use super::session::Identity;

/// What the author typed into the post form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub video_url: String,
    /// Comma separated, exactly as entered.
    #[serde(default)]
    pub tags: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = url.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Check the draft and build the record to submit, attributed to `author`.
    pub fn validate(&self, author: &Identity) -> Result<NewPost, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let body = self.body.trim();
        if body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }

        let video_url = Some(self.video_url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(NewPost {
            title: title.to_string(),
            body: body.to_string(),
            video_url,
            tags: parse_tags(&self.tags),
            author_id: Some(author.uid.clone()),
            author_email: Some(author.email.clone()),
        })
    }

    pub fn is_blank(&self) -> bool {
        self.title.is_empty()
            && self.body.is_empty()
            && self.video_url.is_empty()
            && self.tags.is_empty()
    }
}

/// Split a raw tag string on commas, trim each piece and drop empty ones.
///
/// Order is preserved and duplicates are kept as entered.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
