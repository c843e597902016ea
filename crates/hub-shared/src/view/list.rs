use hub_core::PostError;
use hub_core::domain::Post;
use hub_core::services::PostFeed;

use super::PostCard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    /// No snapshot yet.
    Loading,
    /// The collection is empty. Not an error.
    Empty,
    Loaded(Vec<PostCard>),
    Failed(String),
}

/// Live list of post cards, newest first.
#[derive(Debug)]
pub struct ListView {
    state: ListState,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Replace the view with the latest feed item.
    pub fn apply(&mut self, update: Result<Vec<Post>, PostError>) {
        self.state = match update {
            Ok(posts) if posts.is_empty() => ListState::Empty,
            Ok(posts) => ListState::Loaded(posts.iter().map(PostCard::from).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "Post list degraded");
                ListState::Failed(e.to_string())
            }
        };
    }

    /// Wait for the next item of `feed` and apply it.
    ///
    /// Returns `false` once the feed has ended.
    pub async fn sync(&mut self, feed: &mut PostFeed) -> bool {
        match feed.next().await {
            Some(update) => {
                self.apply(update);
                true
            }
            None => false,
        }
    }

    pub fn cards(&self) -> &[PostCard] {
        match &self.state {
            ListState::Loaded(cards) => cards,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::domain::{NewPost, PostId, Timestamp};
    use hub_core::ports::StoreError;

    fn post(id: &str) -> Post {
        NewPost {
            title: format!("Title {id}"),
            body: "Body".to_string(),
            video_url: Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()),
            tags: vec!["x".to_string()],
            author_id: None,
            author_email: Some("ann@example.com".to_string()),
        }
        .into_post(PostId::new(id), Timestamp::new(1_709_640_000, 0))
    }

    #[test]
    fn test_starts_loading() {
        assert_eq!(ListView::new().state(), &ListState::Loading);
    }

    #[test]
    fn test_empty_collection_is_not_an_error() {
        let mut view = ListView::new();
        view.apply(Ok(Vec::new()));
        assert_eq!(view.state(), &ListState::Empty);
    }

    #[test]
    fn test_loaded_cards() {
        let mut view = ListView::new();
        view.apply(Ok(vec![post("p1")]));

        let card = &view.cards()[0];
        assert_eq!(card.title, "Title p1");
        assert_eq!(card.date, "5.3.2024");
        assert_eq!(card.href, "/blog/p1");
        assert_eq!(
            card.embed_url.as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_failure_then_recovery() {
        let mut view = ListView::new();
        view.apply(Err(PostError::Fetch(StoreError::Unavailable(
            "offline".to_string(),
        ))));
        assert!(matches!(view.state(), ListState::Failed(msg) if msg.contains("offline")));

        view.apply(Ok(vec![post("p1")]));
        assert_eq!(view.cards().len(), 1);
    }
}
