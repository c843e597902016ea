use hub_core::PostError;
use hub_core::domain::{Post, PostId};
use hub_core::services::PostReader;

use super::PostPage;

/// Loading, not-found and loaded are normal outcomes and stay distinct
/// from each other and from a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    NotFound,
    Loaded(PostPage),
    Failed(String),
}

/// A single post, resolved by id.
#[derive(Debug)]
pub struct DetailView {
    id: PostId,
    state: DetailState,
}

impl DetailView {
    pub fn new(id: PostId) -> Self {
        Self {
            id,
            state: DetailState::Loading,
        }
    }

    /// Resolve `id` through `reader` and return the settled view.
    pub async fn resolve(reader: &PostReader, id: PostId) -> Self {
        let mut view = Self::new(id);
        view.load(reader).await;
        view
    }

    pub fn id(&self) -> &PostId {
        &self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// (Re)fetch the post. The view shows `Loading` until the fetch settles.
    pub async fn load(&mut self, reader: &PostReader) {
        self.state = DetailState::Loading;
        let lookup = reader.get_by_id(&self.id).await;
        self.apply(lookup);
    }

    pub fn apply(&mut self, lookup: Result<Option<Post>, PostError>) {
        self.state = match lookup {
            Ok(Some(post)) => DetailState::Loaded(PostPage::from(&post)),
            Ok(None) => DetailState::NotFound,
            Err(e) => {
                tracing::warn!(post_id = %self.id, error = %e, "Post detail degraded");
                DetailState::Failed(e.to_string())
            }
        };
    }

    pub fn page(&self) -> Option<&PostPage> {
        match &self.state {
            DetailState::Loaded(page) => Some(page),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use hub_core::domain::{Identity, PostDraft};
    use hub_core::services::PostWriter;
    use hub_infra::InMemoryPostStore;

    #[tokio::test]
    async fn test_three_states() {
        let store = Arc::new(InMemoryPostStore::default());
        let reader = PostReader::new(store.clone());
        let writer = PostWriter::new(store.clone());
        let author = Identity::new("uid", "ann@example.com");
        let id = writer
            .create(&PostDraft::new("Hello", "World"), &author)
            .await
            .unwrap();

        let pending = DetailView::new(id.clone());
        assert_eq!(pending.state(), &DetailState::Loading);

        let found = DetailView::resolve(&reader, id).await;
        assert_eq!(found.page().map(|p| p.title.as_str()), Some("Hello"));

        let missing = DetailView::resolve(&reader, PostId::new("nope")).await;
        assert_eq!(missing.state(), &DetailState::NotFound);

        store.set_offline(true).await;
        let failed = DetailView::resolve(&reader, PostId::new("nope")).await;
        assert!(matches!(failed.state(), DetailState::Failed(_)));
    }
}
