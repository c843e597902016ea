//! Publishing seed drafts through the regular write path.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use hub_core::domain::{PostDraft, mask_email};
use hub_core::ports::PostStore;
use hub_core::services::{PostWriter, SessionProvider};
use hub_infra::InMemoryAuthBackend;

use crate::config::ExportConfig;

/// Read a JSON array of drafts (`title`, `body`, optional `video_url`, `tags`).
pub async fn load_drafts(path: &Path) -> anyhow::Result<Vec<PostDraft>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let drafts: Vec<PostDraft> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid seed file {}", path.display()))?;

    tracing::info!(path = %path.display(), count = drafts.len(), "Seed drafts loaded");
    Ok(drafts)
}

/// Sign in as the configured author and create every draft.
///
/// Drafts that fail validation are skipped; a store failure aborts.
/// Returns the number of posts created.
pub async fn publish(
    store: Arc<dyn PostStore>,
    auth: Arc<InMemoryAuthBackend>,
    config: &ExportConfig,
    drafts: &[PostDraft],
) -> anyhow::Result<usize> {
    if drafts.is_empty() {
        return Ok(0);
    }

    auth.register(&config.author_email, &config.author_password)
        .await
        .context("Failed to register seed author")?;

    let sessions = SessionProvider::start(auth);
    sessions.ready().await;
    let session = sessions
        .login(&config.author_email, &config.author_password)
        .await
        .context("Seed author sign-in failed")?;
    let author = session
        .identity()
        .cloned()
        .context("Sign-in returned no identity")?;

    let writer = PostWriter::new(store);
    let mut published = 0;
    for (index, draft) in drafts.iter().enumerate() {
        match writer.create(draft, &author).await {
            Ok(_) => published += 1,
            Err(e) if e.is_validation() => {
                tracing::warn!(index, error = %e, "Seed draft skipped");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to publish seed draft #{index}"));
            }
        }
    }

    if let Err(e) = sessions.logout().await {
        tracing::warn!(error = %e, "Seed author sign-out failed");
    }

    tracing::info!(
        author = %mask_email(&author.email),
        published,
        skipped = drafts.len() - published,
        "Seed drafts published"
    );
    Ok(published)
}

#[cfg(test)]
mod tests {
    use hub_infra::{Argon2PasswordService, InMemoryPostStore};

    use super::*;

    fn config() -> ExportConfig {
        ExportConfig {
            out_dir: "dist".into(),
            seed_file: None,
            author_email: "editor@example.com".to_string(),
            author_password: "secret".to_string(),
            site_title: "Knowledge Hub".to_string(),
        }
    }

    fn auth() -> Arc<InMemoryAuthBackend> {
        Arc::new(InMemoryAuthBackend::new(
            Argon2PasswordService::light().unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_publish_skips_invalid_drafts() {
        let store = Arc::new(InMemoryPostStore::default());
        let drafts = vec![
            PostDraft::new("Hello", "World").with_tags("a, b"),
            PostDraft::new("   ", "No title"),
            PostDraft::new("Second", "Post"),
        ];

        let published = publish(store.clone(), auth(), &config(), &drafts)
            .await
            .unwrap();

        assert_eq!(published, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_publish_nothing_without_drafts() {
        let store = Arc::new(InMemoryPostStore::default());
        let auth = auth();

        let published = publish(store.clone(), auth.clone(), &config(), &[])
            .await
            .unwrap();

        assert_eq!(published, 0);
        assert_eq!(auth.watcher_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_aborts() {
        let store = Arc::new(InMemoryPostStore::default());
        store.set_offline(true).await;

        let result = publish(store, auth(), &config(), &[PostDraft::new("Hello", "World")]).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_drafts_from_json() {
        let path = std::env::temp_dir().join(format!("hub-seed-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(
            &path,
            r#"[{"title": "Hello", "body": "World", "tags": "a, b"}, {"title": "Solo", "body": "Post"}]"#,
        )
        .await
        .unwrap();

        let drafts = load_drafts(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].tags, "a, b");
        assert_eq!(drafts[1].video_url, "");
    }

    #[tokio::test]
    async fn test_load_drafts_missing_file() {
        let path = std::env::temp_dir().join(format!("hub-missing-{}.json", uuid::Uuid::new_v4()));
        assert!(load_drafts(&path).await.is_err());
    }
}
