//! Writes the site: `index.html`, `{topic}/index.html` per topic section
//! with a page, and `blog/{id}/index.html` per post.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, bail};

use hub_core::domain::PostId;
use hub_core::services::PostReader;
use hub_shared::{DetailState, DetailView, ListState, ListView};

use crate::render::SiteRenderer;
use crate::sections::topic_pages;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportSummary {
    /// Detail pages written.
    pub pages: usize,
    /// Topic pages written.
    pub topics: usize,
    /// Ids that vanished or could not be used as a path.
    pub skipped: usize,
}

pub struct SiteExporter {
    reader: PostReader,
    renderer: SiteRenderer,
    out_dir: PathBuf,
}

impl SiteExporter {
    pub fn new(reader: PostReader, renderer: SiteRenderer, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            renderer,
            out_dir: out_dir.into(),
        }
    }

    /// Render the current state of the store to disk.
    ///
    /// A backend failure aborts the export rather than publishing an
    /// error page.
    pub async fn run(&self) -> anyhow::Result<ExportSummary> {
        let list = self.snapshot_list().await;
        if let ListState::Failed(message) = list.state() {
            bail!("Post list unavailable: {message}");
        }
        let index = self.renderer.render_index(list.state())?;
        write_page(&self.out_dir.join("index.html"), &index).await?;

        let mut summary = ExportSummary::default();
        for (section, page) in topic_pages() {
            let html = self.renderer.render_topic(page)?;
            write_page(&self.out_dir.join(section.slug).join("index.html"), &html).await?;
            summary.topics += 1;
        }

        let ids = self
            .reader
            .list_ids()
            .await
            .context("Failed to enumerate posts")?;

        for id in ids {
            let Some(dir) = page_dir(&self.out_dir, &id) else {
                tracing::warn!(post_id = %id, "Post id is not a valid path segment");
                summary.skipped += 1;
                continue;
            };

            let view = DetailView::resolve(&self.reader, id).await;
            match view.state() {
                DetailState::Loaded(page) => {
                    let html = self.renderer.render_post(page)?;
                    write_page(&dir.join("index.html"), &html).await?;
                    summary.pages += 1;
                }
                DetailState::NotFound => {
                    tracing::warn!(post_id = %view.id(), "Post disappeared during export");
                    summary.skipped += 1;
                }
                DetailState::Failed(message) => {
                    bail!("Failed to load post {}: {message}", view.id());
                }
                DetailState::Loading => {
                    bail!("Post {} did not settle", view.id());
                }
            }
        }

        tracing::info!(
            out_dir = %self.out_dir.display(),
            pages = summary.pages,
            topics = summary.topics,
            skipped = summary.skipped,
            "Site exported"
        );
        Ok(summary)
    }

    /// First snapshot of the live feed. The feed is dropped afterwards.
    async fn snapshot_list(&self) -> ListView {
        let mut list = ListView::new();
        let mut feed = self.reader.observe_list().await;
        list.sync(&mut feed).await;
        list
    }
}

/// `out_dir/blog/{id}`, or `None` if the id would escape it.
fn page_dir(out_dir: &Path, id: &PostId) -> Option<PathBuf> {
    let mut components = Path::new(id.as_str()).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(segment)), None) => Some(out_dir.join("blog").join(segment)),
        _ => None,
    }
}

async fn write_page(path: &Path, html: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, html)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "Page written");
    Ok(())
}
