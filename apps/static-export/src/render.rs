//! HTML rendering of the list and detail views.
//!
//! Templates are compiled into the binary. `.html` templates are
//! auto-escaped, so post fields can be passed through unmodified.

use minijinja::{Environment, UndefinedBehavior, context};
use serde::Serialize;

use hub_shared::{ListState, PostCard, PostPage};

use crate::sections::{SECTIONS, TopicPage};

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("post.html", include_str!("../templates/post.html")),
    ("topic.html", include_str!("../templates/topic.html")),
];

/// Template view of a [`ListState`].
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ListContext<'a> {
    Loading,
    Empty,
    Loaded { cards: &'a [PostCard] },
    Failed { message: &'a str },
}

impl<'a> From<&'a ListState> for ListContext<'a> {
    fn from(state: &'a ListState) -> Self {
        match state {
            ListState::Loading => ListContext::Loading,
            ListState::Empty => ListContext::Empty,
            ListState::Loaded(cards) => ListContext::Loaded { cards },
            ListState::Failed(message) => ListContext::Failed { message },
        }
    }
}

pub struct SiteRenderer {
    env: Environment<'static>,
    site_title: String,
}

impl SiteRenderer {
    pub fn new(site_title: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self {
            env,
            site_title: site_title.into(),
        })
    }

    /// The start page: topic sections, then every post card, newest first.
    pub fn render_index(&self, list: &ListState) -> Result<String, minijinja::Error> {
        self.env.get_template("index.html")?.render(context! {
            site_title => &self.site_title,
            sections => &SECTIONS,
            list => ListContext::from(list),
        })
    }

    pub fn render_topic(&self, page: &TopicPage) -> Result<String, minijinja::Error> {
        self.env.get_template("topic.html")?.render(context! {
            site_title => &self.site_title,
            page => page,
        })
    }

    pub fn render_post(&self, page: &PostPage) -> Result<String, minijinja::Error> {
        self.env.get_template("post.html")?.render(context! {
            site_title => &self.site_title,
            page => page,
            paragraphs => paragraphs(&page.body),
        })
    }
}

/// Split a body into paragraphs at blank lines.
fn paragraphs(body: &str) -> Vec<String> {
    body.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use hub_core::domain::{NewPost, PostId, Timestamp};

    use super::*;

    fn post(title: &str, body: &str) -> hub_core::domain::Post {
        NewPost {
            title: title.to_string(),
            body: body.to_string(),
            video_url: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
            tags: vec!["Leadership".to_string(), "Communication".to_string()],
            author_id: None,
            author_email: Some("ann@example.com".to_string()),
        }
        .into_post(PostId::new("p1"), Timestamp::new(1_709_640_000, 0))
    }

    fn renderer() -> SiteRenderer {
        SiteRenderer::new("Knowledge Hub").unwrap()
    }

    #[test]
    fn test_index_lists_cards() {
        let card = PostCard::from(&post("Hello", "World"));
        let html = renderer()
            .render_index(&ListState::Loaded(vec![card]))
            .unwrap();

        assert!(html.contains("<h3>Hello</h3>"));
        assert!(html.contains("5.3.2024 von ann@example.com"));
        assert!(html.contains("#Leadership"));
        assert!(html.contains("#Communication"));
        assert!(html.contains("dQw4w9WgXcQ"));
        assert!(html.contains("Weiterlesen"));
    }

    #[test]
    fn test_index_links_sections() {
        let html = renderer().render_index(&ListState::Empty).unwrap();

        assert!(html.contains("<h3>Leadership</h3>"));
        assert!(html.contains("<h3>Agile Work</h3>"));
        assert!(html.contains("fuehrung"));
    }

    #[test]
    fn test_topic_page() {
        let page = TopicPage {
            heading: "Führung",
            lead: "Inhalte zur Führung folgen hier.",
        };
        let html = renderer().render_topic(&page).unwrap();

        assert!(html.contains("<h1>Führung</h1>"));
        assert!(html.contains("Inhalte zur Führung folgen hier."));
        assert!(html.contains("<title>Führung | Knowledge Hub</title>"));
    }

    #[test]
    fn test_index_empty_and_failed_states() {
        let renderer = renderer();

        let empty = renderer.render_index(&ListState::Empty).unwrap();
        assert!(empty.contains("Noch keine Blogposts vorhanden."));

        let failed = renderer
            .render_index(&ListState::Failed("store offline".to_string()))
            .unwrap();
        assert!(failed.contains("Fehler: store offline"));
    }

    #[test]
    fn test_post_fields_are_escaped() {
        let page = PostPage::from(&post("<script>alert(1)</script>", "Tom & Jerry"));
        let html = renderer().render_post(&page).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
    }

    #[test]
    fn test_post_body_paragraphs() {
        let page = PostPage::from(&post("Hello", "First line.\r\n\r\nSecond line.\n\n\n"));
        let html = renderer().render_post(&page).unwrap();

        assert!(html.contains("<p>First line.</p>"));
        assert!(html.contains("<p>Second line.</p>"));
        assert!(html.contains("<title>Hello | Knowledge Hub</title>"));
    }

    #[test]
    fn test_paragraphs_skip_blank_runs() {
        assert_eq!(paragraphs("a\n\n\n\nb"), vec!["a", "b"]);
        assert!(paragraphs("   ").is_empty());
    }
}
