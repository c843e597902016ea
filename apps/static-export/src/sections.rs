//! Topic sections linked from the start page.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Section {
    pub name: &'static str,
    /// URL path segment, e.g. `fuehrung` for `/fuehrung`.
    pub slug: &'static str,
    pub description: &'static str,
    /// Set for sections that have their own page.
    pub page: Option<TopicPage>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopicPage {
    pub heading: &'static str,
    pub lead: &'static str,
}

pub const SECTIONS: [Section; 4] = [
    Section {
        name: "Communication",
        slug: "kommunikation",
        description: "Effective communication and conversation skills",
        page: None,
    },
    Section {
        name: "Leadership",
        slug: "fuehrung",
        description: "Leadership principles and team management",
        page: Some(TopicPage {
            heading: "Führung",
            lead: "Inhalte zur Führung folgen hier.",
        }),
    },
    Section {
        name: "Learning",
        slug: "lernen",
        description: "Continuous learning and knowledge development",
        page: Some(TopicPage {
            heading: "Lernen",
            lead: "Inhalte zum Lernen folgen hier.",
        }),
    },
    Section {
        name: "Agile Work",
        slug: "agiles-arbeiten",
        description: "Agile methods and practices",
        page: None,
    },
];

/// Sections that get a page of their own.
pub fn topic_pages() -> impl Iterator<Item = (&'static Section, &'static TopicPage)> {
    SECTIONS
        .iter()
        .filter_map(|section| section.page.as_ref().map(|page| (section, page)))
}
