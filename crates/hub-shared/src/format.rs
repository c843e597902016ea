//! Display helpers for posts.

use std::sync::LazyLock;

use hub_core::domain::Timestamp;
use regex::Regex;

/// Shown when a timestamp cannot be turned into a calendar date.
pub const UNKNOWN_DATE: &str = "Date unknown";

/// Card excerpts are cut to roughly three lines of text.
pub const EXCERPT_CHARS: usize = 180;

static YOUTUBE_URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?(?:youtube\.com|youtu\.be)/(?:watch\?v=|embed/|v/|)([A-Za-z0-9_-]{11})",
    )
    .inspect_err(|e| tracing::error!(error = %e, "YouTube link pattern failed to compile"))
    .ok()
});

/// Short German date, e.g. `5.3.2024`.
///
/// The calendar day is taken in UTC, so a post created shortly after
/// midnight in Berlin shows the previous day.
pub fn date_label(at: Timestamp) -> String {
    at.to_datetime()
        .map(|dt| dt.format("%-d.%-m.%Y").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// The 11-character video id of a YouTube watch, share, or embed link.
///
/// The link may sit anywhere in the text, so mobile (`m.youtube.com`) and
/// other subdomains are recognised too.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    YOUTUBE_URL
        .as_ref()?
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Embeddable player URL for a YouTube link; `None` for anything else.
pub fn youtube_embed_url(url: &str) -> Option<String> {
    youtube_video_id(url).map(|id| format!("https://www.youtube.com/embed/{id}"))
}

/// Cut `body` to at most `max_chars` characters, at a word boundary when
/// possible, and mark the cut with an ellipsis.
pub fn excerpt(body: &str, max_chars: usize) -> String {
    let body = body.trim();
    if body.chars().count() <= max_chars {
        return body.to_string();
    }

    let cut = body
        .char_indices()
        .nth(max_chars)
        .map_or(body.len(), |(idx, _)| idx);
    let head = &body[..cut];
    let head = match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => &head[..space],
        _ => head,
    };
    format!("{}…", head.trim_end())
}
