//! Export configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Static export configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Directory the site is written to.
    pub out_dir: PathBuf,
    /// JSON list of drafts published before the export runs.
    pub seed_file: Option<PathBuf>,
    /// Account the seed drafts are published under.
    pub author_email: String,
    pub author_password: String,
    pub site_title: String,
}

impl ExportConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        Self {
            out_dir: non_empty("EXPORT_OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("dist")),
            seed_file: non_empty("EXPORT_SEED_FILE").map(PathBuf::from),
            author_email: non_empty("EXPORT_AUTHOR_EMAIL")
                .unwrap_or_else(|| "editor@knowledge-hub.local".to_string()),
            author_password: var("EXPORT_AUTHOR_PASSWORD").unwrap_or_default(),
            site_title: non_empty("EXPORT_SITE_TITLE")
                .unwrap_or_else(|| "Knowledge Hub".to_string()),
        }
    }
}
