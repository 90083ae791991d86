use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Local placeholder shown when an article has no usable featured image.
///
/// Rendering must always resolve to a defined image reference, never an
/// empty one.
pub const PLACEHOLDER_IMAGE: &str = "assets/notfound.png";

/// Feed language. Selects the site root and the per-category post ids,
/// and flips the layout direction in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Urdu,
}

impl Language {
    /// Short code used in config, CLI args, and session persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Urdu => "ur",
        }
    }

    /// Parse a short code. Unknown codes yield `None` rather than a default
    /// so callers decide their own fallback.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::English),
            "ur" => Some(Language::Urdu),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Urdu,
            Language::Urdu => Language::English,
        }
    }

    /// Urdu is rendered right-to-left; the UI mirrors its layout.
    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Urdu)
    }
}

/// A normalized news article: the unit of content and the unit of
/// bookmarking.
///
/// `id` is the sole identity key: two records with the same id are the
/// same bookmark even if they were fetched at different times with updated
/// text. Text fields are already entity-decoded and tag-stripped; the wire
/// shape never leaks past the content adapter.
///
/// All fields except `id` and `title` carry `#[serde(default)]` so that
/// persisted sets written by older versions still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub source_name: String,
}

impl ArticleRecord {
    /// The image reference to render: the remote URL when present, the
    /// local placeholder otherwise.
    pub fn display_image(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}
