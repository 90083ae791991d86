use chrono::{NaiveDateTime, Utc};
use futures::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::types::{ArticleRecord, Language};
use crate::util::clean_rendered;

const MAX_RETRIES: u32 = 3;
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while fetching articles.
///
/// Network failure is always distinguishable from an empty result: an empty
/// category yields `Ok(vec![])`, never an error.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A configured base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Server returned 429 Too Many Requests after max retries
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response body was not the expected JSON shape
    #[error("Decode error: {0}")]
    Decode(String),
}

// ============================================================================
// Wire Types
// ============================================================================

/// The subset of a WordPress post object the app consumes.
///
/// Everything is optional except `id`; a post without an id is dropped by
/// the caller before this type is ever constructed.
#[derive(Debug, Deserialize)]
struct WpPost {
    id: i64,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    title: Rendered,
    #[serde(default)]
    content: Rendered,
    #[serde(default)]
    excerpt: Rendered,
    #[serde(rename = "_embedded", default)]
    embedded: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

impl WpPost {
    /// Featured image URL from `_embedded["wp:featuredmedia"][0].source_url`.
    ///
    /// A missing entry or a non-string `source_url` both yield `None`; the
    /// display layer substitutes the local placeholder.
    fn featured_image(&self) -> Option<String> {
        self.embedded
            .as_ref()?
            .get("wp:featuredmedia")?
            .get(0)?
            .get("source_url")?
            .as_str()
            .filter(|url| !url.is_empty())
            .map(String::from)
    }

    fn into_record(self, source_name: &str) -> ArticleRecord {
        let image_url = self.featured_image();
        let title = clean_rendered(&self.title.rendered);
        ArticleRecord {
            id: self.id,
            title: if title.is_empty() {
                "No Title".to_string()
            } else {
                title
            },
            content: clean_rendered(&self.content.rendered),
            excerpt: clean_rendered(&self.excerpt.rendered),
            image_url,
            published_at: self.date.as_deref().and_then(parse_wp_date),
            link: self.link.unwrap_or_default(),
            source_name: source_name.to_string(),
        }
    }
}

/// Parse a WordPress `date` field ("2025-03-01T10:20:30", site-local with no
/// offset). Treated as UTC; a malformed date becomes `None` rather than an
/// error.
fn parse_wp_date(s: &str) -> Option<chrono::DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for a pair of WordPress sites (English and Urdu roots).
#[derive(Clone)]
pub struct WpClient {
    client: reqwest::Client,
    english_base: Url,
    urdu_base: Url,
    source_name: String,
}

impl WpClient {
    pub fn new(
        english_base: &str,
        urdu_base: &str,
        source_name: &str,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            client: reqwest::Client::new(),
            english_base: Url::parse(english_base)?,
            urdu_base: Url::parse(urdu_base)?,
            source_name: source_name.to_string(),
        })
    }

    fn base(&self, language: Language) -> &Url {
        match language {
            Language::English => &self.english_base,
            Language::Urdu => &self.urdu_base,
        }
    }

    /// Fetch one finite, non-paginated batch of posts for a category.
    ///
    /// Posts that fail per-item extraction (most commonly a missing id) are
    /// skipped with a warning rather than failing the whole batch.
    pub async fn fetch_by_category(
        &self,
        category_id: u32,
        language: Language,
    ) -> Result<Vec<ArticleRecord>, FetchError> {
        let url = format!(
            "{}/wp-json/wp/v2/posts?categories={}&_embed",
            self.base(language).as_str().trim_end_matches('/'),
            category_id
        );
        let bytes = self.get_with_retry(&url).await?;

        let values: Vec<serde_json::Value> =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;

        let mut records = Vec::with_capacity(values.len());
        let mut skipped = 0usize;
        for value in values {
            match serde_json::from_value::<WpPost>(value) {
                Ok(post) => records.push(post.into_record(&self.source_name)),
                Err(e) => {
                    skipped += 1;
                    tracing::debug!(error = %e, "Skipping malformed post object");
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(
                category = category_id,
                skipped = skipped,
                "Malformed posts skipped"
            );
        }

        Ok(records)
    }

    /// Fetch a single post by id. The TUI always opens the reader from an
    /// already-fetched list, so this currently has no caller there; it is
    /// the entry point for resolving a bare post id (a shared link, a
    /// future `--post <id>` flag) into a full record.
    pub async fn fetch_single(
        &self,
        id: i64,
        language: Language,
    ) -> Result<ArticleRecord, FetchError> {
        let url = format!(
            "{}/wp-json/wp/v2/posts/{}?_embed",
            self.base(language).as_str().trim_end_matches('/'),
            id
        );
        let bytes = self.get_with_retry(&url).await?;

        let post: WpPost =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(post.into_record(&self.source_name))
    }

    /// GET with a 30s timeout, exponential backoff on 429/5xx, and a 10MB
    /// response size cap.
    async fn get_with_retry(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut retry_count = 0;

        loop {
            let response = tokio::time::timeout(REQUEST_TIMEOUT, self.client.get(url).send())
                .await
                .map_err(|_| FetchError::Timeout)?
                .map_err(FetchError::Network)?;

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if retry_count >= MAX_RETRIES {
                    return Err(FetchError::RateLimited(MAX_RETRIES));
                }

                let delay_secs = 2u64.pow(retry_count); // 2s, 4s, 8s
                tracing::warn!(
                    url = %url,
                    retry = retry_count,
                    delay_secs = delay_secs,
                    "Rate limited, backing off"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                retry_count += 1;
                continue;
            }

            if response.status().is_server_error() {
                if retry_count >= MAX_RETRIES {
                    return Err(FetchError::HttpStatus(response.status().as_u16()));
                }

                let delay_secs = 2u64.pow(retry_count);
                tracing::warn!(
                    url = %url,
                    status = %response.status(),
                    retry = retry_count,
                    delay_secs = delay_secs,
                    "Server error, retrying after delay"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                retry_count += 1;
                continue;
            }

            // 4xx errors fail immediately
            if !response.status().is_success() {
                return Err(FetchError::HttpStatus(response.status().as_u16()));
            }

            return read_limited_bytes(response, MAX_RESPONSE_SIZE).await;
        }
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
