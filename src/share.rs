//! Sharing side-channel: compose a share message and hand the article's
//! canonical link to the platform.
//!
//! Nothing here reads or writes bookmark state; a failure is surfaced to
//! the status bar and never propagated further.

use thiserror::Error;

use crate::content::ArticleRecord;

#[derive(Debug, Error)]
pub enum ShareError {
    /// The record carries no canonical link to share
    #[error("Article has no link to share")]
    NoLink,
    /// The platform handler could not be launched
    #[error("Failed to open link: {0}")]
    Launch(#[from] std::io::Error),
}

/// The message composed for sharing: title plus canonical link.
pub fn share_message(article: &ArticleRecord) -> String {
    format!("{}\nRead more: {}", article.title, article.link)
}

/// Open the article's canonical link with the platform handler (browser).
pub fn open_link(article: &ArticleRecord) -> Result<(), ShareError> {
    if article.link.is_empty() {
        return Err(ShareError::NoLink);
    }
    open::that(&article.link)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(link: &str) -> ArticleRecord {
        ArticleRecord {
            id: 1,
            title: "Budget review announced".into(),
            content: String::new(),
            excerpt: String::new(),
            image_url: None,
            published_at: None,
            link: link.into(),
            source_name: "Sun News".into(),
        }
    }

    #[test]
    fn test_share_message_composition() {
        let msg = share_message(&article("https://example.com/p/1"));
        assert_eq!(
            msg,
            "Budget review announced\nRead more: https://example.com/p/1"
        );
    }

    #[test]
    fn test_open_link_without_link_errors() {
        let result = open_link(&article(""));
        assert!(matches!(result.unwrap_err(), ShareError::NoLink));
    }
}
