use serde::{Deserialize, Serialize};

use crate::content::ArticleRecord;

/// Current on-disk format version. Bump when the persisted shape changes;
/// `from_json` keeps accepting older shapes.
const FORMAT_VERSION: u32 = 1;

/// Versioned persistence envelope around the entry list.
#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    entries: Vec<ArticleRecord>,
}

/// The de-duplicated, insertion-ordered collection of saved articles.
///
/// Identity is the post `id` alone: an entry is the same bookmark as any
/// other record with the same id, regardless of text differences between
/// fetches. Membership operations are linear scans; bookmark lists are
/// user-curated and small, so no index structure is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkSet {
    entries: Vec<ArticleRecord>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn as_slice(&self) -> &[ArticleRecord] {
        &self.entries
    }

    /// Add if absent, remove if present. Returns `true` when the article is
    /// bookmarked after the call.
    pub fn toggle(&mut self, article: ArticleRecord) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e.id == article.id) {
            self.entries.remove(pos);
            false
        } else {
            self.entries.push(article);
            true
        }
    }

    /// Explicit removal. Returns `true` if an entry was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serialize the whole set for persistence. Always the full set; there
    /// is no incremental persistence.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&Envelope {
            version: FORMAT_VERSION,
            entries: self.entries.clone(),
        })
    }

    /// Deserialize a persisted set.
    ///
    /// Accepts the current versioned envelope and, for migration, a bare
    /// JSON array of records (the shape written before versioning).
    /// Duplicate ids in stored data are dropped, keeping the first
    /// occurrence, so the no-duplicates invariant holds from load onward.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries = match serde_json::from_str::<Envelope>(json) {
            Ok(envelope) => envelope.entries,
            Err(_) => serde_json::from_str::<Vec<ArticleRecord>>(json)?,
        };

        let mut set = Self::new();
        for entry in entries {
            if !set.contains(entry.id) {
                set.entries.push(entry);
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ArticleRecord;

    fn article(id: i64) -> ArticleRecord {
        ArticleRecord {
            id,
            title: format!("Article {}", id),
            content: String::new(),
            excerpt: String::new(),
            image_url: None,
            published_at: None,
            link: format!("https://example.com/{}", id),
            source_name: "Sun News".into(),
        }
    }

    #[test]
    fn test_toggle_sequence() {
        let mut set = BookmarkSet::new();
        assert!(set.toggle(article(101)));
        assert_eq!(set.len(), 1);

        assert!(set.toggle(article(102)));
        assert!(set.contains(101));
        assert!(set.contains(102));

        assert!(!set.toggle(article(101)));
        assert_eq!(set.len(), 1);
        assert!(!set.contains(101));
        assert!(set.contains(102));
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut set = BookmarkSet::new();
        set.toggle(article(1));
        let before = set.clone();

        set.toggle(article(7));
        set.toggle(article(7));
        assert_eq!(set, before);
    }

    #[test]
    fn test_identity_is_id_alone() {
        let mut set = BookmarkSet::new();
        set.toggle(article(5));

        // Same id fetched later with updated text removes the entry
        let mut updated = article(5);
        updated.title = "Updated headline".into();
        assert!(!set.toggle(updated));
        assert!(set.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut set = BookmarkSet::new();
        for id in [30, 10, 20] {
            set.toggle(article(id));
        }
        let ids: Vec<i64> = set.as_slice().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_remove() {
        let mut set = BookmarkSet::new();
        set.toggle(article(1));
        set.toggle(article(2));

        assert!(set.remove(1));
        assert!(!set.remove(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let mut set = BookmarkSet::new();
        set.toggle(article(101));
        set.toggle(article(102));

        let json = set.to_json().unwrap();
        let loaded = BookmarkSet::from_json(&json).unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn test_legacy_bare_array_loads() {
        let json = r#"[{"id": 9, "title": "Legacy entry"}]"#;
        let set = BookmarkSet::from_json(json).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(9));
    }

    #[test]
    fn test_duplicate_ids_in_stored_data_are_dropped() {
        let json = r#"[
            {"id": 4, "title": "first"},
            {"id": 4, "title": "second"},
            {"id": 5, "title": "other"}
        ]"#;
        let set = BookmarkSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].title, "first");
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(BookmarkSet::from_json("{not json").is_err());
        assert!(BookmarkSet::from_json("\"a string\"").is_err());
    }
}
