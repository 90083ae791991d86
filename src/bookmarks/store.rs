use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use super::set::BookmarkSet;
use crate::content::ArticleRecord;
use crate::storage::Storage;

/// The single well-known storage slot for the saved-article set.
///
/// Nothing else may write this key: every consumer goes through
/// [`BookmarkStore`], so there is exactly one key for exactly one logical
/// set.
pub const STORAGE_KEY: &str = "bookmarkedPosts";

/// Process-wide shared handle to the saved-article set.
///
/// Cheap to clone; all clones share state. Mutations are serialized through
/// one async mutex held across the read-modify-write and the persist, so
/// two views toggling near-simultaneously cannot clobber each other's
/// update. Every mutation publishes a fresh snapshot on a watch channel so
/// all subscribed views update immediately, with no reload-on-focus
/// staleness window.
///
/// Persistence is best-effort: the in-memory set is updated first
/// (optimistic), the whole set is then rewritten to storage, and a write
/// failure is logged without rolling back. Bookmarks are a convenience
/// feature, not integrity-critical, so the user's toggle always "succeeds"
/// locally.
#[derive(Clone)]
pub struct BookmarkStore {
    storage: Storage,
    set: Arc<Mutex<BookmarkSet>>,
    tx: Arc<watch::Sender<Arc<[ArticleRecord]>>>,
}

impl BookmarkStore {
    /// Load the persisted set and build the store.
    ///
    /// An absent key or an unparsable value yields an empty set, never an
    /// error to the caller. Corrupt data is logged and treated as empty;
    /// the next mutation overwrites it with a valid set.
    pub async fn open(storage: Storage) -> Self {
        let set = match storage.get(STORAGE_KEY).await {
            Ok(Some(json)) => match BookmarkSet::from_json(&json) {
                Ok(set) => set,
                Err(e) => {
                    tracing::warn!(error = %e, "Corrupt bookmark data, starting with empty set");
                    BookmarkSet::new()
                }
            },
            Ok(None) => BookmarkSet::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read bookmarks, starting with empty set");
                BookmarkSet::new()
            }
        };

        let (tx, _rx) = watch::channel(snapshot_of(&set));
        Self {
            storage,
            set: Arc::new(Mutex::new(set)),
            tx: Arc::new(tx),
        }
    }

    /// Membership test against the current in-memory set.
    pub async fn is_bookmarked(&self, id: i64) -> bool {
        self.set.lock().await.contains(id)
    }

    /// Current entries, in insertion order.
    pub async fn snapshot(&self) -> Arc<[ArticleRecord]> {
        snapshot_of(&*self.set.lock().await)
    }

    /// Subscribe to membership changes. The receiver holds the latest
    /// snapshot and is notified on every mutation from any handle.
    pub fn subscribe(&self) -> watch::Receiver<Arc<[ArticleRecord]>> {
        self.tx.subscribe()
    }

    /// Add if absent, remove if present. Returns `true` when the article is
    /// bookmarked after the call. Persists the whole set before returning.
    pub async fn toggle(&self, article: ArticleRecord) -> bool {
        let mut set = self.set.lock().await;
        let added = set.toggle(article);
        self.publish_and_persist(&set).await;
        added
    }

    /// Explicit removal by id (the saved-articles view unsaves without
    /// re-fetching). Returns `true` if an entry was removed.
    pub async fn remove(&self, id: i64) -> bool {
        let mut set = self.set.lock().await;
        let removed = set.remove(id);
        if removed {
            self.publish_and_persist(&set).await;
        }
        removed
    }

    /// Drop every saved article.
    pub async fn clear(&self) {
        let mut set = self.set.lock().await;
        if !set.is_empty() {
            set.clear();
            self.publish_and_persist(&set).await;
        }
    }

    /// Notify subscribers, then rewrite the full set to storage.
    ///
    /// Called with the set lock held: the publish order matches the
    /// mutation order, and no second writer can interleave between the
    /// in-memory update and the storage write.
    async fn publish_and_persist(&self, set: &BookmarkSet) {
        self.tx.send_replace(snapshot_of(set));

        let json = match set.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize bookmarks");
                return;
            }
        };
        if let Err(e) = self.storage.set(STORAGE_KEY, &json).await {
            // In-memory state is kept; durability is best-effort.
            tracing::error!(error = %e, "Failed to persist bookmarks");
        }
    }
}

fn snapshot_of(set: &BookmarkSet) -> Arc<[ArticleRecord]> {
    set.as_slice().into()
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

    async fn test_store() -> (Storage, BookmarkStore) {
        let storage = Storage::open(":memory:").await.unwrap();
        let store = BookmarkStore::open(storage.clone()).await;
        (storage, store)
    }

    #[tokio::test]
    async fn test_starts_empty_on_first_run() {
        let (_storage, store) = test_store().await;
        assert!(store.snapshot().await.is_empty());
        assert!(!store.is_bookmarked(1).await);
    }

    #[tokio::test]
    async fn test_toggle_persists_under_single_key() {
        let (storage, store) = test_store().await;
        assert!(store.toggle(article(101)).await);

        let raw = storage.get(STORAGE_KEY).await.unwrap().unwrap();
        assert!(raw.contains("\"id\":101"));
    }

    #[tokio::test]
    async fn test_membership_visible_to_fresh_load() {
        let (storage, store) = test_store().await;
        store.toggle(article(101)).await;

        // Another consumer loading from the same storage sees the change
        let other = BookmarkStore::open(storage).await;
        assert!(other.is_bookmarked(101).await);
    }

    #[tokio::test]
    async fn test_corrupt_value_treated_as_empty() {
        let storage = Storage::open(":memory:").await.unwrap();
        storage.set(STORAGE_KEY, "{definitely not json").await.unwrap();

        let store = BookmarkStore::open(storage).await;
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_notified_on_mutation() {
        let (_storage, store) = test_store().await;
        let mut rx = store.subscribe();

        store.toggle(article(5)).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        // A second handle's mutation also reaches this subscriber
        let clone = store.clone();
        clone.remove(5).await;
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_id_does_not_notify() {
        let (_storage, store) = test_store().await;
        let rx = store.subscribe();

        assert!(!store.remove(42).await);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_toggles_lose_no_updates() {
        let (_storage, store) = test_store().await;

        let mut handles = Vec::new();
        for id in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(
                async move { store.toggle(article(id)).await },
            ));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(store.snapshot().await.len(), 20);
    }

    #[tokio::test]
    async fn test_clear() {
        let (storage, store) = test_store().await;
        store.toggle(article(1)).await;
        store.toggle(article(2)).await;
        store.clear().await;

        assert!(store.snapshot().await.is_empty());
        let reloaded = BookmarkStore::open(storage).await;
        assert!(reloaded.snapshot().await.is_empty());
    }
}
