//! Integration tests for bookmark persistence: toggle, reload, and the
//! single-key storage contract.
//!
//! On-disk tests use a temp directory so reopening the storage exercises a
//! real round trip through SQLite; everything else uses in-memory databases
//! for isolation.

use pressmark::bookmarks::{BookmarkSet, BookmarkStore, STORAGE_KEY};
use pressmark::content::ArticleRecord;
use pressmark::storage::Storage;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn article(id: i64) -> ArticleRecord {
    ArticleRecord {
        id,
        title: format!("Article {}", id),
        content: format!("Body of article {}", id),
        excerpt: String::new(),
        image_url: None,
        published_at: None,
        link: format!("https://example.com/{}", id),
        source_name: "Sun News".to_string(),
    }
}

// ============================================================================
// Toggle Semantics
// ============================================================================

#[tokio::test]
async fn test_toggle_is_idempotent_pairwise() {
    let storage = Storage::open(":memory:").await.unwrap();
    let store = BookmarkStore::open(storage).await;

    assert!(store.toggle(article(101)).await);
    assert!(!store.toggle(article(101)).await);
    assert!(store.toggle(article(101)).await);

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, 101);
}

#[tokio::test]
async fn test_toggle_interleaved_ids() {
    let storage = Storage::open(":memory:").await.unwrap();
    let store = BookmarkStore::open(storage).await;

    store.toggle(article(101)).await; // save 101
    store.toggle(article(102)).await; // save 102
    store.toggle(article(101)).await; // unsave 101

    assert!(!store.is_bookmarked(101).await);
    assert!(store.is_bookmarked(102).await);
    assert_eq!(store.snapshot().await.len(), 1);
}

#[tokio::test]
async fn test_same_id_across_categories_is_one_bookmark() {
    let storage = Storage::open(":memory:").await.unwrap();
    let store = BookmarkStore::open(storage).await;

    // The same post fetched through two categories may carry different
    // text; identity is the id alone.
    let mut from_latest = article(500);
    from_latest.title = "Headline as fetched in Latest".to_string();
    let mut from_business = article(500);
    from_business.title = "Headline as fetched in Business".to_string();

    assert!(store.toggle(from_latest).await);
    assert!(!store.toggle(from_business).await); // removes, not duplicates
    assert!(store.snapshot().await.is_empty());
}

// ============================================================================
// Persistence Round Trips
// ============================================================================

#[tokio::test]
async fn test_bookmarks_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("news.db");
    let db_path = db_path.to_str().unwrap();

    {
        let storage = Storage::open(db_path).await.unwrap();
        let store = BookmarkStore::open(storage).await;
        store.toggle(article(101)).await;
        store.toggle(article(102)).await;
    }

    let storage = Storage::open(db_path).await.unwrap();
    let store = BookmarkStore::open(storage).await;
    let snapshot = store.snapshot().await;

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].id, 101);
    assert_eq!(snapshot[1].id, 102);
    assert_eq!(snapshot[0].title, "Article 101");
    assert_eq!(snapshot[0].link, "https://example.com/101");
}

#[tokio::test]
async fn test_unsave_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("news.db");
    let db_path = db_path.to_str().unwrap();

    {
        let storage = Storage::open(db_path).await.unwrap();
        let store = BookmarkStore::open(storage).await;
        store.toggle(article(1)).await;
        store.toggle(article(2)).await;
        store.remove(1).await;
    }

    let storage = Storage::open(db_path).await.unwrap();
    let store = BookmarkStore::open(storage).await;
    assert!(!store.is_bookmarked(1).await);
    assert!(store.is_bookmarked(2).await);
}

#[tokio::test]
async fn test_everything_lives_under_one_key() {
    let storage = Storage::open(":memory:").await.unwrap();
    let store = BookmarkStore::open(storage.clone()).await;

    store.toggle(article(1)).await;
    store.toggle(article(2)).await;
    store.remove(1).await;

    // The full surviving set is readable from the one well-known slot.
    let raw = storage.get(STORAGE_KEY).await.unwrap().unwrap();
    let set = BookmarkSet::from_json(&raw).unwrap();
    assert_eq!(set.len(), 1);
    assert!(set.contains(2));
}

#[tokio::test]
async fn test_two_consumers_one_storage_agree() {
    let storage = Storage::open(":memory:").await.unwrap();
    let writer = BookmarkStore::open(storage.clone()).await;
    writer.toggle(article(7)).await;

    // A consumer that loads after the write sees the same membership.
    let reader = BookmarkStore::open(storage).await;
    assert!(reader.is_bookmarked(7).await);
    assert_eq!(reader.snapshot().await.len(), 1);
}

// ============================================================================
// Failure Recovery
// ============================================================================

#[tokio::test]
async fn test_corrupt_stored_value_starts_empty() {
    let storage = Storage::open(":memory:").await.unwrap();
    storage.set(STORAGE_KEY, "{{{{ not json").await.unwrap();

    let store = BookmarkStore::open(storage.clone()).await;
    assert!(store.snapshot().await.is_empty());

    // The next mutation repairs the slot with a valid set.
    store.toggle(article(3)).await;
    let raw = storage.get(STORAGE_KEY).await.unwrap().unwrap();
    let set = BookmarkSet::from_json(&raw).unwrap();
    assert!(set.contains(3));
}

#[tokio::test]
async fn test_legacy_bare_array_migrates_on_next_write() {
    let storage = Storage::open(":memory:").await.unwrap();
    storage
        .set(STORAGE_KEY, r#"[{"id": 11, "title": "Old format"}]"#)
        .await
        .unwrap();

    let store = BookmarkStore::open(storage.clone()).await;
    assert!(store.is_bookmarked(11).await);

    store.toggle(article(12)).await;
    let raw = storage.get(STORAGE_KEY).await.unwrap().unwrap();
    assert!(raw.contains("\"version\":1"));
}

// ============================================================================
// Change Notification
// ============================================================================

#[tokio::test]
async fn test_mutation_through_any_handle_notifies_all_subscribers() {
    let storage = Storage::open(":memory:").await.unwrap();
    let store = BookmarkStore::open(storage).await;

    let mut saved_view = store.subscribe();
    let mut browse_view = store.subscribe();

    let other_handle = store.clone();
    other_handle.toggle(article(9)).await;

    saved_view.changed().await.unwrap();
    browse_view.changed().await.unwrap();
    assert_eq!(saved_view.borrow_and_update().len(), 1);
    assert_eq!(browse_view.borrow_and_update().len(), 1);
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// After any sequence of toggles, membership of each id equals whether
    /// that id was toggled an odd number of times, and the set never holds
    /// duplicates.
    #[test]
    fn prop_toggle_parity_and_no_duplicates(ids in proptest::collection::vec(0i64..16, 0..64)) {
        let mut set = BookmarkSet::new();
        for &id in &ids {
            set.toggle(article(id));
        }

        for id in 0..16 {
            let toggles = ids.iter().filter(|&&x| x == id).count();
            prop_assert_eq!(set.contains(id), toggles % 2 == 1);
        }

        let mut seen = std::collections::HashSet::new();
        for entry in set.as_slice() {
            prop_assert!(seen.insert(entry.id));
        }
    }

    /// Serialization round-trips exactly, whatever the toggle history.
    #[test]
    fn prop_json_round_trip(ids in proptest::collection::vec(0i64..1000, 0..32)) {
        let mut set = BookmarkSet::new();
        for &id in &ids {
            set.toggle(article(id));
        }

        let json = set.to_json().unwrap();
        let loaded = BookmarkSet::from_json(&json).unwrap();
        prop_assert_eq!(loaded, set);
    }
}
