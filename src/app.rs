use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::bookmarks::BookmarkStore;
use crate::config::{CategoryConfig, Config};
use crate::content::{ArticleRecord, Language, WpClient};
use crate::storage::Storage;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(5);

/// Storage key for the language chosen in the previous session.
pub const SESSION_LANGUAGE_KEY: &str = "session.language";

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Categories alongside the article list
    Browse,
    /// Saved (bookmarked) articles
    Saved,
    /// Full-screen article reader
    Reader,
}

/// Which panel has focus in Browse view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Categories,
    Articles,
}

// ============================================================================
// Events
// ============================================================================

/// Events sent from background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A category fetch finished. `generation` guards against a slow
    /// response for a category the user has already navigated away from.
    ArticlesLoaded {
        category_idx: usize,
        generation: u64,
        result: Result<Vec<ArticleRecord>, String>,
    },
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub config: Config,
    pub storage: Storage,
    pub client: WpClient,
    pub bookmarks: BookmarkStore,

    /// Latest snapshot published by the bookmark store's watch channel.
    pub bookmarked: Arc<[ArticleRecord]>,
    bookmarked_ids: HashSet<i64>,

    pub language: Language,
    /// Categories browsable in the current language, in display order.
    pub categories: Vec<CategoryConfig>,

    pub view: View,
    /// View the reader returns to on back.
    pub return_view: View,
    pub focus: Focus,

    pub selected_category: usize,
    pub selected_article: usize,
    pub selected_saved: usize,

    /// Articles for the currently selected category.
    pub articles: Arc<Vec<ArticleRecord>>,
    pub loading: bool,
    pub fetch_error: Option<String>,
    /// Monotonic counter identifying the newest in-flight fetch.
    pub fetch_generation: u64,

    pub reader_article: Option<ArticleRecord>,
    pub reader_scroll: usize,

    pub status_message: Option<(String, Instant)>,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        config: Config,
        storage: Storage,
        client: WpClient,
        bookmarks: BookmarkStore,
        language: Language,
        bookmarked: Arc<[ArticleRecord]>,
    ) -> Self {
        let mut app = Self {
            config,
            storage,
            client,
            bookmarks,
            bookmarked: Arc::from(Vec::new()),
            bookmarked_ids: HashSet::new(),
            language,
            categories: Vec::new(),
            view: View::Browse,
            return_view: View::Browse,
            focus: Focus::Categories,
            selected_category: 0,
            selected_article: 0,
            selected_saved: 0,
            articles: Arc::new(Vec::new()),
            loading: false,
            fetch_error: None,
            fetch_generation: 0,
            reader_article: None,
            reader_scroll: 0,
            status_message: None,
            needs_redraw: true,
        };
        app.apply_bookmarks(bookmarked);
        app.rebuild_categories();
        app
    }

    /// Recompute the browsable category list for the current language.
    ///
    /// Categories with no Urdu id are hidden while browsing in Urdu; the
    /// selection is clamped so it always points at a real entry.
    pub fn rebuild_categories(&mut self) {
        self.categories = self
            .config
            .categories
            .iter()
            .filter(|c| self.language == Language::English || c.urdu_id.is_some())
            .cloned()
            .collect();
        if self.selected_category >= self.categories.len() {
            self.selected_category = self.categories.len().saturating_sub(1);
        }
    }

    pub fn current_category(&self) -> Option<&CategoryConfig> {
        self.categories.get(self.selected_category)
    }

    /// The WordPress category id to fetch for the current selection and
    /// language.
    pub fn current_category_id(&self) -> Option<u32> {
        let category = self.current_category()?;
        match self.language {
            Language::English => Some(category.english_id),
            Language::Urdu => category.urdu_id,
        }
    }

    /// Install a fresh snapshot from the bookmark store.
    pub fn apply_bookmarks(&mut self, snapshot: Arc<[ArticleRecord]>) {
        self.bookmarked_ids = snapshot.iter().map(|a| a.id).collect();
        self.bookmarked = snapshot;
        if self.selected_saved >= self.bookmarked.len() {
            self.selected_saved = self.bookmarked.len().saturating_sub(1);
        }
        self.needs_redraw = true;
    }

    /// Membership test against the latest published snapshot. Identity is
    /// by id alone, so the same post fetched in two categories shows as
    /// bookmarked in both.
    pub fn is_bookmarked(&self, id: i64) -> bool {
        self.bookmarked_ids.contains(&id)
    }

    /// The article under the cursor in the Browse article list.
    pub fn selected_article(&self) -> Option<&ArticleRecord> {
        self.articles.get(self.selected_article)
    }

    /// The article under the cursor in the Saved view.
    pub fn selected_saved_article(&self) -> Option<&ArticleRecord> {
        self.bookmarked.get(self.selected_saved)
    }

    /// The article the current view acts on (bookmark/share/open keys).
    pub fn active_article(&self) -> Option<&ArticleRecord> {
        match self.view {
            View::Browse => self.selected_article(),
            View::Saved => self.selected_saved_article(),
            View::Reader => self.reader_article.as_ref(),
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear the status message after its TTL. Returns true if cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, created)) = &self.status_message {
            if created.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Enter the reader for an article, remembering where to return.
    pub fn open_reader(&mut self, article: ArticleRecord) {
        self.return_view = self.view;
        self.reader_article = Some(article);
        self.reader_scroll = 0;
        self.view = View::Reader;
    }

    pub fn close_reader(&mut self) {
        self.view = self.return_view;
        self.reader_article = None;
        self.reader_scroll = 0;
    }
}
