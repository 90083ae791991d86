//! pressmark: a terminal news reader for WordPress-powered sites.
//!
//! The crate is organized around one core subsystem and its collaborators:
//!
//! - `bookmarks` - the saved-article store: de-duplicated by post id, durable
//!   under a single key-value slot, with change notification for every view
//! - `content` - the WordPress REST client supplying article records
//! - `storage` - the SQLite-backed key-value slot the store persists into
//! - `share` - composing share messages and opening links in the browser
//! - `config` - optional TOML configuration (site URLs, categories, language)
//! - `app` / `ui` - application state and the ratatui front-end

pub mod app;
pub mod bookmarks;
pub mod config;
pub mod content;
pub mod share;
pub mod storage;
pub mod ui;
pub mod util;
