//! Content source adapter for the WordPress REST API.
//!
//! The rest of the crate treats the remote site as an opaque provider of
//! [`ArticleRecord`]s keyed by post id. Only the fields the app consumes are
//! extracted from the wire JSON; everything else is ignored.

mod types;
mod wp;

pub use types::{ArticleRecord, Language, PLACEHOLDER_IMAGE};
pub use wp::{FetchError, WpClient};
