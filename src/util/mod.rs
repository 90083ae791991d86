//! Utility functions for common operations.
//!
//! - **Text processing**: turning WordPress "rendered" HTML fragments into
//!   plain text, plus Unicode-aware truncation for terminal rendering
//! - **Date formatting**: human-readable publication dates

mod text;

pub use text::{clean_rendered, decode_entities, format_date, strip_html, truncate_to_width};
