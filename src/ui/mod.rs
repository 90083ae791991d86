//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing and fetch spawning
//! - `render` - View rendering dispatch
//! - `articles` - Category article list widgets
//! - `saved` - Saved (bookmarked) articles view
//! - `reader` - Full-screen article reader
//! - `status` - Status bar widget

mod articles;
mod events;
mod input;
mod loop_runner;
mod reader;
mod render;
mod saved;
mod status;

pub use loop_runner::{run, Action};
