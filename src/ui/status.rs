//! Single-line status bar at the bottom of every view.

use std::borrow::Cow;

use crate::app::{App, View};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

const BROWSE_HINTS: &str =
    "[Tab]switch [Enter]read [b]ookmark [s]hare [o]pen [u]rdu/english [r]efresh [B]saved [q]uit";
const SAVED_HINTS: &str = "[Enter]read [d]remove [s]hare [o]pen [Esc]back [q]uit";
const READER_HINTS: &str = "[j/k]scroll [b]ookmark [s]hare [o]pen [Esc]back [q]uit";

/// Render the status line. A transient message takes priority over the
/// key hints for the current view.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let (text, style): (Cow<str>, Style) = if let Some((message, _)) = &app.status_message {
        (
            Cow::Borrowed(message.as_str()),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )
    } else if app.loading && app.view == View::Browse {
        (
            Cow::Borrowed("Loading..."),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        )
    } else {
        let hints = match app.view {
            View::Browse => BROWSE_HINTS,
            View::Saved => SAVED_HINTS,
            View::Reader => READER_HINTS,
        };
        (
            Cow::Borrowed(hints),
            Style::default().fg(Color::DarkGray),
        )
    };

    f.render_widget(Paragraph::new(text.into_owned()).style(style), area);
}
