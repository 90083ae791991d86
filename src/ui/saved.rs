//! Saved (bookmarked) articles view.

use crate::app::App;
use crate::util::{format_date, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the saved-articles list.
///
/// Rows come straight from the store's latest snapshot, so a toggle in any
/// other view is already reflected here.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = if app.bookmarked.is_empty() {
        vec![ListItem::new(Line::styled(
            "No bookmarks yet",
            Style::default().fg(Color::Gray),
        ))]
    } else {
        app.bookmarked
            .iter()
            .enumerate()
            .map(|(i, article)| {
                let style = if i == app.selected_saved {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default()
                };

                let max_title_width = area.width.saturating_sub(18) as usize;
                let title = truncate_to_width(&article.title, max_title_width).into_owned();

                let mut spans = vec![
                    Span::styled("★ ", Style::default().fg(Color::Yellow)),
                    Span::styled(title, style),
                ];

                let date = format_date(article.published_at);
                if !date.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", date),
                        Style::default().fg(Color::DarkGray),
                    ));
                }

                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let title = format!(" Bookmarked Posts ({}) ", app.bookmarked.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(list, area);
}
