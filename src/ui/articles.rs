//! Article list panel for the Browse view.

use crate::app::{App, Focus};
use crate::util::{format_date, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the article list panel.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Articles;
    let alignment = if app.language.is_rtl() {
        Alignment::Right
    } else {
        Alignment::Left
    };

    let items: Vec<ListItem> = if app.loading {
        vec![ListItem::new("Loading articles...")]
    } else if let Some(error) = &app.fetch_error {
        vec![ListItem::new(Line::styled(
            format!("Could not load articles: {}", error),
            Style::default().fg(Color::Red),
        ))]
    } else if app.articles.is_empty() {
        vec![ListItem::new("No articles")]
    } else {
        app.articles
            .iter()
            .enumerate()
            .map(|(i, article)| {
                let mut spans = Vec::new();

                // Bookmark indicator, consistent across every view
                if app.is_bookmarked(article.id) {
                    spans.push(Span::styled("★ ", Style::default().fg(Color::Yellow)));
                }

                let title_style = if i == app.selected_article {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };

                // Leave room for the date column
                let max_title_width = area.width.saturating_sub(18) as usize;
                let title = truncate_to_width(&article.title, max_title_width).into_owned();
                spans.push(Span::styled(title, title_style));

                let date = format_date(article.published_at);
                if !date.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", date),
                        Style::default().fg(Color::DarkGray),
                    ));
                }

                ListItem::new(Line::from(spans).alignment(alignment))
            })
            .collect()
    };

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let title = match app.current_category() {
        Some(category) => format!(" {} ", category.name),
        None => " Articles ".to_string(),
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    f.render_widget(list, area);
}
