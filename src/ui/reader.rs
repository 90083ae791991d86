//! Full-screen article reader.

use crate::app::App;
use crate::util::format_date;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the reader view for the currently open article.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(article) = &app.reader_article else {
        let msg = Paragraph::new("No article selected").alignment(Alignment::Center);
        f.render_widget(msg, area);
        return;
    };

    let alignment = if app.language.is_rtl() {
        Alignment::Right
    } else {
        Alignment::Left
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled(
        article.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    // Source • date byline
    let date = format_date(article.published_at);
    let byline = if date.is_empty() {
        article.source_name.clone()
    } else {
        format!("{} • {}", article.source_name, date)
    };
    lines.push(Line::styled(byline, Style::default().fg(Color::Gray)));
    lines.push(Line::raw(""));

    // A terminal can't inline the image; show the reference (remote URL or
    // the local placeholder) so the line is never blank.
    lines.push(Line::styled(
        format!("[image: {}]", article.display_image()),
        Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::raw(""));

    // Excerpt first, then the full body
    if !article.excerpt.is_empty() {
        for text in article.excerpt.lines() {
            lines.push(Line::styled(
                text.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            ));
        }
        lines.push(Line::raw(""));
    }

    if article.content.is_empty() {
        lines.push(Line::styled(
            "Full content is not available.",
            Style::default().fg(Color::Gray),
        ));
    } else {
        for text in article.content.lines() {
            lines.push(Line::raw(text.to_string()));
        }
    }

    let bookmark_marker = if app.is_bookmarked(article.id) {
        " ★ saved "
    } else {
        " "
    };

    let paragraph = Paragraph::new(lines)
        .alignment(alignment)
        .wrap(Wrap { trim: false })
        .scroll((app.reader_scroll as u16, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Article ")
                .title_bottom(bookmark_marker),
        );

    f.render_widget(paragraph, area);
}
