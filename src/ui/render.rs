//! Render functions for the TUI.
//!
//! Dispatches to the appropriate view and lays out the panels. In Urdu the
//! Browse layout is mirrored (articles left, categories right) and lists are
//! right-aligned, matching the right-to-left reading direction.

use crate::app::{App, Focus, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{articles, reader, saved, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 50;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    match app.view {
        View::Browse => render_browse(f, app),
        View::Saved => render_saved(f, app),
        View::Reader => render_reader(f, app),
    }
}

/// Render the browse view (categories + articles panels).
fn render_browse(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(if app.language.is_rtl() {
            [Constraint::Percentage(78), Constraint::Percentage(22)]
        } else {
            [Constraint::Percentage(22), Constraint::Percentage(78)]
        })
        .split(chunks[0]);

    // Mirror the panel order for right-to-left reading
    let (categories_area, articles_area) = if app.language.is_rtl() {
        (panels[1], panels[0])
    } else {
        (panels[0], panels[1])
    };

    render_categories(f, app, categories_area);
    articles::render(f, app, articles_area);
    status::render(f, app, chunks[1]);
}

fn render_saved(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    saved::render(f, app, chunks[0]);
    status::render(f, app, chunks[1]);
}

fn render_reader(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    reader::render(f, app, chunks[0]);
    status::render(f, app, chunks[1]);
}

/// Render the category list panel.
fn render_categories(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Categories;
    let alignment = if app.language.is_rtl() {
        Alignment::Right
    } else {
        Alignment::Left
    };

    let items: Vec<ListItem> = app
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let style = if i == app.selected_category {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            ListItem::new(Line::styled(category.name.clone(), style).alignment(alignment))
        })
        .collect();

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let title = format!(" {} [{}] ", app.config.source_name, app.language.as_str());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    f.render_widget(list, area);
}
