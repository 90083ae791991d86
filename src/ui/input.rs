//! Keyboard input handling.

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::{App, AppEvent, Focus, View, MAX_SCROLL, SESSION_LANGUAGE_KEY};
use crate::share;

use super::events::spawn_fetch;
use super::loop_runner::Action;

/// Handle a key press for the current view.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> anyhow::Result<Action> {
    // Ctrl+C quits from any view
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(Action::Quit);
    }

    match app.view {
        View::Browse => handle_browse(app, code, event_tx).await,
        View::Saved => handle_saved(app, code).await,
        View::Reader => handle_reader(app, code).await,
    }
}

async fn handle_browse(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> anyhow::Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),

        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Categories => Focus::Articles,
                Focus::Articles => Focus::Categories,
            };
        }

        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            Focus::Categories => {
                if app.selected_category + 1 < app.categories.len() {
                    app.selected_category += 1;
                    spawn_fetch(app, event_tx);
                }
            }
            Focus::Articles => {
                if app.selected_article + 1 < app.articles.len() {
                    app.selected_article += 1;
                }
            }
        },

        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            Focus::Categories => {
                if app.selected_category > 0 {
                    app.selected_category -= 1;
                    spawn_fetch(app, event_tx);
                }
            }
            Focus::Articles => {
                app.selected_article = app.selected_article.saturating_sub(1);
            }
        },

        KeyCode::Enter => match app.focus {
            Focus::Categories => app.focus = Focus::Articles,
            Focus::Articles => {
                if let Some(article) = app.selected_article().cloned() {
                    app.open_reader(article);
                }
            }
        },

        KeyCode::Esc => {
            if app.focus == Focus::Articles {
                app.focus = Focus::Categories;
            }
        }

        KeyCode::Char('b') => toggle_bookmark(app).await,
        KeyCode::Char('s') => share_active(app),
        KeyCode::Char('o') => open_active(app),
        KeyCode::Char('u') => toggle_language(app, event_tx).await,
        KeyCode::Char('r') => spawn_fetch(app, event_tx),

        KeyCode::Char('B') | KeyCode::Char('v') => {
            app.view = View::Saved;
            app.selected_saved = 0;
        }

        _ => {}
    }
    Ok(Action::Continue)
}

async fn handle_saved(app: &mut App, code: KeyCode) -> anyhow::Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),

        KeyCode::Esc | KeyCode::Char('B') => app.view = View::Browse,

        KeyCode::Char('j') | KeyCode::Down => {
            if app.selected_saved + 1 < app.bookmarked.len() {
                app.selected_saved += 1;
            }
        }

        KeyCode::Char('k') | KeyCode::Up => {
            app.selected_saved = app.selected_saved.saturating_sub(1);
        }

        KeyCode::Enter => {
            if let Some(article) = app.selected_saved_article().cloned() {
                app.open_reader(article);
            }
        }

        // Unsave without re-fetching the article
        KeyCode::Char('d') | KeyCode::Char('x') => {
            if let Some(article) = app.selected_saved_article().cloned() {
                app.bookmarks.remove(article.id).await;
                app.set_status(format!("Removed: {}", article.title));
            }
        }

        KeyCode::Char('s') => share_active(app),
        KeyCode::Char('o') => open_active(app),

        _ => {}
    }
    Ok(Action::Continue)
}

async fn handle_reader(app: &mut App, code: KeyCode) -> anyhow::Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),

        KeyCode::Esc | KeyCode::Backspace => app.close_reader(),

        KeyCode::Char('j') | KeyCode::Down => {
            app.reader_scroll = (app.reader_scroll + 1).min(MAX_SCROLL);
        }

        KeyCode::Char('k') | KeyCode::Up => {
            app.reader_scroll = app.reader_scroll.saturating_sub(1);
        }

        KeyCode::PageDown => {
            app.reader_scroll = (app.reader_scroll + 20).min(MAX_SCROLL);
        }

        KeyCode::PageUp => {
            app.reader_scroll = app.reader_scroll.saturating_sub(20);
        }

        KeyCode::Char('b') => toggle_bookmark(app).await,
        KeyCode::Char('s') => share_active(app),
        KeyCode::Char('o') => open_active(app),

        _ => {}
    }
    Ok(Action::Continue)
}

/// Toggle the bookmark for the article the current view acts on.
///
/// The in-memory update is immediate (the watch channel redraws every
/// view); persistence is the store's responsibility.
async fn toggle_bookmark(app: &mut App) {
    let Some(article) = app.active_article().cloned() else {
        return;
    };
    let title = article.title.clone();
    if app.bookmarks.toggle(article).await {
        app.set_status(format!("Saved: {}", title));
    } else {
        app.set_status(format!("Removed: {}", title));
    }
}

/// Share the active article: compose the message and open the link.
/// Failure is a status-bar alert; bookmark state is untouched.
fn share_active(app: &mut App) {
    let Some(article) = app.active_article().cloned() else {
        return;
    };
    let message = share::share_message(&article);
    match share::open_link(&article) {
        Ok(()) => {
            tracing::debug!(message = %message, "Sharing article");
            app.set_status(format!("Sharing: {}", article.title));
        }
        Err(e) => app.set_status(format!("Share failed: {}", e)),
    }
}

fn open_active(app: &mut App) {
    let Some(article) = app.active_article().cloned() else {
        return;
    };
    match share::open_link(&article) {
        Ok(()) => app.set_status("Opened in browser"),
        Err(e) => app.set_status(format!("Open failed: {}", e)),
    }
}

/// Switch between English and Urdu: rebuild the category list, re-fetch,
/// and remember the choice for the next session.
async fn toggle_language(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    app.language = app.language.toggled();
    app.rebuild_categories();
    app.articles = std::sync::Arc::new(Vec::new());
    app.selected_article = 0;

    // Best-effort session persistence; the app works fine without it
    if let Err(e) = app
        .storage
        .set(SESSION_LANGUAGE_KEY, app.language.as_str())
        .await
    {
        tracing::warn!(error = %e, "Failed to persist language preference");
    }

    spawn_fetch(app, event_tx);
}
