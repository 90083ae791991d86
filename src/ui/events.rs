//! Background task event processing and fetch task spawning.

use tokio::sync::mpsc;

use crate::app::{App, AppEvent};

/// Apply a background task result to application state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ArticlesLoaded {
            category_idx,
            generation,
            result,
        } => {
            // A fetch for a category the user already navigated away from:
            // drop it, a newer fetch is in flight (or landed).
            if generation != app.fetch_generation {
                tracing::debug!(
                    generation,
                    current = app.fetch_generation,
                    "Dropping stale fetch result"
                );
                return;
            }

            app.loading = false;
            match result {
                Ok(articles) => {
                    tracing::debug!(count = articles.len(), "Articles loaded");
                    app.articles = std::sync::Arc::new(articles);
                    app.fetch_error = None;
                    app.selected_article = 0;
                }
                Err(error) => {
                    // Fetch failure is recovered locally: empty list, error
                    // in the status bar. Never touches the bookmark store.
                    let category = app
                        .categories
                        .get(category_idx)
                        .map(|c| c.name.as_str())
                        .unwrap_or("category");
                    app.articles = std::sync::Arc::new(Vec::new());
                    app.fetch_error = Some(error.clone());
                    app.set_status(format!("Failed to load {}: {}", category, error));
                }
            }
        }
    }
}

/// Spawn a background fetch for the currently selected category.
///
/// Bumps the fetch generation so that any still-running older fetch is
/// ignored when it completes.
pub(super) fn spawn_fetch(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(category_id) = app.current_category_id() else {
        app.set_status("No category available in this language");
        return;
    };

    app.fetch_generation = app.fetch_generation.wrapping_add(1);
    let generation = app.fetch_generation;
    let category_idx = app.selected_category;
    app.loading = true;
    app.fetch_error = None;

    let client = app.client.clone();
    let language = app.language;
    let tx = event_tx.clone();

    tracing::debug!(category_id, ?language, generation, "Spawning fetch task");

    tokio::spawn(async move {
        let result = client
            .fetch_by_category(category_id, language)
            .await
            .map_err(|e| e.to_string());

        let event = AppEvent::ArticlesLoaded {
            category_idx,
            generation,
            result,
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send fetch result (receiver dropped)");
        }
    });
}
