use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use pressmark::app::{App, AppEvent, SESSION_LANGUAGE_KEY};
use pressmark::bookmarks::BookmarkStore;
use pressmark::config::Config;
use pressmark::content::{Language, WpClient};
use pressmark::storage::{Storage, StorageError};
use pressmark::ui;

/// Get the config directory path (~/.config/pressmark/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("pressmark");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "pressmark", about = "Terminal news reader with persistent bookmarks")]
struct Args {
    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,

    /// Start in this language (en or ur) instead of the saved session choice
    #[arg(long, value_name = "LANG")]
    language: Option<String>,

    /// Path to a config file (defaults to ~/.config/pressmark/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // Directory permissions on Unix (user-only access)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let db_path = config_dir.join("news.db");

    // Handle --reset-db flag
    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    let config = Config::load(&config_path).context("Failed to load config")?;

    // Open database
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let storage = match Storage::open(db_path_str).await {
        Ok(storage) => storage,
        Err(StorageError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of pressmark appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let config_default = Language::from_code(&config.default_language).unwrap_or_else(|| {
        tracing::warn!(
            code = %config.default_language,
            "Unknown default_language in config, using English"
        );
        Language::English
    });

    // Language precedence: CLI flag, then the previous session's choice,
    // then the config default.
    let language = match args.language.as_deref() {
        Some(code) => Language::from_code(code)
            .ok_or_else(|| anyhow::anyhow!("Unknown language '{}' (expected en or ur)", code))?,
        None => match storage.get(SESSION_LANGUAGE_KEY).await {
            Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|| {
                tracing::warn!(code = %code, "Ignoring unknown saved language");
                config_default
            }),
            Ok(None) => config_default,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read saved language");
                config_default
            }
        },
    };

    let client = WpClient::new(
        &config.english_base_url,
        &config.urdu_base_url,
        &config.source_name,
    )
    .context("Failed to create API client")?;

    // Load the persisted bookmark set; a corrupt or missing value starts
    // the session with an empty set rather than failing startup.
    let bookmarks = BookmarkStore::open(storage.clone()).await;
    let snapshot = bookmarks.snapshot().await;
    tracing::info!(bookmarks = snapshot.len(), ?language, "Starting session");

    let mut app = App::new(config, storage, client, bookmarks, language, snapshot);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
