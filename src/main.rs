//! estate-finder: headless listings driver
//!
//! Loads configuration and fixture data, runs one listings query and prints
//! the results. An optional first argument is used as search text.

use anyhow::Result;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use estate_finder::{App, AppConfig};

/// Initialize logging with RUST_LOG environment variable support
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = AppConfig::load(Some(project_root.as_path()))?;

    tracing::info!("Starting estate-finder in {:?}", project_root);

    let mut app = App::from_config(config)?;
    app.init().await?;

    if let Some(search) = std::env::args().nth(1) {
        app.search(&search).await;
    }

    if let Some(message) = &app.error_message {
        eprintln!("{}", message);
    }

    println!("{}", app.results_summary());
    for property in &app.results {
        let marker = if app.is_favorite(property.id) { "*" } else { " " };
        println!("{} {}", marker, property.summary());
    }

    Ok(())
}
