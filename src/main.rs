//! campaign-review entry point.
//!
//! Opens the configured store and logs a per-client approval summary.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use campaign_review::app_state::AppState;
use campaign_review::config::{LogFormat, ReviewConfig};
use campaign_review::service::WorkspaceReport;

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ReviewConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        storage_dir = %config.storage_dir.display(),
        persistence = config.persistence_enabled,
        "starting campaign-review"
    );

    // Build stores
    let state = AppState::from_config(&config)
        .with_context(|| format!("failed to open {}", config.storage_dir.display()))?;
    tracing::info!(theme = %state.themes.get(), "theme resolved");

    match state.sessions.current_user() {
        Some(user) => tracing::info!(username = %user.username, role = %user.role, "session restored"),
        None => tracing::info!("no active session"),
    }

    WorkspaceReport::collect(&state).log();
    Ok(())
}
