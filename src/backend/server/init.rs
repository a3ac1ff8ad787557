/**
 * Server Initialization
 *
 * Builds the Axum application from an `AppConfig`.
 *
 * # Initialization Process
 *
 * 1. Choose the store: PostgreSQL when `DATABASE_URL` is set, otherwise the
 *    in-memory store
 * 2. Create the application state
 * 3. Create and configure the router
 * 4. Start the periodic cleanup of idle message channels
 */

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::AppConfig;
use crate::backend::server::state::AppState;
use crate::backend::store::{MemoryStore, PgStore, SocialStore, StoreResult};

/// How often idle broadcast channels are pruned
const CHANNEL_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when `DATABASE_URL` is set but the database cannot be reached or
/// migrated. A missing `DATABASE_URL` is not an error: the server logs a
/// warning and runs on the in-memory store.
pub async fn create_app(config: AppConfig) -> StoreResult<Router<()>> {
    tracing::info!("Initializing socialnet backend server");

    let store = load_store(&config).await?;
    let app_state = AppState::new(store, config);

    let app = create_router(app_state.clone());

    let cleanup_state = app_state.messaging_broadcast.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CHANNEL_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            cleanup_state.cleanup_inactive_channels();
            tracing::debug!("Cleaned up inactive messaging broadcast channels");
        }
    });

    tracing::info!("Router configured with periodic cleanup task");
    Ok(app)
}

async fn load_store(config: &AppConfig) -> StoreResult<Arc<dyn SocialStore>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set. Using the in-memory store; data is lost on restart."
            );
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
