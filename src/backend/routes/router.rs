/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Health check
 * 2. API routes (auth, account, friends, posts, messages, admin)
 * 3. Fallback handler (JSON 404)
 *
 * # Layers
 *
 * - `TraceLayer` logs every request and response
 * - `CorsLayer` allows `CORS_ORIGIN`, or any origin when it is unset
 */

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::Json,
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::AppConfig;
use crate::backend::server::state::AppState;
use crate::backend::store::UserStore;

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
}

/// GET /health: 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                store: "reachable".to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    store: "unreachable".to_string(),
                }),
            )
        }
    }
}

async fn not_found() -> BackendError {
    BackendError::not_found("Route not found")
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    match &config.cors_origin {
        None => CorsLayer::permissive(),
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(origin) => CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => {
                tracing::warn!(
                    "CORS_ORIGIN {:?} is not a valid header value; refusing cross-origin requests",
                    origin
                );
                CorsLayer::new()
            }
        },
    }
}

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state shared by every handler
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", axum::routing::get(health));

    // Add API routes
    let router = configure_api_routes(router);

    // Fallback handler for 404
    let router = router.fallback(not_found);

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&app_state.config));

    router.layer(layers).with_state(app_state)
}
