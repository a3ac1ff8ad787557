//! Test application
//!
//! Builds the full router over a fresh in-memory store so every test gets
//! an isolated world. The store handle is kept for setup that has no HTTP
//! surface, such as promoting an admin.

use std::sync::Arc;

use axum_test::TestServer;
use socialnet::backend::routes::create_router;
use socialnet::backend::server::{AppConfig, AppState};
use socialnet::backend::store::MemoryStore;

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

/// Cheap hashing, accounts verified at signup
pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .jwt_secret("integration-secret")
        .bcrypt_cost(4)
        .require_email_verification(false)
        .build()
        .expect("valid test config")
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(test_config())
}

pub fn spawn_app_with(config: AppConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), config);
    let server = TestServer::new(create_router(state.clone())).expect("test server");
    TestApp {
        server,
        store,
        state,
    }
}
