/**
 * Socialnet Server Entry Point
 *
 * Loads configuration, initializes tracing, and serves the Axum app.
 */

use socialnet::backend::server::{config::AppConfig, init::create_app};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,socialnet=debug"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("[STARTUP] Server initialization started");

    let config = AppConfig::from_env()?;
    let addr = config.bind_address();

    let app = create_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
