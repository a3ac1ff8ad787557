/**
 * PostgreSQL Store
 *
 * Owns the sqlx connection pool and runs the embedded migrations from
 * `migrations/`. The trait implementations live with their domains:
 * `auth::users` (users), `friendship::db`, `posts::db` and `messaging::db`.
 */

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::StoreResult;

/// sqlx-backed store
#[derive(Clone, Debug)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, then run pending migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!("Database connection pool created successfully");

        tracing::info!("Running database migrations...");
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations completed successfully");

        Ok(Self::new(pool))
    }
}
