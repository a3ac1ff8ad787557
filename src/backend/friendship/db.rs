//! Database operations for friendships
//!
//! PostgreSQL implementation of `FriendshipStore`. Pair uniqueness is held by
//! the `idx_friendships_pair` index over `(LEAST, GREATEST)` of the two ids,
//! so concurrent requests in opposite directions cannot both land.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::backend::store::{FriendshipStore, PgStore, StoreError, StoreResult};
use crate::shared::{Friendship, FriendshipStatus};

fn friendship_from_row(row: &PgRow) -> StoreResult<Friendship> {
    let status: String = row.try_get("status")?;
    let status = FriendshipStatus::from_str(&status).ok_or_else(|| StoreError::Corrupt {
        entity: "friendship",
        message: format!("unknown status '{}'", status),
    })?;

    Ok(Friendship {
        id: row.try_get("id")?,
        user1: row.try_get("user1_id")?,
        user2: row.try_get("user2_id")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl FriendshipStore for PgStore {
    async fn insert_friendship(&self, friendship: &Friendship) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO friendships (id, user1_id, user2_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(friendship.id)
        .bind(friendship.user1)
        .bind(friendship.user2)
        .bind(friendship.status.as_str())
        .bind(friendship.created_at)
        .bind(friendship.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(
                "A friendship or request already exists between these users".to_string(),
            ));
        }
        Ok(())
    }

    async fn friendship_between(&self, a: Uuid, b: Uuid) -> StoreResult<Option<Friendship>> {
        let row = sqlx::query(
            r#"
            SELECT id, user1_id, user2_id, status, created_at, updated_at
            FROM friendships
            WHERE (user1_id = $1 AND user2_id = $2) OR (user1_id = $2 AND user2_id = $1)
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(friendship_from_row).transpose()
    }

    async fn friendships_of(
        &self,
        user: Uuid,
        status: Option<FriendshipStatus>,
    ) -> StoreResult<Vec<Friendship>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user1_id, user2_id, status, created_at, updated_at
            FROM friendships
            WHERE (user1_id = $1 OR user2_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at ASC
            "#,
        )
        .bind(user)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(friendship_from_row).collect()
    }

    async fn accept_friendship(&self, id: Uuid) -> StoreResult<Friendship> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            UPDATE friendships
            SET status = 'accepted', updated_at = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING id, user1_id, user2_id, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound("Friend request"))?;
        let friendship = friendship_from_row(&row)?;

        sqlx::query("UPDATE users SET friend_count = friend_count + 1 WHERE id = $1 OR id = $2")
            .bind(friendship.user1)
            .bind(friendship.user2)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(friendship)
    }

    async fn delete_friendship(&self, id: Uuid) -> StoreResult<Friendship> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE id = $1
            RETURNING id, user1_id, user2_id, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound("Friendship"))?;
        let friendship = friendship_from_row(&row)?;

        if friendship.is_accepted() {
            sqlx::query(
                "UPDATE users SET friend_count = friend_count - 1 WHERE id = $1 OR id = $2",
            )
            .bind(friendship.user1)
            .bind(friendship.user2)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(friendship)
    }
}
