//! Database operations for posts
//!
//! PostgreSQL implementation of `PostStore`. Reactions and the comment tree
//! are JSONB columns on the post row; every mutation locks the row with
//! `SELECT ... FOR UPDATE`, applies the change in Rust and writes it back in
//! the same transaction as the owner's activity adjustment.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use crate::backend::store::{
    EngagementStats, PgStore, PostQuery, PostStore, StoreError, StoreResult,
};
use crate::shared::{Comment, Post, PostMutation, Privacy};

const POST_COLUMNS: &str =
    "p.id, p.user_id, p.content, p.media, p.privacy, p.likes, p.dislikes, p.comments, p.created_at";

fn post_from_row(row: &PgRow) -> StoreResult<Post> {
    let privacy: String = row.try_get("privacy")?;
    let privacy = Privacy::from_str(&privacy).ok_or_else(|| StoreError::Corrupt {
        entity: "post",
        message: format!("unknown privacy '{}'", privacy),
    })?;
    let Json(likes): Json<Vec<Uuid>> = row.try_get("likes")?;
    let Json(dislikes): Json<Vec<Uuid>> = row.try_get("dislikes")?;
    let Json(comments): Json<Vec<Comment>> = row.try_get("comments")?;

    Ok(Post {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        media: row.try_get("media")?,
        privacy,
        created_at: row.try_get("created_at")?,
        likes,
        dislikes,
        comments,
    })
}

#[async_trait]
impl PostStore for PgStore {
    async fn insert_post(&self, post: &Post) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO posts
                (id, user_id, content, media, privacy, likes, dislikes, comments, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(post.id)
        .bind(post.user_id)
        .bind(&post.content)
        .bind(&post.media)
        .bind(post.privacy.as_str())
        .bind(Json(&post.likes))
        .bind(Json(&post.dislikes))
        .bind(Json(&post.comments))
        .bind(post.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET post_count = post_count + 1 WHERE id = $1")
            .bind(post.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn post_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let sql = format!("SELECT {} FROM posts p WHERE p.id = $1", POST_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(post_from_row).transpose()
    }

    async fn query_posts(&self, query: &PostQuery) -> StoreResult<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE NOT u.deactivated
              AND ($1::uuid[] IS NULL OR p.user_id = ANY($1))
              AND NOT (p.user_id = ANY($2))
              AND (p.privacy = ANY($3) OR p.user_id = $4)
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $5 OFFSET $6
            "#,
            POST_COLUMNS
        );
        let privacy: Vec<String> = query.privacy.iter().map(|p| p.as_str().to_string()).collect();

        let rows = sqlx::query(&sql)
            .bind(query.owners.as_deref())
            .bind(&query.exclude_owners)
            .bind(&privacy)
            .bind(query.always_include)
            .bind(query.page.limit)
            .bind(query.page.offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(post_from_row).collect()
    }

    async fn mutate_post(&self, id: Uuid, mutation: &PostMutation) -> StoreResult<Post> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT {} FROM posts p WHERE p.id = $1 FOR UPDATE", POST_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("Post"))?;
        let mut post = post_from_row(&row)?;

        // A refused mutation drops the transaction, releasing the lock untouched.
        let delta = post.apply(mutation)?;

        sqlx::query("UPDATE posts SET likes = $2, dislikes = $3, comments = $4 WHERE id = $1")
            .bind(post.id)
            .bind(Json(&post.likes))
            .bind(Json(&post.dislikes))
            .bind(Json(&post.comments))
            .execute(&mut *tx)
            .await?;

        if delta != 0 {
            sqlx::query("UPDATE users SET activity = activity + $2 WHERE id = $1")
                .bind(post.user_id)
                .bind(delta)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(post)
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<Post> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            DELETE FROM posts p
            WHERE p.id = $1
            RETURNING p.id, p.user_id, p.content, p.media, p.privacy,
                      p.likes, p.dislikes, p.comments, p.created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StoreError::NotFound("Post"))?;
        let post = post_from_row(&row)?;

        sqlx::query(
            "UPDATE users SET post_count = post_count - 1, activity = activity - $2 WHERE id = $1",
        )
        .bind(post.user_id)
        .bind(post.engagement())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(post)
    }

    async fn engagement_stats(
        &self,
        users: &[Uuid],
    ) -> StoreResult<HashMap<Uuid, EngagementStats>> {
        if users.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT user_id,
                   COUNT(*)::BIGINT AS post_count,
                   COALESCE(SUM(jsonb_array_length(likes)
                              + jsonb_array_length(dislikes)
                              + jsonb_array_length(comments)), 0)::BIGINT AS engagement
            FROM posts
            WHERE user_id = ANY($1)
            GROUP BY user_id
            "#,
        )
        .bind(users)
        .fetch_all(&self.pool)
        .await?;

        let mut stats = HashMap::with_capacity(rows.len());
        for row in rows {
            stats.insert(
                row.try_get::<Uuid, _>("user_id")?,
                EngagementStats {
                    post_count: row.try_get("post_count")?,
                    engagement: row.try_get("engagement")?,
                },
            );
        }
        Ok(stats)
    }
}
