//! Database operations for direct messages
//!
//! PostgreSQL implementation of `MessageStore`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::backend::store::{MessageStore, PgStore, StoreError, StoreResult};
use crate::shared::messaging::ConversationSummary;
use crate::shared::{DirectMessage, MessageStatus, Page};

fn message_from_row(row: &PgRow) -> StoreResult<DirectMessage> {
    let status: String = row.try_get("status")?;
    let status = MessageStatus::from_str(&status).ok_or_else(|| StoreError::Corrupt {
        entity: "message",
        message: format!("unknown status '{}'", status),
    })?;

    Ok(DirectMessage {
        id: row.try_get("id")?,
        sender_id: row.try_get("sender_id")?,
        receiver_id: row.try_get("receiver_id")?,
        body: row.try_get("body")?,
        status,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(&self, message: &DirectMessage) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO direct_messages (id, sender_id, receiver_id, body, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id)
        .bind(message.sender_id)
        .bind(message.receiver_id)
        .bind(&message.body)
        .bind(message.status.as_str())
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn thread(&self, a: Uuid, b: Uuid, page: Page) -> StoreResult<Vec<DirectMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, body, status, created_at
            FROM direct_messages
            WHERE (sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(a)
        .bind(b)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(message_from_row).collect()
    }

    async fn mark_delivered(&self, receiver: Uuid, sender: Uuid) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE direct_messages
            SET status = 'delivered'
            WHERE receiver_id = $1 AND sender_id = $2 AND status = 'pending'
            "#,
        )
        .bind(receiver)
        .bind(sender)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn conversations(&self, user: Uuid) -> StoreResult<Vec<ConversationSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT ON (peer_id)
                   m.id, m.sender_id, m.receiver_id, m.body, m.status, m.created_at,
                   m.peer_id,
                   (SELECT COUNT(*) FROM direct_messages p
                    WHERE p.sender_id = m.peer_id AND p.receiver_id = $1
                      AND p.status = 'pending') AS pending_count
            FROM (
                SELECT *, CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END AS peer_id
                FROM direct_messages
                WHERE sender_id = $1 OR receiver_id = $1
            ) m
            ORDER BY peer_id, m.created_at DESC, m.id DESC
            "#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        let mut summaries = rows
            .iter()
            .map(|row| -> StoreResult<ConversationSummary> {
                Ok(ConversationSummary {
                    peer_id: row.try_get("peer_id")?,
                    last_message: message_from_row(row)?,
                    pending_count: row.try_get("pending_count")?,
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        summaries.sort_by(|a, b| b.last_message.created_at.cmp(&a.last_message.created_at));
        Ok(summaries)
    }
}
