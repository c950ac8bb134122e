use crate::domain::message::{Message, NewMessage, ReadFilter};
use crate::error::Result;
use crate::storage::records::message::MessageRecord;
use crate::storage::{DbPool, MessageStore};
use async_trait::async_trait;
use sqlx::QueryBuilder;

#[derive(Clone, Debug)]
pub struct MessageRepository {
    pool: DbPool,
}

impl MessageRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const MESSAGE_COLUMNS: &str = "id, sender_id, recipient_id, subject, content, attachment, \
                               is_read, read_at, created_at, updated_at";

#[async_trait]
impl MessageStore for MessageRepository {
    async fn insert(&self, new: NewMessage) -> Result<Message> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r"
            INSERT INTO messages (sender_id, recipient_id, subject, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sender_id, recipient_id, subject, content, attachment,
                      is_read, read_at, created_at, updated_at
            ",
        )
        .bind(new.sender_id)
        .bind(new.recipient_id)
        .bind(&new.subject)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn thread_between(&self, user_id: i64, contact_id: i64) -> Result<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(&format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at ASC, id ASC
            "
        ))
        .bind(user_id)
        .bind(contact_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn mark_read(&self, sender_id: i64, recipient_id: i64) -> Result<u64> {
        let result = sqlx::query(
            r"
            UPDATE messages
            SET is_read = TRUE, read_at = NOW(), updated_at = NOW()
            WHERE sender_id = $1 AND recipient_id = $2 AND is_read = FALSE
            ",
        )
        .bind(sender_id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn contact_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r"
            SELECT sender_id FROM messages WHERE recipient_id = $1
            UNION
            SELECT recipient_id FROM messages WHERE sender_id = $1
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn unread_count(&self, sender_id: i64, recipient_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM messages
            WHERE sender_id = $1 AND recipient_id = $2 AND is_read = FALSE
            ",
        )
        .bind(sender_id)
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn total_unread(&self, recipient_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn received(
        &self,
        recipient_id: i64,
        filter: ReadFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Message>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE recipient_id = "
        ));
        query.push_bind(recipient_id);

        match filter {
            ReadFilter::All => {}
            ReadFilter::Unread => {
                query.push(" AND is_read = FALSE");
            }
            ReadFilter::Read => {
                query.push(" AND is_read = TRUE");
            }
        }

        query.push(" ORDER BY created_at DESC, id DESC");
        if let Some(limit) = limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let records: Vec<MessageRecord> = query.build_query_as().fetch_all(&self.pool).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn count_sent(&self, sender_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE sender_id = $1")
            .bind(sender_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages").fetch_one(&self.pool).await?;
        Ok(count)
    }
}
