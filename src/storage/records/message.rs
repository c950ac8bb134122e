use crate::domain::message::Message;
use time::OffsetDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct MessageRecord {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub subject: Option<String>,
    pub content: String,
    pub attachment: Option<String>,
    pub is_read: bool,
    pub read_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id,
            sender_id: record.sender_id,
            recipient_id: record.recipient_id,
            subject: record.subject,
            content: record.content,
            attachment: record.attachment,
            is_read: record.is_read,
            read_at: record.read_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
