use crate::api::schemas::format_timestamp;
use crate::domain::message::{Conversation, InboxEntry, ReadFilter, SentMessage, ThreadMessage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ConversationParams {
    pub contact_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub content: String,
    pub created_at: String,
    pub is_read: bool,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub messages: Vec<MessageView>,
}

impl From<Conversation> for ConversationResponse {
    fn from(conversation: Conversation) -> Self {
        let Conversation { requester, contact, messages } = conversation;
        let messages = messages
            .into_iter()
            .map(|ThreadMessage { message, is_outgoing }| MessageView {
                id: message.id,
                sender_id: message.sender_id,
                sender_name: if is_outgoing { &requester } else { &contact }
                    .display_name()
                    .to_string(),
                content: message.content,
                created_at: format_timestamp(message.created_at),
                is_read: message.is_read,
            })
            .collect();
        Self { messages }
    }
}

/// Fields are optional so that missing ones surface as a 400 with a clear
/// error message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: Option<i64>,
    pub content: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SentMessageView {
    pub id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: SentMessageView,
}

impl From<SentMessage> for SendMessageResponse {
    fn from(sent: SentMessage) -> Self {
        Self {
            success: true,
            message: SentMessageView {
                id: sent.message.id,
                sender_id: sent.message.sender_id,
                sender_name: sent.sender.display_name().to_string(),
                content: sent.message.content,
                created_at: format_timestamp(sent.message.created_at),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactView {
    pub id: i64,
    pub name: String,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ContactsResponse {
    pub contacts: Vec<ContactView>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFilterParam {
    All,
    Unread,
    Read,
}

impl From<ReadFilterParam> for ReadFilter {
    fn from(param: ReadFilterParam) -> Self {
        match param {
            ReadFilterParam::All => Self::All,
            ReadFilterParam::Unread => Self::Unread,
            ReadFilterParam::Read => Self::Read,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InboxParams {
    pub filter: Option<ReadFilterParam>,
}

#[derive(Debug, Serialize)]
pub struct InboxMessageView {
    pub id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub subject: Option<String>,
    pub content: String,
    pub created_at: String,
    pub is_read: bool,
}

impl From<InboxEntry> for InboxMessageView {
    fn from(entry: InboxEntry) -> Self {
        Self {
            id: entry.message.id,
            sender_id: entry.message.sender_id,
            sender_name: entry.sender.display_name().to_string(),
            subject: entry.message.subject,
            content: entry.message.content,
            created_at: format_timestamp(entry.message.created_at),
            is_read: entry.message.is_read,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InboxResponse {
    pub messages: Vec<InboxMessageView>,
    pub unread_count: i64,
}
