use crate::domain::user::User;
use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct Message {
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

/// Fields required to persist a new message. Read-state always starts false.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub subject: Option<String>,
    pub content: String,
}

/// A counterpart the user has exchanged at least one message with, plus the
/// number of still-unread messages from that counterpart.
#[derive(Debug, Clone)]
pub struct ContactSummary {
    pub contact: User,
    pub unread_count: i64,
}

/// One entry of a two-party thread, flagged relative to the requesting user.
#[derive(Debug, Clone)]
pub struct ThreadMessage {
    pub message: Message,
    pub is_outgoing: bool,
}

/// Full thread between the requester and one contact, with both identities
/// resolved so callers can render sender names without further lookups.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub requester: User,
    pub contact: User,
    pub messages: Vec<ThreadMessage>,
}

/// A freshly persisted message with its sender resolved for rendering.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub sender: User,
    pub message: Message,
}

/// Read-state filter for inbox listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadFilter {
    #[default]
    All,
    Unread,
    Read,
}

/// One incoming message with its sender resolved.
#[derive(Debug, Clone)]
pub struct InboxEntry {
    pub sender: User,
    pub message: Message,
}
