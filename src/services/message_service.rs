use crate::domain::message::{
    ContactSummary, Conversation, InboxEntry, NewMessage, ReadFilter, SentMessage, ThreadMessage,
};
use crate::error::{AppError, Result};
use crate::storage::{MessageStore, UserStore};
use std::sync::Arc;

/// Direct messaging between portal users: contact derivation, conversation
/// retrieval with read-on-view, and the send operation.
#[derive(Clone, Debug)]
pub struct MessageService {
    users: Arc<dyn UserStore>,
    messages: Arc<dyn MessageStore>,
}

impl MessageService {
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, messages: Arc<dyn MessageStore>) -> Self {
        Self { users, messages }
    }

    /// Derives the distinct set of users who have exchanged at least one
    /// message with `user_id`, each with the count of their messages to
    /// `user_id` that are still unread. Sorted by display name, id as
    /// tie-break. No side effects.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn contacts(&self, user_id: i64) -> Result<Vec<ContactSummary>> {
        let contact_ids = self.messages.contact_ids(user_id).await?;

        let mut contacts = Vec::with_capacity(contact_ids.len());
        for contact_id in contact_ids {
            // Users are never hard-deleted; a missing row would mean a
            // dangling reference, which we skip rather than fail the listing.
            let Some(contact) = self.users.find(contact_id).await? else {
                tracing::warn!(contact_id, "Message counterpart missing from user directory");
                continue;
            };
            let unread_count = self.messages.unread_count(contact_id, user_id).await?;
            contacts.push(ContactSummary { contact, unread_count });
        }

        contacts.sort_by(|a, b| {
            a.contact
                .display_name()
                .cmp(b.contact.display_name())
                .then(a.contact.id.cmp(&b.contact.id))
        });
        Ok(contacts)
    }

    /// Returns the full thread between the requester and `contact_id`,
    /// ordered oldest first, and marks every unread message from the
    /// contact to the requester as read. The mutation commits before this
    /// returns, so a subsequent [`Self::contacts`] call observes an unread
    /// count of zero for that contact.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the contact does not exist.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn fetch_thread_and_mark_read(
        &self,
        user_id: i64,
        contact_id: i64,
    ) -> Result<Conversation> {
        let requester = self.users.find(user_id).await?.ok_or(AppError::AuthError)?;
        let contact = self.users.find(contact_id).await?.ok_or(AppError::NotFound)?;

        let marked = self.messages.mark_read(contact_id, user_id).await?;
        if marked > 0 {
            tracing::debug!(marked, "Messages marked as read");
        }

        let messages = self
            .messages
            .thread_between(user_id, contact_id)
            .await?
            .into_iter()
            .map(|message| ThreadMessage { is_outgoing: message.sender_id == user_id, message })
            .collect();

        Ok(Conversation { requester, contact, messages })
    }

    /// Validates and persists one new message from the authenticated sender.
    /// Validation is fail-fast: nothing is written when it fails.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if the content is empty after
    /// trimming and `AppError::NotFound` if the recipient does not exist.
    #[tracing::instrument(err(level = "warn"), skip(self, content, subject))]
    pub async fn send_message(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: &str,
        subject: Option<String>,
    ) -> Result<SentMessage> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::BadRequest("content must not be empty".to_string()));
        }

        let sender = self.users.find(sender_id).await?.ok_or(AppError::AuthError)?;
        if self.users.find(recipient_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let message = self
            .messages
            .insert(NewMessage {
                sender_id,
                recipient_id,
                subject,
                content: content.to_string(),
            })
            .await?;

        tracing::debug!(message_id = message.id, "Message stored");
        Ok(SentMessage { sender, message })
    }

    /// Incoming messages for `user_id`, newest first, with the caller's
    /// total unread count.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn inbox(
        &self,
        user_id: i64,
        filter: ReadFilter,
        limit: Option<i64>,
    ) -> Result<(Vec<InboxEntry>, i64)> {
        let messages = self.messages.received(user_id, filter, limit).await?;
        let unread_count = self.messages.total_unread(user_id).await?;

        let mut entries = Vec::with_capacity(messages.len());
        for message in messages {
            let Some(sender) = self.users.find(message.sender_id).await? else {
                tracing::warn!(sender_id = message.sender_id, "Sender missing from user directory");
                continue;
            };
            entries.push(InboxEntry { sender, message });
        }

        Ok((entries, unread_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{NewUser, Role, User};
    use crate::storage::memory::{InMemoryMessageStore, InMemoryUserStore};
    use time::OffsetDateTime;

    struct Fixture {
        service: MessageService,
        messages: Arc<InMemoryMessageStore>,
        users: Arc<InMemoryUserStore>,
    }

    fn setup() -> Fixture {
        let users = Arc::new(InMemoryUserStore::new());
        let messages = Arc::new(InMemoryMessageStore::new());
        let service = MessageService::new(
            Arc::clone(&users) as Arc<dyn UserStore>,
            Arc::clone(&messages) as Arc<dyn MessageStore>,
        );
        Fixture { service, messages, users }
    }

    async fn add_user(fixture: &Fixture, username: &str, full_name: Option<&str>) -> User {
        fixture
            .users
            .insert(NewUser {
                username: username.to_string(),
                password_hash: "hash".to_string(),
                full_name: full_name.map(str::to_string),
                role: Role::Employee,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_send_and_retrieve_round_trip() {
        let f = setup();
        let alice = add_user(&f, "alice", None).await;
        let bob = add_user(&f, "bob", None).await;

        let sent = f.service.send_message(alice.id, bob.id, "Hello", None).await.unwrap();
        assert_eq!(sent.message.sender_id, alice.id);
        assert_eq!(sent.message.recipient_id, bob.id);
        assert_eq!(sent.message.content, "Hello");
        assert!(!sent.message.is_read);
        assert!(sent.message.read_at.is_none());

        let conversation =
            f.service.fetch_thread_and_mark_read(bob.id, alice.id).await.unwrap();
        assert_eq!(conversation.messages.len(), 1);
        let entry = &conversation.messages[0];
        assert_eq!(entry.message.content, "Hello");
        assert!(!entry.is_outgoing);
    }

    #[tokio::test]
    async fn test_unread_count_lifecycle() {
        let f = setup();
        let alice = add_user(&f, "alice", None).await;
        let bob = add_user(&f, "bob", None).await;

        f.service.send_message(alice.id, bob.id, "Hello", None).await.unwrap();

        let contacts = f.service.contacts(bob.id).await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].contact.id, alice.id);
        assert_eq!(contacts[0].unread_count, 1);

        f.service.fetch_thread_and_mark_read(bob.id, alice.id).await.unwrap();

        let contacts = f.service.contacts(bob.id).await.unwrap();
        assert_eq!(contacts[0].unread_count, 0);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let f = setup();
        let alice = add_user(&f, "alice", None).await;
        let bob = add_user(&f, "bob", None).await;

        f.service.send_message(alice.id, bob.id, "Hello", None).await.unwrap();

        let first = f.service.fetch_thread_and_mark_read(bob.id, alice.id).await.unwrap();
        let second = f.service.fetch_thread_and_mark_read(bob.id, alice.id).await.unwrap();

        assert_eq!(first.messages.len(), second.messages.len());
        let ids = |c: &Conversation| c.messages.iter().map(|m| m.message.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));

        // The second pass must not re-stamp read_at.
        let read_at_first = second.messages[0].message.read_at;
        let third = f.service.fetch_thread_and_mark_read(bob.id, alice.id).await.unwrap();
        assert_eq!(third.messages[0].message.read_at, read_at_first);
    }

    #[tokio::test]
    async fn test_thread_ordering_oldest_first_with_id_tiebreak() {
        let f = setup();
        let alice = add_user(&f, "alice", None).await;
        let bob = add_user(&f, "bob", None).await;

        let base = OffsetDateTime::now_utc();
        let new = |from: i64, to: i64, content: &str| NewMessage {
            sender_id: from,
            recipient_id: to,
            subject: None,
            content: content.to_string(),
        };

        f.messages
            .insert_at(new(alice.id, bob.id, "second"), base + time::Duration::seconds(10))
            .unwrap();
        f.messages.insert_at(new(alice.id, bob.id, "first"), base).unwrap();
        // Identical timestamps: insertion order (id) decides.
        f.messages
            .insert_at(new(bob.id, alice.id, "third"), base + time::Duration::seconds(20))
            .unwrap();
        f.messages
            .insert_at(new(alice.id, bob.id, "fourth"), base + time::Duration::seconds(20))
            .unwrap();

        let conversation =
            f.service.fetch_thread_and_mark_read(bob.id, alice.id).await.unwrap();
        let contents: Vec<&str> =
            conversation.messages.iter().map(|m| m.message.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third", "fourth"]);

        let outgoing: Vec<bool> = conversation.messages.iter().map(|m| m.is_outgoing).collect();
        assert_eq!(outgoing, [false, false, true, false]);
    }

    #[tokio::test]
    async fn test_contacts_cover_both_directions_and_sort_by_name() {
        let f = setup();
        let me = add_user(&f, "me", None).await;
        let boris = add_user(&f, "bivanov", Some("Boris Ivanov")).await;
        let anna = add_user(&f, "asmirnova", Some("Anna Smirnova")).await;
        let stranger = add_user(&f, "stranger", None).await;

        // Boris wrote to me, I wrote to Anna; the stranger never exchanged
        // anything with me.
        f.service.send_message(boris.id, me.id, "hi", None).await.unwrap();
        f.service.send_message(me.id, anna.id, "hello", None).await.unwrap();
        f.service.send_message(stranger.id, boris.id, "unrelated", None).await.unwrap();

        let contacts = f.service.contacts(me.id).await.unwrap();
        let names: Vec<&str> = contacts.iter().map(|c| c.contact.display_name()).collect();
        assert_eq!(names, ["Anna Smirnova", "Boris Ivanov"]);
        assert_eq!(contacts[0].unread_count, 0);
        assert_eq!(contacts[1].unread_count, 1);
    }

    #[tokio::test]
    async fn test_counterpart_on_both_sides_appears_once() {
        let f = setup();
        let alice = add_user(&f, "alice", None).await;
        let bob = add_user(&f, "bob", None).await;

        f.service.send_message(alice.id, bob.id, "ping", None).await.unwrap();
        f.service.send_message(bob.id, alice.id, "pong", None).await.unwrap();

        let contacts = f.service.contacts(alice.id).await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].contact.id, bob.id);
    }

    #[tokio::test]
    async fn test_send_rejects_blank_content_without_persisting() {
        let f = setup();
        let alice = add_user(&f, "alice", None).await;
        let bob = add_user(&f, "bob", None).await;

        let err = f.service.send_message(alice.id, bob.id, "   \n\t ", None).await;
        assert!(matches!(err, Err(AppError::BadRequest(_))));
        assert_eq!(f.messages.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_send_rejects_unknown_recipient_without_persisting() {
        let f = setup();
        let alice = add_user(&f, "alice", None).await;

        let err = f.service.send_message(alice.id, alice.id + 100, "Hello", None).await;
        assert!(matches!(err, Err(AppError::NotFound)));
        assert_eq!(f.messages.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_conversation_with_unknown_contact_is_not_found() {
        let f = setup();
        let alice = add_user(&f, "alice", None).await;

        let err = f.service.fetch_thread_and_mark_read(alice.id, alice.id + 100).await;
        assert!(matches!(err, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_self_messages_are_allowed() {
        let f = setup();
        let alice = add_user(&f, "alice", None).await;

        f.service.send_message(alice.id, alice.id, "note to self", None).await.unwrap();

        let contacts = f.service.contacts(alice.id).await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].contact.id, alice.id);

        let conversation =
            f.service.fetch_thread_and_mark_read(alice.id, alice.id).await.unwrap();
        assert_eq!(conversation.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_inbox_filters_and_counts() {
        let f = setup();
        let alice = add_user(&f, "alice", None).await;
        let bob = add_user(&f, "bob", None).await;
        let carol = add_user(&f, "carol", None).await;

        f.service.send_message(alice.id, bob.id, "one", None).await.unwrap();
        f.service.send_message(carol.id, bob.id, "two", None).await.unwrap();

        // Reading the thread with Alice leaves only Carol's message unread.
        f.service.fetch_thread_and_mark_read(bob.id, alice.id).await.unwrap();

        let (all, unread_count) = f.service.inbox(bob.id, ReadFilter::All, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(unread_count, 1);

        let (unread, _) = f.service.inbox(bob.id, ReadFilter::Unread, None).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].sender.id, carol.id);

        let (read, _) = f.service.inbox(bob.id, ReadFilter::Read, None).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].sender.id, alice.id);
    }
}
