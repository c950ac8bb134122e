use crate::domain::dashboard::{
    AdminDashboard, DashboardView, EmployeeDashboard, ParentDashboard,
};
use crate::domain::message::ReadFilter;
use crate::domain::user::{Role, User};
use crate::error::Result;
use crate::services::message_service::MessageService;
use crate::storage::{MessageStore, ReportStore, UserStore};
use std::sync::Arc;

const RECENT_MESSAGES_LIMIT: i64 = 5;

/// Produces the role-specific landing page data through exhaustive dispatch
/// over the role variants.
#[derive(Clone, Debug)]
pub struct DashboardService {
    users: Arc<dyn UserStore>,
    messages: Arc<dyn MessageStore>,
    reports: Arc<dyn ReportStore>,
    message_service: MessageService,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        messages: Arc<dyn MessageStore>,
        reports: Arc<dyn ReportStore>,
        message_service: MessageService,
    ) -> Self {
        Self { users, messages, reports, message_service }
    }

    #[tracing::instrument(err(level = "warn"), skip(self, user), fields(user_id = user.id, role = %user.role))]
    pub async fn dashboard(&self, user: &User) -> Result<DashboardView> {
        match user.role {
            Role::Admin => Ok(DashboardView::Admin(AdminDashboard {
                users_total: self.users.count().await?,
                messages_total: self.messages.count().await?,
                reports_total: self.reports.count().await?,
            })),
            Role::Employee => {
                let (recent_messages, unread_messages) = self
                    .message_service
                    .inbox(user.id, ReadFilter::All, Some(RECENT_MESSAGES_LIMIT))
                    .await?;
                Ok(DashboardView::Employee(EmployeeDashboard {
                    unread_messages,
                    sent_messages: self.messages.count_sent(user.id).await?,
                    reports_total: self.reports.count_by_author(user.id).await?,
                    recent_messages,
                }))
            }
            Role::Parent => {
                let (recent_messages, unread_messages) = self
                    .message_service
                    .inbox(user.id, ReadFilter::All, Some(RECENT_MESSAGES_LIMIT))
                    .await?;
                Ok(DashboardView::Parent(ParentDashboard { unread_messages, recent_messages }))
            }
            Role::Student => Ok(DashboardView::Guest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::NewUser;
    use crate::storage::memory::{InMemoryMessageStore, InMemoryReportStore, InMemoryUserStore};

    struct Fixture {
        users: Arc<InMemoryUserStore>,
        service: DashboardService,
        message_service: MessageService,
    }

    fn setup() -> Fixture {
        let users = Arc::new(InMemoryUserStore::new());
        let messages = Arc::new(InMemoryMessageStore::new());
        let reports = Arc::new(InMemoryReportStore::new());
        let message_service = MessageService::new(
            Arc::clone(&users) as Arc<dyn UserStore>,
            Arc::clone(&messages) as Arc<dyn MessageStore>,
        );
        let service = DashboardService::new(
            Arc::clone(&users) as Arc<dyn UserStore>,
            messages as Arc<dyn MessageStore>,
            reports as Arc<dyn ReportStore>,
            message_service.clone(),
        );
        Fixture { users, service, message_service }
    }

    async fn add_user(f: &Fixture, username: &str, role: Role) -> User {
        f.users
            .insert(NewUser {
                username: username.to_string(),
                password_hash: "hash".to_string(),
                full_name: None,
                role,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_admin_sees_global_counts() {
        let f = setup();
        let admin = add_user(&f, "admin", Role::Admin).await;
        let parent = add_user(&f, "parent", Role::Parent).await;
        f.message_service.send_message(admin.id, parent.id, "hi", None).await.unwrap();

        match f.service.dashboard(&admin).await.unwrap() {
            DashboardView::Admin(view) => {
                assert_eq!(view.users_total, 2);
                assert_eq!(view.messages_total, 1);
                assert_eq!(view.reports_total, 0);
            }
            other => panic!("expected admin dashboard, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_parent_sees_unread_and_recent() {
        let f = setup();
        let employee = add_user(&f, "employee", Role::Employee).await;
        let parent = add_user(&f, "parent", Role::Parent).await;
        f.message_service.send_message(employee.id, parent.id, "progress update", None).await.unwrap();

        match f.service.dashboard(&parent).await.unwrap() {
            DashboardView::Parent(view) => {
                assert_eq!(view.unread_messages, 1);
                assert_eq!(view.recent_messages.len(), 1);
            }
            other => panic!("expected parent dashboard, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_student_gets_guest_view() {
        let f = setup();
        let student = add_user(&f, "student", Role::Student).await;
        assert!(matches!(f.service.dashboard(&student).await.unwrap(), DashboardView::Guest));
    }
}
