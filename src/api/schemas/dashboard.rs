use crate::api::schemas::messaging::InboxMessageView;
use crate::domain::dashboard::DashboardView;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum DashboardResponse {
    Admin {
        users_total: i64,
        messages_total: i64,
        reports_total: i64,
    },
    Employee {
        unread_messages: i64,
        sent_messages: i64,
        reports_total: i64,
        recent_messages: Vec<InboxMessageView>,
    },
    Parent {
        unread_messages: i64,
        recent_messages: Vec<InboxMessageView>,
    },
    Guest,
}

impl From<DashboardView> for DashboardResponse {
    fn from(view: DashboardView) -> Self {
        match view {
            DashboardView::Admin(admin) => Self::Admin {
                users_total: admin.users_total,
                messages_total: admin.messages_total,
                reports_total: admin.reports_total,
            },
            DashboardView::Employee(employee) => Self::Employee {
                unread_messages: employee.unread_messages,
                sent_messages: employee.sent_messages,
                reports_total: employee.reports_total,
                recent_messages: employee.recent_messages.into_iter().map(Into::into).collect(),
            },
            DashboardView::Parent(parent) => Self::Parent {
                unread_messages: parent.unread_messages,
                recent_messages: parent.recent_messages.into_iter().map(Into::into).collect(),
            },
            DashboardView::Guest => Self::Guest,
        }
    }
}
