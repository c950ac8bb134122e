use crate::domain::message::InboxEntry;

/// Role-specific landing page data. One closed variant per role keeps the
/// dispatch exhaustive instead of branching on role strings; students get
/// the guest view.
#[derive(Debug)]
pub enum DashboardView {
    Admin(AdminDashboard),
    Employee(EmployeeDashboard),
    Parent(ParentDashboard),
    Guest,
}

#[derive(Debug)]
pub struct AdminDashboard {
    pub users_total: i64,
    pub messages_total: i64,
    pub reports_total: i64,
}

#[derive(Debug)]
pub struct EmployeeDashboard {
    pub unread_messages: i64,
    pub sent_messages: i64,
    pub reports_total: i64,
    pub recent_messages: Vec<InboxEntry>,
}

#[derive(Debug)]
pub struct ParentDashboard {
    pub unread_messages: i64,
    pub recent_messages: Vec<InboxEntry>,
}
