use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub mod auth;
pub mod dashboard;
pub mod directory;
pub mod health;
pub mod messaging;
pub mod relations;
pub mod reports;
pub mod users;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Renders a timestamp in the portal wire format, `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp.format(&TIMESTAMP_FORMAT).unwrap_or_default()
}
