//! User notifications, currently budget-overrun warnings.

mod core;
mod endpoints;

pub use core::{
    Notification, NotificationKind, create_notification_table, delete_notification,
    has_unread_budget_notification, insert_notification, list_notifications, mark_all_read,
    mark_read, unread_count,
};
pub use endpoints::{
    delete_notification_endpoint, list_notifications_endpoint, mark_all_read_endpoint,
    mark_read_endpoint, unread_count_endpoint,
};
