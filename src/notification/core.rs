//! Defines the notification model and its database functions.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{CategoryId, NotificationId, UserId},
    month::MonthRange,
};

/// The maximum number of notifications returned by a listing.
const LIST_LIMIT: u32 = 50;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    BudgetExceeded,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BudgetExceeded => "BUDGET_EXCEEDED",
        }
    }

    fn from_sql(text: &str, column: usize) -> Result<Self, rusqlite::Error> {
        match text {
            "BUDGET_EXCEEDED" => Ok(Self::BudgetExceeded),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column,
                Type::Text,
                format!("unknown notification kind {other:?}").into(),
            )),
        }
    }
}

/// A message surfaced to the user, created by the budget evaluator and
/// managed (read/deleted) by the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub category_id: Option<CategoryId>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: Date,
}

/// Create the notification table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_notification_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS notification (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category_id INTEGER,
                kind TEXT NOT NULL,
                title TEXT NOT NULL,
                message TEXT NOT NULL,
                read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON DELETE SET NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_notification_user ON notification(user_id, read);",
        (),
    )?;

    Ok(())
}

fn map_notification_row(row: &Row) -> Result<Notification, rusqlite::Error> {
    let kind_text: String = row.get(3)?;

    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        kind: NotificationKind::from_sql(&kind_text, 3)?,
        title: row.get(4)?,
        message: row.get(5)?,
        read: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert a notification for `user_id`.
pub fn insert_notification(
    user_id: UserId,
    category_id: Option<CategoryId>,
    kind: NotificationKind,
    title: &str,
    message: &str,
    created_at: Date,
    connection: &Connection,
) -> Result<Notification, Error> {
    let notification = connection
        .prepare(
            "INSERT INTO notification (user_id, category_id, kind, title, message, read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)
             RETURNING id, user_id, category_id, kind, title, message, read, created_at",
        )?
        .query_one(
            (user_id, category_id, kind.as_str(), title, message, created_at),
            map_notification_row,
        )?;

    Ok(notification)
}

/// Whether an unread budget warning already exists for this category within
/// the month window.
///
/// This existence check is what keeps the budget evaluator from spamming
/// one warning per transaction.
pub fn has_unread_budget_notification(
    user_id: UserId,
    category_id: CategoryId,
    window: MonthRange,
    connection: &Connection,
) -> Result<bool, Error> {
    let count: i64 = connection
        .prepare(
            "SELECT COUNT(id) FROM notification
             WHERE user_id = ?1 AND category_id = ?2 AND kind = ?3
               AND read = 0 AND created_at BETWEEN ?4 AND ?5",
        )?
        .query_one(
            (
                user_id,
                category_id,
                NotificationKind::BudgetExceeded.as_str(),
                window.start,
                window.end,
            ),
            |row| row.get(0),
        )?;

    Ok(count > 0)
}

/// Retrieve the user's notifications, newest first, capped at 50.
pub fn list_notifications(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Notification>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, kind, title, message, read, created_at
             FROM notification
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
        )?
        .query_map((user_id, LIST_LIMIT), map_notification_row)?
        .map(|notification_result| notification_result.map_err(Error::SqlError))
        .collect()
}

/// The number of unread notifications for the user.
pub fn unread_count(user_id: UserId, connection: &Connection) -> Result<u64, Error> {
    let count = connection
        .prepare("SELECT COUNT(id) FROM notification WHERE user_id = ?1 AND read = 0")?
        .query_one([user_id], |row| row.get::<_, i64>(0))?;

    Ok(count as u64)
}

/// Mark a single notification as read.
///
/// # Errors
/// Returns [Error::NotFound] if the notification does not exist for this
/// user.
pub fn mark_read(
    id: NotificationId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE notification SET read = 1 WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Mark all of the user's unread notifications as read.
pub fn mark_all_read(user_id: UserId, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE notification SET read = 1 WHERE user_id = ?1 AND read = 0",
        [user_id],
    )?;

    Ok(())
}

/// Delete a notification.
///
/// # Errors
/// Returns [Error::NotFound] if the notification does not exist for this
/// user.
pub fn delete_notification(
    id: NotificationId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM notification WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}
