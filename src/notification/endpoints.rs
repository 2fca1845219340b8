//! The HTTP handlers for the notification routes.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{AppState, action_response::respond, auth::RequestUser, database_id::NotificationId};

use super::{delete_notification, list_notifications, mark_all_read, mark_read, unread_count};

/// A route handler for listing the user's notifications, newest first.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn list_notifications_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match list_notifications(user_id, &connection) {
        Ok(notifications) => Json(notifications).into_response(),
        Err(error) => error.into_response(),
    }
}

#[derive(Debug, Serialize)]
struct UnreadCount {
    count: u64,
}

/// A route handler for the number of unread notifications, e.g. for a
/// badge.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn unread_count_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match unread_count(user_id, &connection) {
        Ok(count) => Json(UnreadCount { count }).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for marking one notification as read.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn mark_read_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(notification_id): Path<NotificationId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    respond(
        mark_read(notification_id, user_id, &connection),
        "Notification marked as read.",
    )
}

/// A route handler for marking all of the user's notifications as read.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn mark_all_read_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    respond(
        mark_all_read(user_id, &connection),
        "All notifications marked as read.",
    )
}

/// A route handler for deleting a notification.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn delete_notification_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(notification_id): Path<NotificationId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    respond(
        delete_notification(notification_id, user_id, &connection),
        "Notification deleted.",
    )
}
