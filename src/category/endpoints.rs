//! The HTTP handlers for the category routes.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{AppState, action_response::respond, auth::RequestUser, database_id::CategoryId};

use super::{NewCategory, create_category, delete_category, list_categories, update_category};

/// A route handler for listing the user's categories.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn list_categories_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match list_categories(user_id, &connection) {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for creating a new category.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn create_category_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Json(new_category): Json<NewCategory>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match create_category(new_category, user_id, &connection) {
        Ok(category) => Json(category).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for updating a category's name, kind, or budget.
///
/// Changing a budget shifts what counts as over budget, so the cached
/// monthly stats are dropped.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn update_category_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(category_id): Path<CategoryId>,
    Json(new_fields): Json<NewCategory>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = update_category(category_id, new_fields, user_id, &connection);
    if result.is_ok() {
        state.stats_cache.invalidate_user(user_id);
    }

    respond(result, "Category updated.")
}

/// A route handler for deleting a category.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn delete_category_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(category_id): Path<CategoryId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = delete_category(category_id, user_id, &connection);
    if result.is_ok() {
        state.stats_cache.invalidate_user(user_id);
    }

    respond(result, "Category deleted.")
}
