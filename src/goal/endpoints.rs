//! The HTTP handlers for the savings goal routes.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    AppState,
    action_response::respond,
    auth::RequestUser,
    database_id::{GoalId, WalletId},
};

use super::{NewGoal, add_savings, create_goal, delete_goal, list_goals, update_goal};

/// A route handler for listing the user's savings goals.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn list_goals_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match list_goals(user_id, &connection) {
        Ok(goals) => Json(goals).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for creating a new savings goal.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn create_goal_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Json(new_goal): Json<NewGoal>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match create_goal(new_goal, user_id, &connection) {
        Ok(goal) => Json(goal).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for updating a goal's name, target, or deadline.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn update_goal_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(goal_id): Path<GoalId>,
    Json(new_fields): Json<NewGoal>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    respond(
        update_goal(goal_id, new_fields, user_id, &connection),
        "Goal updated.",
    )
}

/// A route handler for deleting a goal.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn delete_goal_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(goal_id): Path<GoalId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    // A deleted goal no longer counts towards the report's total saved.
    let result = delete_goal(goal_id, user_id, &connection);
    if result.is_ok() {
        state.stats_cache.invalidate_user(user_id);
    }

    respond(result, "Goal deleted.")
}

/// The body for a savings transfer.
#[derive(Debug, Deserialize)]
pub struct AddSavingsForm {
    pub wallet_id: WalletId,
    pub amount: Decimal,
}

/// A route handler for moving money from a wallet into a goal.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn add_savings_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(goal_id): Path<GoalId>,
    Json(form): Json<AddSavingsForm>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match add_savings(goal_id, form.wallet_id, form.amount, user_id, &connection) {
        Ok(goal) => {
            state.stats_cache.invalidate_user(user_id);
            Json(goal).into_response()
        }
        Err(error) => error.into_response(),
    }
}
