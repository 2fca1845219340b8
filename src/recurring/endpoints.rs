//! The HTTP handlers for the recurring bill routes.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{AppState, action_response::respond, auth::RequestUser, database_id::BillId};

use super::{
    NewRecurringBill, create_bill, delete_bill, list_bills, process_payment, update_bill,
};

/// A route handler for listing the user's recurring bills, soonest due
/// first.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn list_bills_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match list_bills(user_id, &connection) {
        Ok(bills) => Json(bills).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for creating a new recurring bill.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn create_bill_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Json(new_bill): Json<NewRecurringBill>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match create_bill(new_bill, user_id, &connection) {
        Ok(bill) => Json(bill).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for updating a recurring bill. The schedule restarts
/// from the new start date.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn update_bill_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(bill_id): Path<BillId>,
    Json(new_fields): Json<NewRecurringBill>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    respond(
        update_bill(bill_id, new_fields, user_id, &connection),
        "Bill updated.",
    )
}

/// A route handler for deleting a recurring bill.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn delete_bill_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(bill_id): Path<BillId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    respond(
        delete_bill(bill_id, user_id, &connection),
        "Bill deleted.",
    )
}

/// A route handler for paying a recurring bill now.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn pay_bill_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(bill_id): Path<BillId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = process_payment(bill_id, user_id, &connection);
    if result.is_ok() {
        state.stats_cache.invalidate_user(user_id);
    }

    respond(result, "Payment recorded.")
}
