//! The HTTP handlers for the transaction routes.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState,
    action_response::respond,
    auth::RequestUser,
    category::CategoryKind,
    database_id::{CategoryId, TransactionId, WalletId},
    month::YearMonth,
};

use super::{
    NewTransaction, TransactionFilter, create_transaction, delete_transaction, query_transactions,
    update_transaction,
};

/// The query string parameters for the transaction list.
///
/// Absent parameters leave their filter off; an explicit empty string is
/// treated the same as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsParams {
    pub q: Option<String>,
    /// A calendar month in the `YYYY-MM` form.
    pub month: Option<String>,
    pub kind: Option<CategoryKind>,
    pub category_id: Option<CategoryId>,
    pub wallet_id: Option<WalletId>,
    pub page: Option<u64>,
}

/// A route handler for listing one page of the user's transactions.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Query(params): Query<ListTransactionsParams>,
) -> Response {
    let month = match &params.month {
        Some(text) if !text.is_empty() => match YearMonth::from_str(text) {
            Ok(month) => Some(month),
            Err(error) => return error.into_response(),
        },
        _ => None,
    };

    let filter = TransactionFilter {
        q: params.q.filter(|q| !q.is_empty()),
        month,
        kind: params.kind,
        category_id: params.category_id,
        wallet_id: params.wallet_id,
    };
    let page = params.page.unwrap_or(state.pagination_config.default_page);

    let connection = state.db_connection.lock().unwrap();

    match query_transactions(
        user_id,
        &filter,
        page,
        state.pagination_config.page_size,
        &connection,
    ) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for recording a new transaction.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Json(new_transaction): Json<NewTransaction>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match create_transaction(new_transaction, user_id, &connection) {
        Ok(transaction) => {
            state.stats_cache.invalidate_user(user_id);
            Json(transaction).into_response()
        }
        Err(error) => error.into_response(),
    }
}

/// A route handler for updating a transaction.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn update_transaction_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(transaction_id): Path<TransactionId>,
    Json(new_fields): Json<NewTransaction>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match update_transaction(transaction_id, new_fields, user_id, &connection) {
        Ok(transaction) => {
            state.stats_cache.invalidate_user(user_id);
            Json(transaction).into_response()
        }
        Err(error) => error.into_response(),
    }
}

/// A route handler for deleting a transaction.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = delete_transaction(transaction_id, user_id, &connection);
    if result.is_ok() {
        state.stats_cache.invalidate_user(user_id);
    }

    respond(result, "Transaction deleted.")
}
