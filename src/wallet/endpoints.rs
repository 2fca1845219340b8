//! The HTTP handlers for the wallet routes.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState,
    action_response::respond,
    auth::RequestUser,
    database_id::WalletId,
};

use super::{NewWallet, WalletKind, create_wallet, delete_wallet, list_wallets, update_wallet};

/// A route handler for listing the user's wallets.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn list_wallets_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match list_wallets(user_id, &connection) {
        Ok(wallets) => Json(wallets).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for creating a new wallet.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn create_wallet_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Json(new_wallet): Json<NewWallet>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match create_wallet(new_wallet, user_id, &connection) {
        Ok(wallet) => {
            state.stats_cache.invalidate_user(user_id);
            Json(wallet).into_response()
        }
        Err(error) => error.into_response(),
    }
}

/// The fields a wallet update may change. The balance is deliberately not
/// editable here.
#[derive(Debug, Deserialize)]
pub struct UpdateWalletForm {
    pub name: String,
    pub kind: WalletKind,
}

/// A route handler for renaming a wallet or changing its kind.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn update_wallet_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(wallet_id): Path<WalletId>,
    Json(form): Json<UpdateWalletForm>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    respond(
        update_wallet(wallet_id, &form.name, form.kind, user_id, &connection),
        "Wallet updated.",
    )
}

/// A route handler for deleting a wallet.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn delete_wallet_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Path(wallet_id): Path<WalletId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    let result = delete_wallet(wallet_id, user_id, &connection);
    if result.is_ok() {
        state.stats_cache.invalidate_user(user_id);
    }

    respond(result, "Wallet deleted.")
}
