//! Defines the wallet model and its database functions.

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{UserId, WalletId},
    money::{amount_to_sql, decimal_column},
};

/// The kind of account a wallet represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletKind {
    Cash,
    Bank,
    CreditCard,
    EMoney,
}

impl WalletKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Bank => "BANK",
            Self::CreditCard => "CREDIT_CARD",
            Self::EMoney => "E_MONEY",
        }
    }

    fn from_sql(text: &str, column: usize) -> Result<Self, rusqlite::Error> {
        match text {
            "CASH" => Ok(Self::Cash),
            "BANK" => Ok(Self::Bank),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "E_MONEY" => Ok(Self::EMoney),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column,
                Type::Text,
                format!("unknown wallet kind {other:?}").into(),
            )),
        }
    }
}

/// A named balance-holding account.
///
/// A negative balance on a [WalletKind::CreditCard] wallet represents the
/// outstanding liability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wallet {
    pub id: WalletId,
    pub name: String,
    pub kind: WalletKind,
    pub balance: Decimal,
    pub user_id: UserId,
}

/// The fields needed to create a wallet.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWallet {
    pub name: String,
    pub kind: WalletKind,
    /// The opening balance. For credit cards this is the amount already
    /// spent, stored as a negative liability.
    pub initial_balance: Decimal,
}

/// Create the wallet table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_wallet_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS wallet (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                balance TEXT NOT NULL,
                user_id INTEGER NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_wallet_user ON wallet(user_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Wallet].
pub(crate) fn map_wallet_row(row: &Row) -> Result<Wallet, rusqlite::Error> {
    let kind_text: String = row.get(2)?;

    Ok(Wallet {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: WalletKind::from_sql(&kind_text, 2)?,
        balance: decimal_column(row, 3)?,
        user_id: row.get(4)?,
    })
}

/// Create a new wallet for `user_id`.
///
/// The opening balance of a credit card wallet is stored as a negative
/// liability regardless of the sign the caller supplied.
///
/// # Errors
/// Returns [Error::EmptyTitle] if the name is blank, or [Error::SqlError]
/// if there is an SQL error.
pub fn create_wallet(
    new_wallet: NewWallet,
    user_id: UserId,
    connection: &Connection,
) -> Result<Wallet, Error> {
    if new_wallet.name.trim().is_empty() {
        return Err(Error::EmptyTitle);
    }

    let balance = match new_wallet.kind {
        WalletKind::CreditCard => -new_wallet.initial_balance.abs(),
        _ => new_wallet.initial_balance,
    };

    let wallet = connection
        .prepare(
            "INSERT INTO wallet (name, kind, balance, user_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, kind, balance, user_id",
        )?
        .query_one(
            (
                &new_wallet.name,
                new_wallet.kind.as_str(),
                amount_to_sql(balance),
                user_id,
            ),
            map_wallet_row,
        )?;

    Ok(wallet)
}

/// Rename a wallet or change its kind. The balance is not touched, since
/// balances move only through transactions and the savings engine.
///
/// # Errors
/// Returns [Error::WalletNotFound] if the wallet does not exist for this
/// user.
pub fn update_wallet(
    id: WalletId,
    name: &str,
    kind: WalletKind,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(Error::EmptyTitle);
    }

    let rows_affected = connection.execute(
        "UPDATE wallet SET name = ?1, kind = ?2 WHERE id = ?3 AND user_id = ?4",
        (name, kind.as_str(), id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::WalletNotFound);
    }

    Ok(())
}

/// Retrieve a wallet by its `id`, scoped to `user_id`.
///
/// # Errors
/// Returns [Error::WalletNotFound] if `id` does not refer to a wallet owned
/// by this user.
pub fn get_wallet(
    id: WalletId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Wallet, Error> {
    connection
        .prepare("SELECT id, name, kind, balance, user_id FROM wallet WHERE id = ?1 AND user_id = ?2")?
        .query_one((id, user_id), map_wallet_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::WalletNotFound,
            error => error.into(),
        })
}

/// Retrieve all of a user's wallets, ordered by name.
pub fn list_wallets(user_id: UserId, connection: &Connection) -> Result<Vec<Wallet>, Error> {
    connection
        .prepare(
            "SELECT id, name, kind, balance, user_id FROM wallet
             WHERE user_id = ?1 ORDER BY name ASC",
        )?
        .query_map([user_id], map_wallet_row)?
        .map(|wallet_result| wallet_result.map_err(Error::SqlError))
        .collect()
}

/// Delete a wallet.
///
/// # Errors
/// Returns [Error::WalletInUse] if transactions or recurring bills still
/// reference the wallet, or [Error::WalletNotFound] if it does not exist
/// for this user.
pub fn delete_wallet(
    id: WalletId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "DELETE FROM wallet WHERE id = ?1 AND user_id = ?2",
            (id, user_id),
        )
        .map_err(|error| match Error::from(error) {
            Error::InvalidForeignKey => Error::WalletInUse,
            error => error,
        })?;

    if rows_affected == 0 {
        return Err(Error::WalletNotFound);
    }

    Ok(())
}

/// Apply `delta` to a wallet's balance inside the caller's store
/// transaction.
///
/// Callers must only invoke this from within a [rusqlite::Transaction] so
/// that the balance change commits or rolls back together with the rest of
/// the mutation. Balances are allowed to go negative; overdraft policy is
/// out of scope for this version.
///
/// # Errors
/// Returns [Error::WalletNotFound] if the wallet does not exist for this
/// user.
pub(crate) fn adjust_balance(
    connection: &Connection,
    wallet_id: WalletId,
    user_id: UserId,
    delta: Decimal,
) -> Result<(), Error> {
    let balance: Decimal = connection
        .prepare("SELECT balance FROM wallet WHERE id = ?1 AND user_id = ?2")?
        .query_one((wallet_id, user_id), |row| decimal_column(row, 0))
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::WalletNotFound,
            error => error.into(),
        })?;

    connection.execute(
        "UPDATE wallet SET balance = ?1 WHERE id = ?2 AND user_id = ?3",
        (amount_to_sql(balance + delta), wallet_id, user_id),
    )?;

    Ok(())
}
