//! Defines the core transaction model and database functions.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    budget::check_budget_and_notify,
    category::{CategoryKind, get_category},
    database_id::{CategoryId, TransactionId, UserId, WalletId},
    money::{amount_to_sql, decimal_column},
    wallet::adjust_balance,
};

/// A single money movement: an income, an expense, or a transfer between
/// two wallets.
///
/// A transaction with `to_wallet_id` set is a transfer and is excluded from
/// all income/expense aggregation. Deleting a transaction does not reverse
/// the wallet balances it touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    pub amount: Decimal,
    pub date: Date,
    /// The source wallet.
    pub wallet_id: WalletId,
    /// The destination wallet, present only for transfers.
    pub to_wallet_id: Option<WalletId>,
    pub category_id: Option<CategoryId>,
    pub user_id: UserId,
}

/// The fields needed to record a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub title: String,
    pub amount: Decimal,
    pub date: Date,
    pub wallet_id: WalletId,
    pub to_wallet_id: Option<WalletId>,
    pub category_id: Option<CategoryId>,
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount TEXT NOT NULL,
                date TEXT NOT NULL,
                wallet_id INTEGER NOT NULL,
                to_wallet_id INTEGER,
                category_id INTEGER,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(wallet_id) REFERENCES wallet(id),
                FOREIGN KEY(to_wallet_id) REFERENCES wallet(id),
                FOREIGN KEY(category_id) REFERENCES category(id)
                )",
        (),
    )?;

    // Composite index used by the query engine and the month windows.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date
         ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: decimal_column(row, 2)?,
        date: row.get(3)?,
        wallet_id: row.get(4)?,
        to_wallet_id: row.get(5)?,
        category_id: row.get(6)?,
        user_id: row.get(7)?,
    })
}

/// Insert a transaction row without touching wallet balances.
///
/// This is the raw insert shared by [create_transaction] and the recurring
/// bill engine, which apply their balance changes separately within the
/// same store transaction.
pub(crate) fn insert_transaction(
    connection: &Connection,
    new_transaction: &NewTransaction,
    user_id: UserId,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (title, amount, date, wallet_id, to_wallet_id, category_id, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, title, amount, date, wallet_id, to_wallet_id, category_id, user_id",
        )?
        .query_one(
            (
                &new_transaction.title,
                amount_to_sql(new_transaction.amount),
                new_transaction.date,
                new_transaction.wallet_id,
                new_transaction.to_wallet_id,
                new_transaction.category_id,
                user_id,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Record a new transaction and apply its wallet balance change as one
/// atomic unit.
///
/// Expenses debit the source wallet, income credits it, and transfers move
/// the amount from the source wallet to the destination wallet. After the
/// unit commits, the budget evaluator runs as a best-effort side effect for
/// expense categories.
///
/// # Errors
/// Returns a:
/// - [Error::EmptyTitle] if the title is blank,
/// - [Error::InvalidAmount] if the amount is not strictly positive,
/// - [Error::MissingCategory] if a non-transfer transaction has no category,
/// - [Error::WalletNotFound] or [Error::CategoryNotFound] if a referenced
///   record does not exist for this user.
pub fn create_transaction(
    new_transaction: NewTransaction,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if new_transaction.title.trim().is_empty() {
        return Err(Error::EmptyTitle);
    }

    if new_transaction.amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount);
    }

    if new_transaction.to_wallet_id.is_none() && new_transaction.category_id.is_none() {
        return Err(Error::MissingCategory);
    }

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let transaction = insert_transaction(&sql_transaction, &new_transaction, user_id)?;

    match new_transaction.to_wallet_id {
        Some(to_wallet_id) => {
            adjust_balance(
                &sql_transaction,
                new_transaction.wallet_id,
                user_id,
                -new_transaction.amount,
            )?;
            adjust_balance(
                &sql_transaction,
                to_wallet_id,
                user_id,
                new_transaction.amount,
            )?;
        }
        None => {
            let category_id = new_transaction
                .category_id
                .expect("checked above that non-transfers carry a category");
            let category = get_category(category_id, user_id, &sql_transaction)?;

            let delta = match category.kind {
                CategoryKind::Expense => -new_transaction.amount,
                CategoryKind::Income => new_transaction.amount,
            };
            adjust_balance(&sql_transaction, new_transaction.wallet_id, user_id, delta)?;
        }
    }

    sql_transaction.commit()?;

    if let (Some(category_id), None) = (transaction.category_id, transaction.to_wallet_id) {
        check_budget_and_notify(user_id, category_id, transaction.date, connection);
    }

    Ok(transaction)
}

/// Update a transaction's fields, re-basing the wallet balances it touched
/// as one atomic unit.
///
/// The previous movement is undone first (a transfer is moved back, an
/// expense is refunded, an income is withdrawn), then the new movement is
/// applied with the same rules as [create_transaction]. After the unit
/// commits, the budget evaluator runs as a best-effort side effect for
/// expense categories.
///
/// # Errors
/// Returns a:
/// - [Error::EmptyTitle] if the new title is blank,
/// - [Error::InvalidAmount] if the new amount is not strictly positive,
/// - [Error::MissingCategory] if a non-transfer transaction has no category,
/// - [Error::NotFound] if the transaction does not exist for this user,
/// - [Error::WalletNotFound] or [Error::CategoryNotFound] if a referenced
///   record does not exist for this user.
pub fn update_transaction(
    id: TransactionId,
    new_fields: NewTransaction,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if new_fields.title.trim().is_empty() {
        return Err(Error::EmptyTitle);
    }

    if new_fields.amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount);
    }

    if new_fields.to_wallet_id.is_none() && new_fields.category_id.is_none() {
        return Err(Error::MissingCategory);
    }

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let old = sql_transaction
        .prepare(
            "SELECT id, title, amount, date, wallet_id, to_wallet_id, category_id, user_id
             FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        )?
        .query_one((id, user_id), map_transaction_row)?;

    // Undo the old movement.
    match old.to_wallet_id {
        Some(to_wallet_id) => {
            adjust_balance(&sql_transaction, old.wallet_id, user_id, old.amount)?;
            adjust_balance(&sql_transaction, to_wallet_id, user_id, -old.amount)?;
        }
        None => {
            if let Some(category_id) = old.category_id {
                let category = get_category(category_id, user_id, &sql_transaction)?;

                let delta = match category.kind {
                    CategoryKind::Expense => old.amount,
                    CategoryKind::Income => -old.amount,
                };
                adjust_balance(&sql_transaction, old.wallet_id, user_id, delta)?;
            }
        }
    }

    // Apply the new movement.
    match new_fields.to_wallet_id {
        Some(to_wallet_id) => {
            adjust_balance(
                &sql_transaction,
                new_fields.wallet_id,
                user_id,
                -new_fields.amount,
            )?;
            adjust_balance(&sql_transaction, to_wallet_id, user_id, new_fields.amount)?;
        }
        None => {
            let category_id = new_fields
                .category_id
                .expect("checked above that non-transfers carry a category");
            let category = get_category(category_id, user_id, &sql_transaction)?;

            let delta = match category.kind {
                CategoryKind::Expense => -new_fields.amount,
                CategoryKind::Income => new_fields.amount,
            };
            adjust_balance(&sql_transaction, new_fields.wallet_id, user_id, delta)?;
        }
    }

    let transaction = sql_transaction
        .prepare(
            "UPDATE \"transaction\"
             SET title = ?1, amount = ?2, date = ?3, wallet_id = ?4, to_wallet_id = ?5, category_id = ?6
             WHERE id = ?7 AND user_id = ?8
             RETURNING id, title, amount, date, wallet_id, to_wallet_id, category_id, user_id",
        )?
        .query_one(
            (
                &new_fields.title,
                amount_to_sql(new_fields.amount),
                new_fields.date,
                new_fields.wallet_id,
                new_fields.to_wallet_id,
                new_fields.category_id,
                id,
                user_id,
            ),
            map_transaction_row,
        )?;

    sql_transaction.commit()?;

    if let (Some(category_id), None) = (transaction.category_id, transaction.to_wallet_id) {
        check_budget_and_notify(user_id, category_id, transaction.date, connection);
    }

    Ok(transaction)
}

/// Delete a transaction by its `id`.
///
/// Wallet balances are deliberately not compensated; there is no
/// reversing-transaction logic in this version.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist for this
/// user.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}
