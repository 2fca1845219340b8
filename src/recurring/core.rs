//! Defines the recurring bill model and its database functions.

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{BillId, CategoryId, UserId, WalletId},
    money::{amount_to_sql, decimal_column},
};

/// How often a recurring bill comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    fn from_sql(text: &str, column: usize) -> Result<Self, rusqlite::Error> {
        match text {
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column,
                Type::Text,
                format!("unknown frequency {other:?}").into(),
            )),
        }
    }
}

/// A scheduled, user-triggered repeating payment template.
///
/// `next_date` is the next scheduled charge and is only ever mutated by the
/// payment engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringBill {
    pub id: BillId,
    pub name: String,
    pub amount: Decimal,
    pub frequency: Frequency,
    pub start_date: Date,
    pub next_date: Date,
    pub wallet_id: WalletId,
    /// Required for payment processing; a bill without a category cannot be
    /// paid.
    pub category_id: Option<CategoryId>,
    pub user_id: UserId,
}

/// The fields needed to create or update a recurring bill.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecurringBill {
    pub name: String,
    pub amount: Decimal,
    pub frequency: Frequency,
    pub start_date: Date,
    pub wallet_id: WalletId,
    pub category_id: Option<CategoryId>,
}

/// Create the recurring bill table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_recurring_bill_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurring_bill (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                amount TEXT NOT NULL,
                frequency TEXT NOT NULL,
                start_date TEXT NOT NULL,
                next_date TEXT NOT NULL,
                wallet_id INTEGER NOT NULL,
                category_id INTEGER,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(wallet_id) REFERENCES wallet(id),
                FOREIGN KEY(category_id) REFERENCES category(id)
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_recurring_bill_user ON recurring_bill(user_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [RecurringBill].
pub(crate) fn map_bill_row(row: &Row) -> Result<RecurringBill, rusqlite::Error> {
    let frequency_text: String = row.get(3)?;

    Ok(RecurringBill {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: decimal_column(row, 2)?,
        frequency: Frequency::from_sql(&frequency_text, 3)?,
        start_date: row.get(4)?,
        next_date: row.get(5)?,
        wallet_id: row.get(6)?,
        category_id: row.get(7)?,
        user_id: row.get(8)?,
    })
}

fn validate(new_bill: &NewRecurringBill) -> Result<(), Error> {
    if new_bill.name.trim().is_empty() {
        return Err(Error::EmptyTitle);
    }

    if new_bill.amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount);
    }

    Ok(())
}

/// Create a new recurring bill. The first charge is scheduled for the start
/// date.
///
/// # Errors
/// Returns a validation error for a blank name or non-positive amount, or
/// [Error::InvalidForeignKey] if the wallet or category does not exist.
pub fn create_bill(
    new_bill: NewRecurringBill,
    user_id: UserId,
    connection: &Connection,
) -> Result<RecurringBill, Error> {
    validate(&new_bill)?;

    let bill = connection
        .prepare(
            "INSERT INTO recurring_bill
                (name, amount, frequency, start_date, next_date, wallet_id, category_id, user_id)
             VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6, ?7)
             RETURNING id, name, amount, frequency, start_date, next_date,
                       wallet_id, category_id, user_id",
        )?
        .query_one(
            (
                &new_bill.name,
                amount_to_sql(new_bill.amount),
                new_bill.frequency.as_str(),
                new_bill.start_date,
                new_bill.wallet_id,
                new_bill.category_id,
                user_id,
            ),
            map_bill_row,
        )?;

    Ok(bill)
}

/// Update a bill's template fields, rescheduling the next charge to the new
/// start date.
///
/// # Errors
/// Returns [Error::BillNotFound] if the bill does not exist for this user.
pub fn update_bill(
    id: BillId,
    new_fields: NewRecurringBill,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    validate(&new_fields)?;

    let rows_affected = connection.execute(
        "UPDATE recurring_bill
         SET name = ?1, amount = ?2, frequency = ?3, start_date = ?4, next_date = ?4,
             wallet_id = ?5, category_id = ?6
         WHERE id = ?7 AND user_id = ?8",
        (
            &new_fields.name,
            amount_to_sql(new_fields.amount),
            new_fields.frequency.as_str(),
            new_fields.start_date,
            new_fields.wallet_id,
            new_fields.category_id,
            id,
            user_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::BillNotFound);
    }

    Ok(())
}

/// Retrieve a bill by its `id`, scoped to `user_id`.
///
/// # Errors
/// Returns [Error::BillNotFound] if `id` does not refer to a bill owned by
/// this user.
pub fn get_bill(id: BillId, user_id: UserId, connection: &Connection) -> Result<RecurringBill, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, frequency, start_date, next_date,
                    wallet_id, category_id, user_id
             FROM recurring_bill WHERE id = ?1 AND user_id = ?2",
        )?
        .query_one((id, user_id), map_bill_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::BillNotFound,
            error => error.into(),
        })
}

/// Retrieve all of a user's bills, soonest due first.
pub fn list_bills(user_id: UserId, connection: &Connection) -> Result<Vec<RecurringBill>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, frequency, start_date, next_date,
                    wallet_id, category_id, user_id
             FROM recurring_bill WHERE user_id = ?1 ORDER BY next_date ASC, id ASC",
        )?
        .query_map([user_id], map_bill_row)?
        .map(|bill_result| bill_result.map_err(Error::SqlError))
        .collect()
}

/// Delete a recurring bill. Past payments are ordinary transactions and are
/// unaffected.
///
/// # Errors
/// Returns [Error::BillNotFound] if the bill does not exist for this user.
pub fn delete_bill(id: BillId, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM recurring_bill WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::BillNotFound);
    }

    Ok(())
}
