//! Defines the category model and its database functions.

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{CategoryId, UserId},
    money::{amount_to_sql, optional_decimal_column},
};

/// Whether a category classifies money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    fn from_sql(text: &str, column: usize) -> Result<Self, rusqlite::Error> {
        match text {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column,
                Type::Text,
                format!("unknown category kind {other:?}").into(),
            )),
        }
    }
}

/// A label classifying transactions, optionally carrying a monthly budget
/// ceiling.
///
/// The budget is a static monthly ceiling, not a rolling window, and is only
/// meaningful for [CategoryKind::Expense] categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub kind: CategoryKind,
    pub budget: Option<Decimal>,
    pub user_id: UserId,
}

/// The fields needed to create a category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub kind: CategoryKind,
    pub budget: Option<Decimal>,
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                budget TEXT,
                user_id INTEGER NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Category].
pub(crate) fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let kind_text: String = row.get(2)?;

    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: CategoryKind::from_sql(&kind_text, 2)?,
        budget: optional_decimal_column(row, 3)?,
        user_id: row.get(4)?,
    })
}

fn validate(new_category: &NewCategory) -> Result<(), Error> {
    if new_category.name.trim().is_empty() {
        return Err(Error::EmptyTitle);
    }

    if new_category.budget.is_some_and(|budget| budget < Decimal::ZERO) {
        return Err(Error::InvalidBudget);
    }

    Ok(())
}

/// Create a new category for `user_id`.
///
/// # Errors
/// Returns [Error::EmptyTitle] if the name is blank, or
/// [Error::InvalidBudget] if a negative budget was given.
pub fn create_category(
    new_category: NewCategory,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    validate(&new_category)?;

    let category = connection
        .prepare(
            "INSERT INTO category (name, kind, budget, user_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, kind, budget, user_id",
        )?
        .query_one(
            (
                &new_category.name,
                new_category.kind.as_str(),
                new_category.budget.map(amount_to_sql),
                user_id,
            ),
            map_category_row,
        )?;

    Ok(category)
}

/// Update a category's name, kind, and budget ceiling.
///
/// # Errors
/// Returns [Error::CategoryNotFound] if the category does not exist for
/// this user.
pub fn update_category(
    id: CategoryId,
    new_fields: NewCategory,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    validate(&new_fields)?;

    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, kind = ?2, budget = ?3 WHERE id = ?4 AND user_id = ?5",
        (
            &new_fields.name,
            new_fields.kind.as_str(),
            new_fields.budget.map(amount_to_sql),
            id,
            user_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    Ok(())
}

/// Retrieve a category by its `id`, scoped to `user_id`.
///
/// # Errors
/// Returns [Error::CategoryNotFound] if `id` does not refer to a category
/// owned by this user.
pub fn get_category(
    id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, kind, budget, user_id FROM category
             WHERE id = ?1 AND user_id = ?2",
        )?
        .query_one((id, user_id), map_category_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
            error => error.into(),
        })
}

/// Retrieve all of a user's categories, ordered by name.
pub fn list_categories(user_id: UserId, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, kind, budget, user_id FROM category
             WHERE user_id = ?1 ORDER BY name ASC",
        )?
        .query_map([user_id], map_category_row)?
        .map(|category_result| category_result.map_err(Error::SqlError))
        .collect()
}

/// Delete a category.
///
/// # Errors
/// Returns [Error::CategoryInUse] if transactions or recurring bills still
/// reference the category, or [Error::CategoryNotFound] if it does not
/// exist for this user.
pub fn delete_category(
    id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            (id, user_id),
        )
        .map_err(|error| match Error::from(error) {
            Error::InvalidForeignKey => Error::CategoryInUse,
            error => error,
        })?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    Ok(())
}
