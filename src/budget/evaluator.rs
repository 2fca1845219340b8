//! The budget evaluator.
//!
//! Runs after an expense transaction is persisted and decides whether the
//! month's cumulative spend in that category warrants a warning. The check
//! is one-directional (no "back under budget" notification) and idempotent
//! within a calendar month: at most one unread warning per
//! (user, category, month).

use rusqlite::Connection;
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    category::{CategoryKind, get_category},
    database_id::{CategoryId, UserId},
    money::decimal_column,
    month::MonthRange,
    notification::{
        Notification, NotificationKind, has_unread_budget_notification, insert_notification,
    },
};

/// Evaluate the monthly budget for a category after a transaction on
/// `transaction_date` was persisted.
///
/// No-ops when the category is missing, is an income category, or carries
/// no budget. Returns the created notification, if any.
///
/// # Errors
/// Returns [Error::SqlError] if a query fails. Callers on the
/// transaction-creation path should use [check_budget_and_notify] instead,
/// which swallows errors.
pub fn evaluate_budget(
    user_id: UserId,
    category_id: CategoryId,
    transaction_date: Date,
    connection: &Connection,
) -> Result<Option<Notification>, Error> {
    let category = match get_category(category_id, user_id, connection) {
        Ok(category) => category,
        Err(Error::CategoryNotFound) => return Ok(None),
        Err(error) => return Err(error),
    };

    let budget = match (category.kind, category.budget) {
        (CategoryKind::Income, _) | (_, None) => return Ok(None),
        (CategoryKind::Expense, Some(budget)) if budget == Decimal::ZERO => return Ok(None),
        (CategoryKind::Expense, Some(budget)) => budget,
    };

    let window = MonthRange::containing(transaction_date);
    let spent = monthly_category_spend(user_id, category_id, window, connection)?;

    if spent <= budget {
        return Ok(None);
    }

    if has_unread_budget_notification(user_id, category_id, window, connection)? {
        return Ok(None);
    }

    // The overage is a snapshot taken at creation time, not recomputed later.
    let overage = spent - budget;
    let notification = insert_notification(
        user_id,
        Some(category_id),
        NotificationKind::BudgetExceeded,
        &format!("Budget exceeded: {}", category.name),
        &format!(
            "Spending on {} is over its monthly budget of {} by {}.",
            category.name, budget, overage
        ),
        transaction_date,
        connection,
    )?;

    Ok(Some(notification))
}

/// Best-effort wrapper around [evaluate_budget] for the transaction
/// creation and bill payment paths.
///
/// The notification is a side effect, not part of the financial write's
/// atomicity guarantee, so failures are logged and swallowed.
pub fn check_budget_and_notify(
    user_id: UserId,
    category_id: CategoryId,
    transaction_date: Date,
    connection: &Connection,
) {
    if let Err(error) = evaluate_budget(user_id, category_id, transaction_date, connection) {
        tracing::warn!(
            "budget evaluation failed for category {category_id}: {error}"
        );
    }
}

/// Sum the user's non-transfer spend in a category over the month window.
///
/// Amounts are summed in application code so the decimal arithmetic matches
/// the rest of the system exactly.
fn monthly_category_spend(
    user_id: UserId,
    category_id: CategoryId,
    window: MonthRange,
    connection: &Connection,
) -> Result<Decimal, Error> {
    let amounts = connection
        .prepare(
            "SELECT amount FROM \"transaction\"
             WHERE user_id = ?1 AND category_id = ?2 AND to_wallet_id IS NULL
               AND date BETWEEN ?3 AND ?4",
        )?
        .query_map(
            (user_id, category_id, window.start, window.end),
            |row| decimal_column(row, 0),
        )?
        .collect::<Result<Vec<Decimal>, rusqlite::Error>>()?;

    Ok(amounts.into_iter().sum())
}
