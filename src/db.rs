//! Database initialization.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, category::create_category_table, goal::create_goal_table,
    notification::create_notification_table, recurring::create_recurring_bill_table,
    transaction::create_transaction_table, wallet::create_wallet_table,
};

/// Create the application's tables in the database.
///
/// Also turns on foreign key enforcement for the connection, which SQLite
/// leaves off by default.
///
/// Existing tables are left untouched, so calling this on an already
/// initialized database is a no-op.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    // Referenced tables must exist before the tables that point at them.
    create_wallet_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_recurring_bill_table(&transaction)?;
    create_goal_table(&transaction)?;
    create_notification_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
