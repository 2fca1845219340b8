//! The savings goal model, its persistence, and the savings transfer
//! engine.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{GoalId, UserId, WalletId},
    money::{amount_to_sql, decimal_column},
    wallet::adjust_balance,
};

/// A savings target the user is putting money aside for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Decimal,
    /// How much has been put aside so far. Grows only through
    /// [add_savings].
    pub current_amount: Decimal,
    pub deadline: Option<Date>,
    pub user_id: UserId,
}

/// The data needed to create a new savings goal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: Option<Date>,
}

/// Create the goal table in the database.
///
/// # Errors
/// Returns an error if the table already exists or if there is an SQL
/// error.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            target_amount TEXT NOT NULL,
            current_amount TEXT NOT NULL,
            deadline TEXT,
            user_id INTEGER NOT NULL
        )",
        (),
    )?;

    connection.execute("CREATE INDEX IF NOT EXISTS idx_goal_user ON goal(user_id)", ())?;

    Ok(())
}

pub(crate) fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    Ok(Goal {
        id: row.get(0)?,
        name: row.get(1)?,
        target_amount: decimal_column(row, 2)?,
        current_amount: decimal_column(row, 3)?,
        deadline: row.get(4)?,
        user_id: row.get(5)?,
    })
}

fn validate(name: &str, target_amount: Decimal) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(Error::EmptyTitle);
    }

    if target_amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount);
    }

    Ok(())
}

/// Create a new savings goal. The saved amount starts at zero.
///
/// # Errors
/// Returns [Error::EmptyTitle] if the name is blank, or
/// [Error::InvalidAmount] if the target is not strictly positive.
pub fn create_goal(
    new_goal: NewGoal,
    user_id: UserId,
    connection: &Connection,
) -> Result<Goal, Error> {
    validate(&new_goal.name, new_goal.target_amount)?;

    let goal = connection
        .prepare(
            "INSERT INTO goal (name, target_amount, current_amount, deadline, user_id)
             VALUES (?1, ?2, '0', ?3, ?4)
             RETURNING id, name, target_amount, current_amount, deadline, user_id",
        )?
        .query_one(
            (
                &new_goal.name,
                amount_to_sql(new_goal.target_amount),
                new_goal.deadline,
                user_id,
            ),
            map_goal_row,
        )?;

    Ok(goal)
}

/// Update a goal's name, target, or deadline. The saved amount is not
/// touched, since it moves only through [add_savings].
///
/// # Errors
/// Returns [Error::GoalNotFound] if the goal does not exist for this user.
pub fn update_goal(
    id: GoalId,
    new_goal: NewGoal,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    validate(&new_goal.name, new_goal.target_amount)?;

    let rows_affected = connection.execute(
        "UPDATE goal SET name = ?1, target_amount = ?2, deadline = ?3
         WHERE id = ?4 AND user_id = ?5",
        (
            &new_goal.name,
            amount_to_sql(new_goal.target_amount),
            new_goal.deadline,
            id,
            user_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::GoalNotFound);
    }

    Ok(())
}

/// Retrieve the goal with `id`.
///
/// # Errors
/// Returns [Error::GoalNotFound] if the goal does not exist for this user.
pub fn get_goal(id: GoalId, user_id: UserId, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(
            "SELECT id, name, target_amount, current_amount, deadline, user_id
             FROM goal WHERE id = ?1 AND user_id = ?2",
        )?
        .query_one((id, user_id), map_goal_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::GoalNotFound,
            error => error.into(),
        })
}

/// Retrieve all of the user's goals, nearest deadline first and open-ended
/// goals last.
pub fn list_goals(user_id: UserId, connection: &Connection) -> Result<Vec<Goal>, Error> {
    let goals = connection
        .prepare(
            "SELECT id, name, target_amount, current_amount, deadline, user_id
             FROM goal WHERE user_id = ?1
             ORDER BY deadline IS NULL, deadline ASC, id ASC",
        )?
        .query_map((user_id,), map_goal_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(goals)
}

/// Delete the goal with `id`. Money already transferred to the goal is not
/// returned to any wallet.
///
/// # Errors
/// Returns [Error::GoalNotFound] if the goal does not exist for this user.
pub fn delete_goal(id: GoalId, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM goal WHERE id = ?1 AND user_id = ?2",
        (id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::GoalNotFound);
    }

    Ok(())
}

/// Move `amount` from a wallet into a goal's saved amount.
///
/// The wallet debit and the goal credit commit together or not at all, so
/// the total money across the two never changes partway. There is no
/// overdraft check; wallets may go negative.
///
/// # Errors
/// Returns a:
/// - [Error::InvalidAmount] if the amount is not strictly positive
///   (rejected before any mutation),
/// - [Error::WalletNotFound] or [Error::GoalNotFound] if either side does
///   not exist for this user.
pub fn add_savings(
    goal_id: GoalId,
    wallet_id: WalletId,
    amount: Decimal,
    user_id: UserId,
    connection: &Connection,
) -> Result<Goal, Error> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount);
    }

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    adjust_balance(&sql_transaction, wallet_id, user_id, -amount)?;

    let current_amount: Decimal = sql_transaction
        .prepare("SELECT current_amount FROM goal WHERE id = ?1 AND user_id = ?2")?
        .query_one((goal_id, user_id), |row| decimal_column(row, 0))
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::GoalNotFound,
            error => error.into(),
        })?;

    sql_transaction.execute(
        "UPDATE goal SET current_amount = ?1 WHERE id = ?2 AND user_id = ?3",
        (amount_to_sql(current_amount + amount), goal_id, user_id),
    )?;

    sql_transaction.commit()?;

    get_goal(goal_id, user_id, connection)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        wallet::{NewWallet, WalletKind, create_wallet, get_wallet},
    };

    use super::{Goal, NewGoal, add_savings, create_goal, delete_goal, get_goal, list_goals};

    const USER: i64 = 1;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn test_goal(connection: &Connection, name: &str) -> Goal {
        create_goal(
            NewGoal {
                name: name.to_owned(),
                target_amount: dec!(5000),
                deadline: None,
            },
            USER,
            connection,
        )
        .unwrap()
    }

    fn test_wallet(connection: &Connection) -> crate::wallet::Wallet {
        create_wallet(
            NewWallet {
                name: "Bank".to_owned(),
                kind: WalletKind::Bank,
                initial_balance: dec!(1000),
            },
            USER,
            connection,
        )
        .unwrap()
    }

    #[test]
    fn new_goal_starts_empty() {
        let connection = get_test_connection();

        let goal = test_goal(&connection, "House deposit");

        assert_eq!(goal.current_amount, dec!(0));
        assert_eq!(goal.target_amount, dec!(5000));
    }

    #[test]
    fn rejects_non_positive_target() {
        let connection = get_test_connection();

        let got = create_goal(
            NewGoal {
                name: "Nothing".to_owned(),
                target_amount: dec!(0),
                deadline: None,
            },
            USER,
            &connection,
        );

        assert_eq!(got, Err(Error::InvalidAmount));
    }

    #[test]
    fn savings_move_money_from_wallet_to_goal() {
        let connection = get_test_connection();
        let wallet = test_wallet(&connection);
        let goal = test_goal(&connection, "House deposit");

        let got = add_savings(goal.id, wallet.id, dec!(250.50), USER, &connection).unwrap();

        assert_eq!(got.current_amount, dec!(250.50));
        let wallet = get_wallet(wallet.id, USER, &connection).unwrap();
        assert_eq!(wallet.balance, dec!(749.50));
        // The total across both sides is conserved.
        assert_eq!(wallet.balance + got.current_amount, dec!(1000));
    }

    #[test]
    fn rejects_non_positive_savings_amount() {
        let connection = get_test_connection();
        let wallet = test_wallet(&connection);
        let goal = test_goal(&connection, "House deposit");

        assert_eq!(
            add_savings(goal.id, wallet.id, dec!(0), USER, &connection),
            Err(Error::InvalidAmount)
        );
        assert_eq!(
            add_savings(goal.id, wallet.id, dec!(-5), USER, &connection),
            Err(Error::InvalidAmount)
        );

        let wallet = get_wallet(wallet.id, USER, &connection).unwrap();
        assert_eq!(wallet.balance, dec!(1000));
    }

    #[test]
    fn missing_goal_rolls_back_the_wallet_debit() {
        let connection = get_test_connection();
        let wallet = test_wallet(&connection);

        let got = add_savings(42, wallet.id, dec!(100), USER, &connection);

        assert_eq!(got, Err(Error::GoalNotFound));
        let wallet = get_wallet(wallet.id, USER, &connection).unwrap();
        assert_eq!(wallet.balance, dec!(1000));
    }

    #[test]
    fn missing_wallet_leaves_the_goal_unchanged() {
        let connection = get_test_connection();
        let goal = test_goal(&connection, "House deposit");

        let got = add_savings(goal.id, 42, dec!(100), USER, &connection);

        assert_eq!(got, Err(Error::WalletNotFound));
        let goal = get_goal(goal.id, USER, &connection).unwrap();
        assert_eq!(goal.current_amount, dec!(0));
    }

    #[test]
    fn goals_are_ordered_by_deadline_with_open_ended_last() {
        let connection = get_test_connection();
        create_goal(
            NewGoal {
                name: "Open ended".to_owned(),
                target_amount: dec!(100),
                deadline: None,
            },
            USER,
            &connection,
        )
        .unwrap();
        create_goal(
            NewGoal {
                name: "Holiday".to_owned(),
                target_amount: dec!(100),
                deadline: Some(date!(2026 - 12 - 01)),
            },
            USER,
            &connection,
        )
        .unwrap();
        create_goal(
            NewGoal {
                name: "Laptop".to_owned(),
                target_amount: dec!(100),
                deadline: Some(date!(2026 - 10 - 01)),
            },
            USER,
            &connection,
        )
        .unwrap();

        let names: Vec<String> = list_goals(USER, &connection)
            .unwrap()
            .into_iter()
            .map(|goal| goal.name)
            .collect();

        assert_eq!(names, vec!["Laptop", "Holiday", "Open ended"]);
    }

    #[test]
    fn cannot_touch_another_users_goal() {
        let connection = get_test_connection();
        let goal = test_goal(&connection, "House deposit");

        assert_eq!(get_goal(goal.id, 2, &connection), Err(Error::GoalNotFound));
        assert_eq!(
            delete_goal(goal.id, 2, &connection),
            Err(Error::GoalNotFound)
        );
    }
}
