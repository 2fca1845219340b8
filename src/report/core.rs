//! Monthly aggregates over the transaction ledger.
//!
//! Transfers (rows with a destination wallet) never count towards income
//! or expense. Sums are computed in application code with [Decimal] since
//! amounts are stored as text.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    Error,
    database_id::{CategoryId, UserId},
    money::{decimal_column, optional_decimal_column},
    month::YearMonth,
};

/// The headline numbers for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub income: Decimal,
    pub expense: Decimal,
    /// Income minus expense.
    pub net: Decimal,
    /// The sum of every goal's saved amount. Not month-scoped; this is the
    /// running total.
    pub total_saved: Decimal,
}

/// How much was spent in one expense category during the month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category_id: CategoryId,
    pub category_name: String,
    pub budget: Option<Decimal>,
    pub spent: Decimal,
}

/// Compute the user's income, expense, net, and total saved for `month`.
///
/// # Errors
/// Returns [Error::SqlError] if a query fails.
pub fn monthly_stats(
    user_id: UserId,
    month: YearMonth,
    connection: &Connection,
) -> Result<MonthlyStats, Error> {
    let range = month.range();

    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    let rows = connection
        .prepare(
            "SELECT t.amount, c.kind
             FROM \"transaction\" t
             JOIN category c ON c.id = t.category_id
             WHERE t.user_id = ?1
               AND t.to_wallet_id IS NULL
               AND t.date BETWEEN ?2 AND ?3",
        )?
        .query_map((user_id, range.start, range.end), |row| {
            Ok((decimal_column(row, 0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for (amount, kind) in rows {
        match kind.as_str() {
            "INCOME" => income += amount,
            _ => expense += amount,
        }
    }

    let total_saved = connection
        .prepare("SELECT current_amount FROM goal WHERE user_id = ?1")?
        .query_map((user_id,), |row| decimal_column(row, 0))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .sum();

    Ok(MonthlyStats {
        income,
        expense,
        net: income - expense,
        total_saved,
    })
}

/// Compute per-category spend for `month`, covering every expense category
/// the user has, including those with no transactions yet.
///
/// # Errors
/// Returns [Error::SqlError] if a query fails.
pub fn spend_by_category(
    user_id: UserId,
    month: YearMonth,
    connection: &Connection,
) -> Result<Vec<CategorySpend>, Error> {
    let range = month.range();

    let rows = connection
        .prepare(
            "SELECT c.id, c.name, c.budget, t.amount
             FROM category c
             LEFT JOIN \"transaction\" t
               ON t.category_id = c.id
               AND t.to_wallet_id IS NULL
               AND t.date BETWEEN ?2 AND ?3
             WHERE c.user_id = ?1 AND c.kind = 'EXPENSE'
             ORDER BY c.name ASC, c.id ASC",
        )?
        .query_map((user_id, range.start, range.end), |row| {
            Ok((
                row.get::<_, CategoryId>(0)?,
                row.get::<_, String>(1)?,
                optional_decimal_column(row, 2)?,
                optional_decimal_column(row, 3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut spends: Vec<CategorySpend> = Vec::new();

    for (category_id, category_name, budget, amount) in rows {
        match spends.last_mut() {
            Some(last) if last.category_id == category_id => {
                last.spent += amount.unwrap_or(Decimal::ZERO);
            }
            _ => spends.push(CategorySpend {
                category_id,
                category_name,
                budget,
                spent: amount.unwrap_or(Decimal::ZERO),
            }),
        }
    }

    Ok(spends)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        category::{CategoryKind, NewCategory, create_category},
        db::initialize,
        goal::{NewGoal, add_savings, create_goal},
        month::YearMonth,
        transaction::{NewTransaction, create_transaction},
        wallet::{NewWallet, WalletKind, create_wallet},
    };

    use super::{monthly_stats, spend_by_category};

    const USER: i64 = 1;

    struct Fixture {
        connection: Connection,
        wallet_id: i64,
        other_wallet_id: i64,
        income_id: i64,
        groceries_id: i64,
    }

    fn fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let wallet = create_wallet(
            NewWallet {
                name: "Bank".to_owned(),
                kind: WalletKind::Bank,
                initial_balance: dec!(1000),
            },
            USER,
            &connection,
        )
        .unwrap();
        let other_wallet = create_wallet(
            NewWallet {
                name: "Cash".to_owned(),
                kind: WalletKind::Cash,
                initial_balance: dec!(0),
            },
            USER,
            &connection,
        )
        .unwrap();
        let income = create_category(
            NewCategory {
                name: "Salary".to_owned(),
                kind: CategoryKind::Income,
                budget: None,
            },
            USER,
            &connection,
        )
        .unwrap();
        let groceries = create_category(
            NewCategory {
                name: "Groceries".to_owned(),
                kind: CategoryKind::Expense,
                budget: Some(dec!(500)),
            },
            USER,
            &connection,
        )
        .unwrap();

        Fixture {
            connection,
            wallet_id: wallet.id,
            other_wallet_id: other_wallet.id,
            income_id: income.id,
            groceries_id: groceries.id,
        }
    }

    fn spend(fixture: &Fixture, title: &str, amount: rust_decimal::Decimal, day: u8) {
        create_transaction(
            NewTransaction {
                title: title.to_owned(),
                amount,
                date: date!(2026 - 03 - 01).replace_day(day).unwrap(),
                wallet_id: fixture.wallet_id,
                to_wallet_id: None,
                category_id: Some(fixture.groceries_id),
            },
            USER,
            &fixture.connection,
        )
        .unwrap();
    }

    #[test]
    fn stats_cover_income_expense_and_net() {
        let fixture = fixture();
        create_transaction(
            NewTransaction {
                title: "Pay".to_owned(),
                amount: dec!(2500),
                date: date!(2026 - 03 - 01),
                wallet_id: fixture.wallet_id,
                to_wallet_id: None,
                category_id: Some(fixture.income_id),
            },
            USER,
            &fixture.connection,
        )
        .unwrap();
        spend(&fixture, "Veges", dec!(120.55), 5);
        spend(&fixture, "Meat", dec!(79.45), 12);

        let month = YearMonth::from_str("2026-03").unwrap();
        let stats = monthly_stats(USER, month, &fixture.connection).unwrap();

        assert_eq!(stats.income, dec!(2500));
        assert_eq!(stats.expense, dec!(200));
        assert_eq!(stats.net, dec!(2300));
        assert_eq!(stats.total_saved, dec!(0));
    }

    #[test]
    fn transfers_are_excluded_from_aggregates() {
        let fixture = fixture();
        spend(&fixture, "Veges", dec!(50), 5);
        create_transaction(
            NewTransaction {
                title: "Top up cash".to_owned(),
                amount: dec!(300),
                date: date!(2026 - 03 - 10),
                wallet_id: fixture.wallet_id,
                to_wallet_id: Some(fixture.other_wallet_id),
                category_id: None,
            },
            USER,
            &fixture.connection,
        )
        .unwrap();

        let month = YearMonth::from_str("2026-03").unwrap();
        let stats = monthly_stats(USER, month, &fixture.connection).unwrap();

        assert_eq!(stats.income, dec!(0));
        assert_eq!(stats.expense, dec!(50));

        let spends = spend_by_category(USER, month, &fixture.connection).unwrap();
        assert_eq!(spends.len(), 1);
        assert_eq!(spends[0].spent, dec!(50));
    }

    #[test]
    fn stats_are_scoped_to_the_month() {
        let fixture = fixture();
        spend(&fixture, "In month", dec!(80), 31);
        create_transaction(
            NewTransaction {
                title: "Next month".to_owned(),
                amount: dec!(999),
                date: date!(2026 - 04 - 01),
                wallet_id: fixture.wallet_id,
                to_wallet_id: None,
                category_id: Some(fixture.groceries_id),
            },
            USER,
            &fixture.connection,
        )
        .unwrap();

        let month = YearMonth::from_str("2026-03").unwrap();
        let stats = monthly_stats(USER, month, &fixture.connection).unwrap();

        assert_eq!(stats.expense, dec!(80));
    }

    #[test]
    fn total_saved_sums_every_goal() {
        let fixture = fixture();
        let first = create_goal(
            NewGoal {
                name: "House".to_owned(),
                target_amount: dec!(10000),
                deadline: None,
            },
            USER,
            &fixture.connection,
        )
        .unwrap();
        let second = create_goal(
            NewGoal {
                name: "Holiday".to_owned(),
                target_amount: dec!(2000),
                deadline: None,
            },
            USER,
            &fixture.connection,
        )
        .unwrap();
        add_savings(first.id, fixture.wallet_id, dec!(150), USER, &fixture.connection).unwrap();
        add_savings(second.id, fixture.wallet_id, dec!(75), USER, &fixture.connection).unwrap();

        let month = YearMonth::from_str("2026-03").unwrap();
        let stats = monthly_stats(USER, month, &fixture.connection).unwrap();

        assert_eq!(stats.total_saved, dec!(225));
    }

    #[test]
    fn categories_without_transactions_report_zero_spend() {
        let fixture = fixture();

        let month = YearMonth::from_str("2026-03").unwrap();
        let spends = spend_by_category(USER, month, &fixture.connection).unwrap();

        // Salary is INCOME and excluded; Groceries shows up with no spend.
        assert_eq!(spends.len(), 1);
        assert_eq!(spends[0].category_name, "Groceries");
        assert_eq!(spends[0].spent, dec!(0));
        assert_eq!(spends[0].budget, Some(dec!(500)));
    }
}
