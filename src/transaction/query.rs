//! The filterable, paginated transaction query engine.
//!
//! All list views are driven by a [TransactionFilter]: a set of optional,
//! independently composable conditions that are ANDed together. Results are
//! ordered by date descending with the row id as a deterministic tiebreak so
//! pagination stays reproducible across calls.

use rusqlite::{Connection, ToSql};
use serde::Serialize;

use crate::{
    Error,
    category::CategoryKind,
    database_id::{CategoryId, UserId, WalletId},
    month::YearMonth,
    pagination::{page_count, page_offset},
};

use super::{Transaction, map_transaction_row};

/// The optional conditions a transaction listing can be narrowed by.
///
/// Every present field must match (logical AND). An empty filter selects all
/// of the user's transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring match against the transaction title.
    pub q: Option<String>,
    /// Restrict dates to the inclusive range of this calendar month.
    pub month: Option<YearMonth>,
    /// Restrict to transactions whose category has this kind. Transfers have
    /// no income/expense association and are excluded whenever this filter
    /// is active.
    pub kind: Option<CategoryKind>,
    pub category_id: Option<CategoryId>,
    pub wallet_id: Option<WalletId>,
}

/// One page of transactions plus the totals needed to render pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub total_count: u64,
    pub total_pages: u64,
}

fn build_where_clause(
    user_id: UserId,
    filter: &TransactionFilter,
) -> (String, Vec<Box<dyn ToSql>>) {
    let mut conditions = vec!["user_id = ?".to_owned()];
    let mut parameters: Vec<Box<dyn ToSql>> = vec![Box::new(user_id)];

    if let Some(q) = &filter.q {
        conditions.push("title LIKE ?".to_owned());
        parameters.push(Box::new(format!("%{q}%")));
    }

    if let Some(month) = filter.month {
        let range = month.range();
        conditions.push("date BETWEEN ? AND ?".to_owned());
        parameters.push(Box::new(range.start));
        parameters.push(Box::new(range.end));
    }

    if let Some(kind) = filter.kind {
        conditions.push(
            "to_wallet_id IS NULL \
             AND category_id IN (SELECT id FROM category WHERE kind = ?)"
                .to_owned(),
        );
        parameters.push(Box::new(kind.as_str()));
    }

    if let Some(category_id) = filter.category_id {
        conditions.push("category_id = ?".to_owned());
        parameters.push(Box::new(category_id));
    }

    if let Some(wallet_id) = filter.wallet_id {
        conditions.push("(wallet_id = ? OR to_wallet_id = ?)".to_owned());
        parameters.push(Box::new(wallet_id));
        parameters.push(Box::new(wallet_id));
    }

    (conditions.join(" AND "), parameters)
}

/// Fetch one page of the user's transactions matching `filter`.
///
/// `page` is 1-indexed. A page past the end of the result set returns empty
/// `items`, not an error.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn query_transactions(
    user_id: UserId,
    filter: &TransactionFilter,
    page: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<TransactionPage, Error> {
    let (where_clause, parameters) = build_where_clause(user_id, filter);

    let total_count = connection
        .prepare(&format!(
            "SELECT COUNT(id) FROM \"transaction\" WHERE {where_clause}"
        ))?
        .query_one(
            rusqlite::params_from_iter(parameters.iter().map(|parameter| parameter.as_ref())),
            |row| row.get::<_, i64>(0),
        )? as u64;

    // Sort by date, then ID, to keep page boundaries stable across requests.
    let items = connection
        .prepare(&format!(
            "SELECT id, title, amount, date, wallet_id, to_wallet_id, category_id, user_id
             FROM \"transaction\"
             WHERE {where_clause}
             ORDER BY date DESC, id DESC
             LIMIT {page_size} OFFSET {offset}",
            offset = page_offset(page, page_size)
        ))?
        .query_map(
            rusqlite::params_from_iter(parameters.iter().map(|parameter| parameter.as_ref())),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect::<Result<Vec<Transaction>, Error>>()?;

    Ok(TransactionPage {
        items,
        total_count,
        total_pages: page_count(total_count, page_size),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        category::{CategoryKind, NewCategory, create_category},
        db::initialize,
        month::YearMonth,
        transaction::{NewTransaction, create_transaction},
        wallet::{NewWallet, WalletKind, create_wallet},
    };

    use super::{TransactionFilter, query_transactions};

    const USER: i64 = 1;
    const PAGE_SIZE: u64 = 10;

    struct Fixture {
        connection: Connection,
        wallet_id: i64,
        other_wallet_id: i64,
        expense_id: i64,
        income_id: i64,
    }

    fn fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let wallet = create_wallet(
            NewWallet {
                name: "Bank".to_owned(),
                kind: WalletKind::Bank,
                initial_balance: dec!(10000),
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
        let expense = create_category(
            NewCategory {
                name: "Groceries".to_owned(),
                kind: CategoryKind::Expense,
                budget: None,
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

        Fixture {
            connection,
            wallet_id: wallet.id,
            other_wallet_id: other_wallet.id,
            expense_id: expense.id,
            income_id: income.id,
        }
    }

    fn add_expense(fixture: &Fixture, title: &str, date: time::Date) {
        create_transaction(
            NewTransaction {
                title: title.to_owned(),
                amount: dec!(10),
                date,
                wallet_id: fixture.wallet_id,
                to_wallet_id: None,
                category_id: Some(fixture.expense_id),
            },
            USER,
            &fixture.connection,
        )
        .unwrap();
    }

    #[test]
    fn title_filter_is_case_insensitive() {
        let fixture = fixture();
        add_expense(&fixture, "Supermarket Run", date!(2024 - 03 - 05));
        add_expense(&fixture, "Cinema", date!(2024 - 03 - 06));

        let page = query_transactions(
            USER,
            &TransactionFilter {
                q: Some("supermarket".to_owned()),
                ..Default::default()
            },
            1,
            PAGE_SIZE,
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].title, "Supermarket Run");
    }

    #[test]
    fn month_filter_covers_whole_month_inclusive() {
        let fixture = fixture();
        add_expense(&fixture, "first", date!(2024 - 03 - 01));
        add_expense(&fixture, "last", date!(2024 - 03 - 31));
        add_expense(&fixture, "outside", date!(2024 - 04 - 01));

        let page = query_transactions(
            USER,
            &TransactionFilter {
                month: Some("2024-03".parse::<YearMonth>().unwrap()),
                ..Default::default()
            },
            1,
            PAGE_SIZE,
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn kind_filter_excludes_transfers() {
        let fixture = fixture();
        add_expense(&fixture, "shop", date!(2024 - 03 - 05));
        create_transaction(
            NewTransaction {
                title: "Salary".to_owned(),
                amount: dec!(100),
                date: date!(2024 - 03 - 06),
                wallet_id: fixture.wallet_id,
                to_wallet_id: None,
                category_id: Some(fixture.income_id),
            },
            USER,
            &fixture.connection,
        )
        .unwrap();
        create_transaction(
            NewTransaction {
                title: "Top up cash".to_owned(),
                amount: dec!(50),
                date: date!(2024 - 03 - 07),
                wallet_id: fixture.wallet_id,
                to_wallet_id: Some(fixture.other_wallet_id),
                category_id: None,
            },
            USER,
            &fixture.connection,
        )
        .unwrap();

        let page = query_transactions(
            USER,
            &TransactionFilter {
                kind: Some(CategoryKind::Expense),
                ..Default::default()
            },
            1,
            PAGE_SIZE,
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].title, "shop");
    }

    #[test]
    fn wallet_filter_matches_source_and_destination() {
        let fixture = fixture();
        add_expense(&fixture, "shop", date!(2024 - 03 - 05));
        create_transaction(
            NewTransaction {
                title: "Top up cash".to_owned(),
                amount: dec!(50),
                date: date!(2024 - 03 - 07),
                wallet_id: fixture.wallet_id,
                to_wallet_id: Some(fixture.other_wallet_id),
                category_id: None,
            },
            USER,
            &fixture.connection,
        )
        .unwrap();

        let page = query_transactions(
            USER,
            &TransactionFilter {
                wallet_id: Some(fixture.other_wallet_id),
                ..Default::default()
            },
            1,
            PAGE_SIZE,
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].title, "Top up cash");
    }

    #[test]
    fn filters_compose_with_logical_and() {
        let fixture = fixture();
        add_expense(&fixture, "March shop", date!(2024 - 03 - 05));
        add_expense(&fixture, "April shop", date!(2024 - 04 - 05));

        let page = query_transactions(
            USER,
            &TransactionFilter {
                q: Some("shop".to_owned()),
                month: Some("2024-04".parse::<YearMonth>().unwrap()),
                category_id: Some(fixture.expense_id),
                ..Default::default()
            },
            1,
            PAGE_SIZE,
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].title, "April shop");
    }

    #[test]
    fn results_are_scoped_by_user() {
        let fixture = fixture();
        add_expense(&fixture, "mine", date!(2024 - 03 - 05));

        let page = query_transactions(
            2,
            &TransactionFilter::default(),
            1,
            PAGE_SIZE,
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(page.total_count, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn pages_partition_the_result_set() {
        let fixture = fixture();
        // 25 rows over three dates so pages split mid-date and the id
        // tiebreak matters.
        for i in 0..25 {
            let date = match i % 3 {
                0 => date!(2024 - 03 - 05),
                1 => date!(2024 - 03 - 10),
                _ => date!(2024 - 03 - 15),
            };
            add_expense(&fixture, &format!("t{i}"), date);
        }

        let filter = TransactionFilter::default();
        let first_page =
            query_transactions(USER, &filter, 1, PAGE_SIZE, &fixture.connection).unwrap();
        assert_eq!(first_page.total_count, 25);
        assert_eq!(first_page.total_pages, 3);

        let mut seen = HashSet::new();
        let mut dates = Vec::new();
        for page in 1..=first_page.total_pages {
            let result =
                query_transactions(USER, &filter, page, PAGE_SIZE, &fixture.connection).unwrap();
            for item in result.items {
                assert!(seen.insert(item.id), "transaction {} repeated", item.id);
                dates.push(item.date);
            }
        }

        assert_eq!(seen.len(), 25, "pages must cover every transaction");
        assert!(
            dates.windows(2).all(|pair| pair[0] >= pair[1]),
            "dates must be non-increasing across pages"
        );
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let fixture = fixture();
        add_expense(&fixture, "only", date!(2024 - 03 - 05));

        let page = query_transactions(
            USER,
            &TransactionFilter::default(),
            5,
            PAGE_SIZE,
            &fixture.connection,
        )
        .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 1);
        assert_eq!(page.total_pages, 1);
    }
}
