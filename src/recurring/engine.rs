//! The recurring bill payment engine.
//!
//! Paying a bill is one all-or-nothing unit against the store: debit the
//! bill's wallet, insert the ledger transaction, and advance the schedule.
//! The schedule advance is a conditional update on the `next_date` that was
//! read when the bill was loaded, so two concurrent payment requests cannot
//! both charge the same period: the loser rolls back with
//! [Error::PaymentConflict].

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    budget::check_budget_and_notify,
    database_id::{BillId, UserId},
    month::{add_months, add_years},
    transaction::{NewTransaction, insert_transaction},
    wallet::adjust_balance,
};

use super::{Frequency, RecurringBill, get_bill};

/// Process a payment for a recurring bill.
///
/// The schedule advances by one period from the bill's previous `next_date`
/// rather than from today, so paying late or early does not drift the
/// schedule. Day-of-month overflow clamps to the last day of the target
/// month (Jan 31 + 1 month = Feb 28/29).
///
/// After the unit commits, the budget evaluator runs as a best-effort side
/// effect for the bill's category.
///
/// # Errors
/// Returns a:
/// - [Error::BillNotFound] if the bill does not exist for this user,
/// - [Error::MissingCategory] if the bill has no category (category drives
///   budget evaluation, so payment is refused rather than defaulted),
/// - [Error::PaymentConflict] if a concurrent request already charged this
///   period; no partial state is left behind.
pub fn process_payment(
    bill_id: BillId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let bill = get_bill(bill_id, user_id, connection)?;

    if bill.category_id.is_none() {
        return Err(Error::MissingCategory);
    }

    let today = OffsetDateTime::now_utc().date();
    apply_payment(&bill, today, connection)?;

    if let Some(category_id) = bill.category_id {
        check_budget_and_notify(user_id, category_id, today, connection);
    }

    Ok(())
}

/// The atomic part of a payment: debit, ledger insert, schedule advance.
fn apply_payment(bill: &RecurringBill, today: Date, connection: &Connection) -> Result<(), Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    adjust_balance(&sql_transaction, bill.wallet_id, bill.user_id, -bill.amount)?;

    insert_transaction(
        &sql_transaction,
        &NewTransaction {
            title: format!("Fixed Cost: {}", bill.name),
            amount: bill.amount,
            date: today,
            wallet_id: bill.wallet_id,
            to_wallet_id: None,
            category_id: bill.category_id,
        },
        bill.user_id,
    )?;

    let advanced = advance_schedule(bill.next_date, bill.frequency);
    let rows_affected = sql_transaction.execute(
        "UPDATE recurring_bill SET next_date = ?1
         WHERE id = ?2 AND user_id = ?3 AND next_date = ?4",
        (advanced, bill.id, bill.user_id, bill.next_date),
    )?;

    if rows_affected == 0 {
        // Dropping the transaction without committing rolls everything back.
        return Err(Error::PaymentConflict);
    }

    sql_transaction.commit()?;

    Ok(())
}

/// The next due date, one period after the previous one.
fn advance_schedule(next_date: Date, frequency: Frequency) -> Date {
    match frequency {
        Frequency::Monthly => add_months(next_date, 1),
        Frequency::Yearly => add_years(next_date, 1),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryKind, NewCategory, create_category},
        db::initialize,
        notification::list_notifications,
        transaction::{TransactionFilter, query_transactions},
        wallet::{NewWallet, WalletKind, create_wallet, get_wallet},
    };

    use super::{
        super::{Frequency, NewRecurringBill, RecurringBill, create_bill, get_bill},
        advance_schedule, apply_payment, process_payment,
    };

    const USER: i64 = 1;

    struct Fixture {
        connection: Connection,
        wallet_id: i64,
        category_id: i64,
    }

    fn fixture(budget: Option<rust_decimal::Decimal>) -> Fixture {
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
        let category = create_category(
            NewCategory {
                name: "Subscriptions".to_owned(),
                kind: CategoryKind::Expense,
                budget,
            },
            USER,
            &connection,
        )
        .unwrap();

        Fixture {
            connection,
            wallet_id: wallet.id,
            category_id: category.id,
        }
    }

    fn netflix(fixture: &Fixture, category_id: Option<i64>) -> RecurringBill {
        create_bill(
            NewRecurringBill {
                name: "Netflix".to_owned(),
                amount: dec!(40),
                frequency: Frequency::Monthly,
                start_date: date!(2024 - 01 - 31),
                wallet_id: fixture.wallet_id,
                category_id,
            },
            USER,
            &fixture.connection,
        )
        .unwrap()
    }

    #[test]
    fn payment_debits_wallet_inserts_transaction_and_advances_schedule() {
        let fixture = fixture(None);
        let bill = netflix(&fixture, Some(fixture.category_id));

        process_payment(bill.id, USER, &fixture.connection).unwrap();

        let wallet = get_wallet(fixture.wallet_id, USER, &fixture.connection).unwrap();
        assert_eq!(wallet.balance, dec!(960));

        let page = query_transactions(
            USER,
            &TransactionFilter::default(),
            1,
            10,
            &fixture.connection,
        )
        .unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].title, "Fixed Cost: Netflix");
        assert_eq!(page.items[0].amount, dec!(40));
        assert_eq!(page.items[0].category_id, Some(fixture.category_id));

        // Jan 31 + 1 month clamps to the end of February.
        let paid = get_bill(bill.id, USER, &fixture.connection).unwrap();
        assert_eq!(paid.next_date, date!(2024 - 02 - 29));
    }

    #[test]
    fn missing_bill_is_refused() {
        let fixture = fixture(None);

        assert_eq!(
            process_payment(42, USER, &fixture.connection),
            Err(Error::BillNotFound)
        );
    }

    #[test]
    fn bill_without_category_is_refused_without_state_change() {
        let fixture = fixture(None);
        let bill = netflix(&fixture, None);

        assert_eq!(
            process_payment(bill.id, USER, &fixture.connection),
            Err(Error::MissingCategory)
        );

        let wallet = get_wallet(fixture.wallet_id, USER, &fixture.connection).unwrap();
        assert_eq!(wallet.balance, dec!(1000));
    }

    #[test]
    fn stale_schedule_rolls_back_the_whole_payment() {
        let fixture = fixture(None);
        let bill = netflix(&fixture, Some(fixture.category_id));

        // First request wins the race.
        let stale_copy = get_bill(bill.id, USER, &fixture.connection).unwrap();
        process_payment(bill.id, USER, &fixture.connection).unwrap();

        // Second request still holds the pre-payment schedule.
        let got = apply_payment(&stale_copy, date!(2024 - 02 - 01), &fixture.connection);
        assert_eq!(got, Err(Error::PaymentConflict));

        // Only the first payment's effects persist.
        let wallet = get_wallet(fixture.wallet_id, USER, &fixture.connection).unwrap();
        assert_eq!(wallet.balance, dec!(960));

        let page = query_transactions(
            USER,
            &TransactionFilter::default(),
            1,
            10,
            &fixture.connection,
        )
        .unwrap();
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn payment_triggers_budget_evaluation() {
        let fixture = fixture(Some(dec!(30)));
        let bill = netflix(&fixture, Some(fixture.category_id));

        process_payment(bill.id, USER, &fixture.connection).unwrap();

        let notifications = list_notifications(USER, &fixture.connection).unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].category_id, Some(fixture.category_id));
    }

    #[test]
    fn yearly_bills_advance_by_one_year() {
        assert_eq!(
            advance_schedule(date!(2024 - 02 - 29), Frequency::Yearly),
            date!(2025 - 02 - 28)
        );
    }

    #[test]
    fn monthly_advance_is_from_the_previous_due_date() {
        // Paying late must not re-anchor the schedule to today.
        assert_eq!(
            advance_schedule(date!(2024 - 03 - 15), Frequency::Monthly),
            date!(2024 - 04 - 15)
        );
    }
}
