//! Application router configuration.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    AppState,
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    goal::{
        add_savings_endpoint, create_goal_endpoint, delete_goal_endpoint, list_goals_endpoint,
        update_goal_endpoint,
    },
    notification::{
        delete_notification_endpoint, list_notifications_endpoint, mark_all_read_endpoint,
        mark_read_endpoint, unread_count_endpoint,
    },
    recurring::{
        create_bill_endpoint, delete_bill_endpoint, list_bills_endpoint, pay_bill_endpoint,
        update_bill_endpoint,
    },
    report::monthly_report_endpoint,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
    wallet::{
        create_wallet_endpoint, delete_wallet_endpoint, list_wallets_endpoint,
        update_wallet_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::WALLETS,
            get(list_wallets_endpoint).post(create_wallet_endpoint),
        )
        .route(
            endpoints::WALLET,
            put(update_wallet_endpoint).delete(delete_wallet_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::BILLS,
            get(list_bills_endpoint).post(create_bill_endpoint),
        )
        .route(
            endpoints::BILL,
            put(update_bill_endpoint).delete(delete_bill_endpoint),
        )
        .route(endpoints::PAY_BILL, post(pay_bill_endpoint))
        .route(
            endpoints::GOALS,
            get(list_goals_endpoint).post(create_goal_endpoint),
        )
        .route(
            endpoints::GOAL,
            put(update_goal_endpoint).delete(delete_goal_endpoint),
        )
        .route(endpoints::GOAL_SAVINGS, post(add_savings_endpoint))
        .route(
            endpoints::NOTIFICATIONS,
            get(list_notifications_endpoint),
        )
        .route(
            endpoints::UNREAD_NOTIFICATION_COUNT,
            get(unread_count_endpoint),
        )
        .route(
            endpoints::READ_ALL_NOTIFICATIONS,
            post(mark_all_read_endpoint),
        )
        .route(
            endpoints::NOTIFICATION,
            post(mark_read_endpoint).delete(delete_notification_endpoint),
        )
        .route(endpoints::MONTHLY_REPORT, get(monthly_report_endpoint))
        .with_state(state)
}
