//! Transaction management: the ledger of money movements.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and atomic creation against wallet balances
//! - The filterable, paginated query engine backing all list views
//! - HTTP handlers for the transaction routes

mod core;
mod endpoints;
mod query;

pub use core::{
    NewTransaction, Transaction, create_transaction, create_transaction_table, delete_transaction,
    map_transaction_row, update_transaction,
};
pub(crate) use core::insert_transaction;
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    update_transaction_endpoint,
};
pub use query::{TransactionFilter, TransactionPage, query_transactions};
