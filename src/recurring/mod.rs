//! Recurring bills: user-triggered repeating payment templates and the
//! engine that processes a payment atomically.

mod core;
mod endpoints;
mod engine;

pub use core::{
    Frequency, NewRecurringBill, RecurringBill, create_bill, create_recurring_bill_table,
    delete_bill, get_bill, list_bills, update_bill,
};
pub use endpoints::{
    create_bill_endpoint, delete_bill_endpoint, list_bills_endpoint, pay_bill_endpoint,
    update_bill_endpoint,
};
pub use engine::process_payment;
