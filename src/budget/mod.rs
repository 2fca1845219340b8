//! Budget evaluation: monthly spend-vs-ceiling checks that emit
//! deduplicated notifications.

mod evaluator;

pub use evaluator::{check_budget_and_notify, evaluate_budget};
