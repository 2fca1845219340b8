//! Monthly reporting: income/expense/net aggregates, per-category spend,
//! and the cache that memoises them between writes.

mod cache;
mod core;
mod endpoints;

pub use cache::StatsCache;
pub use core::{CategorySpend, MonthlyStats, monthly_stats, spend_by_category};
pub use endpoints::monthly_report_endpoint;
