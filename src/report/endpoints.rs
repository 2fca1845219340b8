//! The HTTP handler for the monthly report route.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::RequestUser, month::YearMonth};

use super::{CategorySpend, MonthlyStats, monthly_stats, spend_by_category};

/// The query string parameters for the monthly report.
#[derive(Debug, Deserialize)]
pub struct MonthlyReportParams {
    /// A calendar month in the `YYYY-MM` form.
    pub month: String,
}

/// The monthly report body.
#[derive(Debug, Serialize)]
pub struct MonthlyReport {
    pub month: String,
    pub stats: MonthlyStats,
    pub categories: Vec<CategorySpend>,
}

/// A route handler for the monthly report.
///
/// The headline stats come from the cache when a previous request computed
/// them and no write has happened since. The per-category breakdown is
/// always computed fresh.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn monthly_report_endpoint(
    State(state): State<AppState>,
    RequestUser(user_id): RequestUser,
    Query(params): Query<MonthlyReportParams>,
) -> Response {
    let month = match YearMonth::from_str(&params.month) {
        Ok(month) => month,
        Err(error) => return error.into_response(),
    };

    let connection = state.db_connection.lock().unwrap();

    let stats = match state.stats_cache.get(user_id, month) {
        Some(stats) => stats,
        None => match monthly_stats(user_id, month, &connection) {
            Ok(stats) => {
                state.stats_cache.insert(user_id, month, stats);
                stats
            }
            Err(error) => return error.into_response(),
        },
    };

    match spend_by_category(user_id, month, &connection) {
        Ok(categories) => Json(MonthlyReport {
            month: month.to_string(),
            stats,
            categories,
        })
        .into_response(),
        Err(error) => error.into_response(),
    }
}
