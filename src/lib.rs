//! Kakeibo is a personal finance tracker for households: wallets,
//! categorized transactions, monthly budgets, recurring bills, and savings
//! goals.
//!
//! This library provides a JSON REST API over a SQLite database. User
//! identity is supplied per request by an upstream auth layer; see
//! [auth::RequestUser].

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod action_response;
mod app_state;
mod db;
mod endpoints;
mod error;
mod money;
mod pagination;
mod routing;

pub mod auth;
pub mod budget;
pub mod category;
pub mod database_id;
pub mod goal;
pub mod month;
pub mod notification;
pub mod recurring;
pub mod report;
pub mod transaction;
pub mod wallet;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use pagination::PaginationConfig;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
