//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::action_response::ActionResponse;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A zero or negative amount was used where a strictly positive amount
    /// is required. Rejected before any state change.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// An empty string was used for a field that requires text, e.g. a
    /// transaction title or a wallet name.
    #[error("a name or title cannot be empty")]
    EmptyTitle,

    /// A negative monthly budget was given for a category.
    #[error("a category budget cannot be negative")]
    InvalidBudget,

    /// A month string could not be parsed as `YYYY-MM`.
    #[error("\"{0}\" is not a valid month, expected the form YYYY-MM")]
    InvalidMonth(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the
    /// parameters (e.g., ID) are correct and that the resource has been
    /// created. Internally, this error may occur when a query returns no
    /// rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The recurring bill to pay does not exist for this user.
    #[error("the recurring bill could not be found")]
    BillNotFound,

    /// The wallet does not exist or belongs to another user.
    #[error("the wallet could not be found")]
    WalletNotFound,

    /// The savings goal does not exist or belongs to another user.
    #[error("the savings goal could not be found")]
    GoalNotFound,

    /// The referenced category does not exist or belongs to another user.
    #[error("the category could not be found")]
    CategoryNotFound,

    /// A recurring bill without a category cannot be paid, since the
    /// category drives budget evaluation. Payment is refused rather than
    /// defaulted to a catch-all category.
    #[error("the recurring bill has no category set")]
    MissingCategory,

    /// The wallet still has transactions or bills referencing it and cannot
    /// be deleted.
    #[error("the wallet still has transactions or bills attached to it")]
    WalletInUse,

    /// The category still has transactions or bills referencing it and
    /// cannot be deleted.
    #[error("the category still has transactions or bills attached to it")]
    CategoryInUse,

    /// The bill's schedule moved between loading the bill and applying the
    /// payment. Another request has already processed this payment.
    #[error("the bill was already paid by a concurrent request")]
    PaymentConflict,

    /// A query was given a foreign key that does not refer to a valid row.
    #[error("a referenced record does not exist")]
    InvalidForeignKey,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidForeignKey,
            error => Error::SqlError(error),
        }
    }
}

impl Error {
    /// The HTTP status code the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidAmount
            | Error::EmptyTitle
            | Error::InvalidBudget
            | Error::InvalidMonth(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound
            | Error::BillNotFound
            | Error::WalletNotFound
            | Error::GoalNotFound
            | Error::CategoryNotFound => StatusCode::NOT_FOUND,
            Error::MissingCategory | Error::InvalidForeignKey => StatusCode::BAD_REQUEST,
            Error::WalletInUse | Error::CategoryInUse | Error::PaymentConflict => {
                StatusCode::CONFLICT
            }
            Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    /// Convert the error into a JSON action response.
    ///
    /// Expected business failures carry their message to the client.
    /// Infrastructure faults are logged server-side and replaced with a
    /// generic message.
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {self}");
            "An unexpected error occurred. Try again later.".to_owned()
        } else {
            self.to_string()
        };

        (status_code, ActionResponse::failure(message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::Error;

    #[test]
    fn maps_no_rows_to_not_found() {
        let got: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(got, Error::NotFound);
    }

    #[test]
    fn business_errors_are_not_server_errors() {
        for error in [
            Error::InvalidAmount,
            Error::MissingCategory,
            Error::WalletInUse,
            Error::PaymentConflict,
            Error::BillNotFound,
        ] {
            assert_ne!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
