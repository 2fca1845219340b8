//! The JSON result shape returned by every mutating endpoint.

use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The `{success, message}` body returned by form/mutation endpoints.
///
/// Expected business failures are reported through this shape rather than
/// bare error statuses so the (external) presentation layer can show the
/// message as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Convert an engine result into a JSON action response, using
/// `success_message` for the happy path.
pub fn respond(result: Result<(), Error>, success_message: &str) -> Response {
    match result {
        Ok(()) => (StatusCode::OK, ActionResponse::success(success_message)).into_response(),
        Err(error) => error.into_response(),
    }
}
