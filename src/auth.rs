//! Request identity extraction.
//!
//! Authentication itself happens upstream (a reverse proxy or gateway);
//! this server trusts the `X-User-Id` header that layer injects. Handlers
//! take a [RequestUser] argument and never read the header directly.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use crate::{action_response::ActionResponse, database_id::UserId};

/// The HTTP header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// The authenticated user for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestUser(pub UserId);

impl<S> FromRequestParts<S> for RequestUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|text| text.parse::<UserId>().ok());

        match user_id {
            Some(user_id) => Ok(RequestUser(user_id)),
            None => Err((
                StatusCode::UNAUTHORIZED,
                ActionResponse::failure("Missing or invalid user identity header."),
            )
                .into_response()),
        }
    }
}
