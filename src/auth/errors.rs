//! Failure taxonomy of the account workflows and its HTTP rendering.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::auth::repo::StoreError;

const SERVER_ERROR_MESSAGE: &str = "Server occurred an error, please try again";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),
    #[error("User does not exist")]
    NotFound,
    #[error("Invalid credentials")]
    InvalidCredential,
    #[error("Token is invalid or expired")]
    InvalidToken,
    #[error("Authorization token not found")]
    Unauthorized,
    #[error("User already exists")]
    Conflict,
    #[error("We've not sent an email to reset password")]
    DeliveryFailure(#[source] anyhow::Error),
    /// A stored password hash could not be parsed.
    #[error("stored credential is corrupt: {0}")]
    CorruptCredential(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AuthError::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_)
            | AuthError::NotFound
            | AuthError::InvalidCredential
            | AuthError::Conflict
            | AuthError::DeliveryFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::InvalidToken | AuthError::Unauthorized => StatusCode::FORBIDDEN,
            AuthError::CorruptCredential(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }

    /// Client-facing body. Server-side failures are logged here and replaced
    /// by a generic message.
    pub fn body(&self) -> ErrorBody {
        let error = match self {
            AuthError::CorruptCredential(detail) => {
                error!(%detail, "corrupt credential");
                SERVER_ERROR_MESSAGE.to_string()
            }
            AuthError::Internal(e) => {
                error!(error = ?e, "unexpected failure");
                SERVER_ERROR_MESSAGE.to_string()
            }
            AuthError::DeliveryFailure(e) => {
                error!(error = ?e, "mail delivery failed");
                self.to_string()
            }
            other => other.to_string(),
        };
        ErrorBody { error }
    }

    /// Render with `status` unless the failure is server-side.
    pub fn into_response_with(self, status: StatusCode) -> (StatusCode, Json<ErrorBody>) {
        let status = if self.is_server_error() {
            self.status()
        } else {
            status
        };
        (status, Json(self.body()))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::Conflict,
            other => AuthError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(rejection.body_text())
    }
}
