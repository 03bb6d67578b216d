use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::auth::{dto::ErrorResponse, password::PasswordError};

pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Outcome of a failed register/authenticate action.
///
/// The first three are expected, user-facing rejections. `InvalidInput` and
/// `Internal` are kept apart from them so a caller can tell bad credentials
/// from a broken system.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User already exists")]
    DuplicateAccount,
    #[error("No user found")]
    AccountNotFound,
    #[error("Invalid password")]
    InvalidCredential,
    #[error("{0}")]
    InvalidInput(String),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::InvalidInput(rejection.body_text())
    }
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        AuthError::Internal(e.into())
    }
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::DuplicateAccount => StatusCode::CONFLICT,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredential => StatusCode::UNAUTHORIZED,
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            AuthError::DuplicateAccount | AuthError::AccountNotFound | AuthError::InvalidCredential
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(e) = &self {
            error!(error = ?e, "auth action failed");
        }
        let body = ErrorResponse {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
