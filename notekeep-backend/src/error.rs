//! Request-level error taxonomy.
//!
//! Every failure a handler can produce renders as the `{ error: true, message }`
//! envelope. Status codes follow the established wire contract, which is not
//! uniform: a duplicate registration answers 200, an unresolvable user answers
//! a bare 401.

use actix_web::error::{BlockingError, JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};

use crate::auth::password::PasswordError;
use crate::auth::token::TokenError;
use crate::db::DbError;
use crate::models::MessageResponse;

pub const SERVER_ERROR_MESSAGE: &str = "Server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(&'static str),
    #[error("Invalid request: {0}")]
    InvalidBody(String),
    #[error("No changes provided")]
    NoChanges,
    #[error("User already exists")]
    DuplicateEmail,
    #[error("Not registered")]
    NotRegistered,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Authorization token required")]
    AuthRequired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    /// The token is valid but its user no longer exists.
    #[error("User not found")]
    UnknownUser,
    #[error("Todo not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] DbError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Message shown to clients. Store and internal failures are not described.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => SERVER_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Database(_) | ApiError::Internal(_))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidBody(_)
            | ApiError::NoChanges
            | ApiError::NotRegistered
            | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::DuplicateEmail => StatusCode::OK,
            ApiError::AuthRequired
            | ApiError::InvalidToken
            | ApiError::TokenExpired
            | ApiError::UnknownUser => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_server_error() {
            log::error!("Request failed: {}", self);
        }
        match self {
            ApiError::UnknownUser => HttpResponse::build(self.status_code()).finish(),
            _ => HttpResponse::build(self.status_code())
                .json(MessageResponse::new(true, self.client_message())),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::InvalidSignature | TokenError::Malformed(_) => ApiError::InvalidToken,
            TokenError::Signing(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Render malformed JSON bodies as the usual envelope instead of plain text.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected JSON body: {}", err);
    ApiError::InvalidBody(err.to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected query string: {}", err);
    ApiError::InvalidBody(err.to_string()).into()
}
