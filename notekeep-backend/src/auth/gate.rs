//! Bearer-token gate for protected routes.
//!
//! Handlers opt in by taking an [`AuthUser`] argument. The extractor runs
//! before the body is read; a missing, forged or expired token answers 401 and
//! the handler never runs.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use std::future::{Ready, ready};

use crate::AppState;
use crate::auth::token::Claims;
use crate::error::ApiError;
use crate::models::User;

/// The decoded token payload of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state is not registered".to_string()))?;

    let token = bearer_token(req).ok_or(ApiError::AuthRequired)?;

    let claims: Claims<User> = state.tokens.verify(token).map_err(|e| {
        log::debug!("[AUTH] Rejected token: {}", e);
        ApiError::from(e)
    })?;

    Ok(AuthUser { user: claims.user })
}

/// Extract `<token>` from `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
