//! Registration, login and profile lookup.

use actix_web::web;
use chrono::Duration;
use std::sync::Arc;

use super::required;
use crate::auth::TokenCodec;
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::db::{Database, DbError};
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};

pub struct AccountService {
    db: Arc<Database>,
    tokens: Arc<TokenCodec>,
    register_token_ttl: Duration,
    login_token_ttl: Duration,
}

impl AccountService {
    pub fn new(db: Arc<Database>, tokens: Arc<TokenCodec>, config: &Config) -> Self {
        Self {
            db,
            tokens,
            register_token_ttl: config.register_token_ttl,
            login_token_ttl: config.login_token_ttl,
        }
    }

    /// Create an account and hand back a short-lived token for it.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let full_name = required(req.full_name, "Name is required")?;
        let email = required(req.email, "email is required")?;
        let password = required(req.password, "password is required")?;

        if self.db.find_user_by_email(&email)?.is_some() {
            log::info!("[AUTH] Registration refused, email already in use");
            return Err(ApiError::DuplicateEmail);
        }

        let password_hash = web::block(move || hash_password(&password)).await??;

        // The UNIQUE index settles races between concurrent registrations
        let user = match self.db.create_user(&full_name, &email, &password_hash) {
            Ok(user) => user,
            Err(DbError::Conflict) => return Err(ApiError::DuplicateEmail),
            Err(e) => return Err(e.into()),
        };

        let access_token = self.tokens.issue(&user, self.register_token_ttl)?;
        log::info!("[AUTH] Registered user {}", user.id);

        Ok(RegisterResponse {
            error: false,
            access_token,
            user,
            message: "Registration Successfull".to_string(),
        })
    }

    /// Check credentials and issue a long-lived token.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, ApiError> {
        let email = required(req.email, "email is required")?;
        let password = required(req.password, "password is required")?;

        let record = self
            .db
            .find_user_by_email(&email)?
            .ok_or(ApiError::NotRegistered)?;

        let stored_hash = record.password_hash.clone();
        let matches = web::block(move || verify_password(&password, &stored_hash)).await??;
        if !matches {
            log::info!("[AUTH] Login failed for user {}", record.user.id);
            return Err(ApiError::InvalidCredentials);
        }

        let user = User::from(record);
        let access_token = self.tokens.issue(&user, self.login_token_ttl)?;
        log::info!("[AUTH] User {} logged in", user.id);

        Ok(LoginResponse {
            error: false,
            message: "Login successfull".to_string(),
            email,
            access_token,
        })
    }

    /// Re-read the token's user from the store. A token can outlive its
    /// account, so a missing row is an authentication failure.
    pub fn get_user(&self, token_user: &User) -> Result<User, ApiError> {
        self.db
            .find_user_by_id(&token_user.id)?
            .ok_or(ApiError::UnknownUser)
    }
}
