//! Account endpoints: register, login and the current-user profile.

use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{LoginRequest, RegisterRequest, UserProfileResponse};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/get-user").route(web::get().to(get_user)));
}

async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let resp = state.accounts.register(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(resp))
}

async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let resp = state.accounts.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(resp))
}

async fn get_user(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, ApiError> {
    let user = state.accounts.get_user(&auth.user)?;
    Ok(HttpResponse::Ok().json(UserProfileResponse {
        user,
        message: "user found".to_string(),
    }))
}
