use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use super::{ApiError, AppState};
use crate::models::{LoginRequest, RegistrationRequest, TokenResponse};
use crate::services::auth::{hash_password, new_salt, verify_password};
use crate::services::{AuthError, NewUser};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/registration", web::post().to(register))
        .route("/login", web::post().to(login));
}

/// POST /api/v1/registration
///
/// The `admin` flag is only honoured when admin self-registration is enabled.
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegistrationRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let req = req.into_inner();

    let admin = req.admin && state.allow_admin_registration;
    if req.admin && !admin {
        tracing::warn!("Ignoring admin flag on registration of '{}'", req.username);
    }

    let salt = new_salt();
    let user = state
        .store
        .create_user(NewUser {
            password_hash: hash_password(&req.password, &salt),
            salt,
            username: req.username,
            email: req.email,
            admin,
            graduate: req.graduate,
            employer: req.employer,
        })
        .await?;

    if let Err(e) = state.notifier.registered(&user).await {
        tracing::warn!("Welcome notification for user {} failed: {}", user.id, e);
    }

    tracing::info!("Registered user {} ({})", user.id, user.username);

    Ok(HttpResponse::Ok().json(json!({ "data": user })))
}

/// POST /api/v1/login
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let credentials = state
        .store
        .find_credentials(&req.username)
        .await?
        .filter(|c| verify_password(&req.password, &c.salt, &c.password_hash))
        .ok_or(AuthError::InvalidCredentials)?;

    let token = state.tokens.issue(&credentials.user.passport())?;

    tracing::debug!("Issued token for user {}", credentials.user.id);

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
