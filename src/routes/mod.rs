// Route exports
pub mod applications;
pub mod auth;
pub mod catalog;
pub mod cvs;
pub mod friends;
pub mod health;
pub mod jobs;
pub mod messages;
pub mod users;

use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::{error, web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use std::future::{ready, Ready};
use std::sync::Arc;
use thiserror::Error;

use crate::core::Matcher;
use crate::models::{ErrorResponse, Passport, UserId};
use crate::services::auth::extract_bearer;
use crate::services::{AuthError, CatalogCache, Notifier, Store, StoreError, TokenService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub tokens: Arc<TokenService>,
    pub cache: Arc<CatalogCache>,
    pub notifier: Arc<dyn Notifier>,
    pub matcher: Matcher,
    pub allow_admin_registration: bool,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .configure(health::configure)
            .configure(auth::configure)
            .configure(jobs::configure)
            .configure(applications::configure)
            .configure(users::configure)
            .configure(friends::configure)
            .configure(messages::configure)
            .configure(cvs::configure)
            .configure(catalog::configure),
    );
}

/// Errors returned by handlers, rendered as [`ErrorResponse`]
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::NotImplemented(_) => "not_implemented",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => {
                tracing::error!("Store failure: {}", other);
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Jwt(e) => {
                tracing::debug!("Rejected token: {}", e);
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(format!("Validation failed: {}", errors))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid query: {}", err)).into()
}

pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid path parameter: {}", err)).into()
}

/// Resolve the caller from the `Authorization` header
fn authenticate(req: &HttpRequest) -> Result<Passport, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("Application state missing".to_string()))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let token = extract_bearer(header_value)?;

    Ok(state.tokens.verify(token)?)
}

impl FromRequest for Passport {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

pub fn require_graduate(passport: &Passport) -> Result<(), ApiError> {
    if passport.admin || passport.graduate {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Graduate account required".to_string()))
    }
}

pub fn require_employer(passport: &Passport) -> Result<(), ApiError> {
    if passport.admin || passport.employer {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Employer account required".to_string()))
    }
}

/// The user a request acts for: the caller, or `requested` if allowed
pub fn acting_as(passport: &Passport, requested: Option<UserId>) -> Result<UserId, ApiError> {
    match requested {
        None => Ok(passport.id),
        Some(user_id) if passport.may_act_for(user_id) => Ok(user_id),
        Some(user_id) => Err(ApiError::Forbidden(format!(
            "Not allowed to act on behalf of user {}",
            user_id
        ))),
    }
}
