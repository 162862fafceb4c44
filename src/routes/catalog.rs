use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use super::{ApiError, AppState};
use crate::models::{CatalogEntryRequest, JobRole, JobSkill, Passport};
use crate::services::CacheKey;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/skills", web::get().to(list_skills))
        .route("/skills", web::post().to(create_skill))
        .route("/job_roles", web::get().to(list_roles))
        .route("/job_roles", web::post().to(create_role));
}

async fn list_skills(
    state: web::Data<AppState>,
    _passport: Passport,
) -> Result<HttpResponse, ApiError> {
    if let Ok(skills) = state.cache.get::<Vec<JobSkill>>(CacheKey::skills()).await {
        return Ok(HttpResponse::Ok().json(json!({ "skills": skills })));
    }

    let skills = state.store.list_skills().await?;
    if let Err(e) = state.cache.set(CacheKey::skills(), &skills).await {
        tracing::warn!("Failed to cache skills: {}", e);
    }

    Ok(HttpResponse::Ok().json(json!({ "skills": skills })))
}

async fn create_skill(
    state: web::Data<AppState>,
    _passport: Passport,
    req: web::Json<CatalogEntryRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let skill = state.store.create_skill(&req.name).await?;
    state.cache.delete(CacheKey::skills()).await;

    Ok(HttpResponse::Ok().json(json!({ "skill": skill })))
}

async fn list_roles(
    state: web::Data<AppState>,
    _passport: Passport,
) -> Result<HttpResponse, ApiError> {
    if let Ok(roles) = state.cache.get::<Vec<JobRole>>(CacheKey::roles()).await {
        return Ok(HttpResponse::Ok().json(json!({ "job_roles": roles })));
    }

    let roles = state.store.list_roles().await?;
    if let Err(e) = state.cache.set(CacheKey::roles(), &roles).await {
        tracing::warn!("Failed to cache job roles: {}", e);
    }

    Ok(HttpResponse::Ok().json(json!({ "job_roles": roles })))
}

async fn create_role(
    state: web::Data<AppState>,
    _passport: Passport,
    req: web::Json<CatalogEntryRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let role = state.store.create_role(&req.name).await?;
    state.cache.delete(CacheKey::roles()).await;

    Ok(HttpResponse::Ok().json(json!({ "job_role": role })))
}
