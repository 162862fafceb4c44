use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use super::{acting_as, require_graduate, ApiError, AppState};
use crate::models::{CreateCvRequest, CvSkillRequest, Passport};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/cv", web::get().to(list_cvs))
        .route("/cv", web::post().to(create_cv))
        .route("/cv/skills", web::post().to(add_cv_skill))
        .route("/cv/skills", web::get().to(list_cv_skills))
        .route("/cv/{id}", web::get().to(get_cv));
}

async fn list_cvs(
    state: web::Data<AppState>,
    _passport: Passport,
) -> Result<HttpResponse, ApiError> {
    let cvs = state.store.list_cvs().await?;

    Ok(HttpResponse::Ok().json(json!({ "cv": cvs })))
}

async fn get_cv(
    state: web::Data<AppState>,
    _passport: Passport,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let cv = state.store.get_cv(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "cv": cv })))
}

/// POST /api/v1/cv
///
/// A graduate holds a single CV; a second one is a conflict.
async fn create_cv(
    state: web::Data<AppState>,
    passport: Passport,
    req: web::Json<CreateCvRequest>,
) -> Result<HttpResponse, ApiError> {
    require_graduate(&passport)?;
    req.validate()?;
    let graduate_id = acting_as(&passport, req.graduate_id)?;

    let cv = state
        .store
        .create_cv(graduate_id, req.gpa, req.yoe, req.job_role_id)
        .await?;

    tracing::info!("Graduate {} created CV {}", graduate_id, cv.id);

    Ok(HttpResponse::Ok().json(json!({ "cv": cv })))
}

async fn add_cv_skill(
    state: web::Data<AppState>,
    passport: Passport,
    req: web::Json<CvSkillRequest>,
) -> Result<HttpResponse, ApiError> {
    let cv = state.store.get_cv(req.cv_id).await?;
    if !passport.may_act_for(cv.graduate_id) {
        return Err(ApiError::Forbidden(format!(
            "CV {} belongs to another graduate",
            cv.id
        )));
    }

    let skill = state.store.get_skill(req.job_skill_id).await?;
    state.store.add_cv_skill(cv.id, skill.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "skill": skill })))
}

async fn list_cv_skills(_passport: Passport) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotImplemented(
        "Listing CV skills is not supported; read them from the CV".to_string(),
    ))
}
