use actix_web::{web, HttpResponse};
use serde_json::json;

use super::{acting_as, require_graduate, ApiError, AppState};
use crate::models::{ApplicationRequest, Passport, UserId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/application", web::post().to(apply))
        .route("/application", web::get().to(list_applications))
        .route("/application/job/{job_id}", web::get().to(applications_for_job))
        .route(
            "/application/graduate/{graduate_id}",
            web::get().to(applications_of_graduate),
        )
        .route(
            "/application/{job_id}/{graduate_id}",
            web::get().to(get_application),
        );
}

async fn apply(
    state: web::Data<AppState>,
    passport: Passport,
    req: web::Json<ApplicationRequest>,
) -> Result<HttpResponse, ApiError> {
    require_graduate(&passport)?;
    let graduate_id = acting_as(&passport, req.graduate_id)?;

    let application = state.store.create_application(req.job_id, graduate_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "job_application": application })))
}

async fn list_applications(
    state: web::Data<AppState>,
    _passport: Passport,
) -> Result<HttpResponse, ApiError> {
    let applications = state.store.list_applications(None, None).await?;

    Ok(HttpResponse::Ok().json(json!({ "job_applications": applications })))
}

async fn applications_for_job(
    state: web::Data<AppState>,
    _passport: Passport,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let applications = state
        .store
        .list_applications(Some(path.into_inner()), None)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "job_applications": applications })))
}

async fn applications_of_graduate(
    state: web::Data<AppState>,
    _passport: Passport,
    path: web::Path<UserId>,
) -> Result<HttpResponse, ApiError> {
    let applications = state
        .store
        .list_applications(None, Some(path.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "job_applications": applications })))
}

async fn get_application(
    state: web::Data<AppState>,
    _passport: Passport,
    path: web::Path<(i64, UserId)>,
) -> Result<HttpResponse, ApiError> {
    let (job_id, graduate_id) = path.into_inner();
    let application = state.store.find_application(job_id, graduate_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "job_application": application })))
}
