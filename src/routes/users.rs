use actix_web::{web, HttpResponse};
use serde_json::json;

use super::{ApiError, AppState};
use crate::models::{CvsResponse, Passport, UserId};
use crate::services::UserKind;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/user/graduate", web::get().to(list_graduates))
        .route("/user/employer", web::get().to(list_employers))
        .route("/user/graduate/filtered", web::get().to(peers_for_caller))
        .route("/user/graduate/filtered/{graduate_id}", web::get().to(peers));
}

async fn list_graduates(
    state: web::Data<AppState>,
    _passport: Passport,
) -> Result<HttpResponse, ApiError> {
    let graduates = state.store.list_users(UserKind::Graduate).await?;

    Ok(HttpResponse::Ok().json(json!({ "graduates": graduates })))
}

async fn list_employers(
    state: web::Data<AppState>,
    _passport: Passport,
) -> Result<HttpResponse, ApiError> {
    let employers = state.store.list_users(UserKind::Employer).await?;

    Ok(HttpResponse::Ok().json(json!({ "employers": employers })))
}

async fn peers_for_caller(
    state: web::Data<AppState>,
    passport: Passport,
) -> Result<HttpResponse, ApiError> {
    similar_graduates(&state, passport.id).await
}

async fn peers(
    state: web::Data<AppState>,
    _passport: Passport,
    path: web::Path<UserId>,
) -> Result<HttpResponse, ApiError> {
    similar_graduates(&state, path.into_inner()).await
}

/// Other graduates whose CVs are close to this graduate's
async fn similar_graduates(state: &AppState, graduate_id: UserId) -> Result<HttpResponse, ApiError> {
    let cv = state.store.load_cv_for_graduate(graduate_id).await?;
    let candidates = state.store.load_other_graduate_cvs(graduate_id).await?;

    let cvs = state.matcher.rank_peers(&cv, candidates);

    Ok(HttpResponse::Ok().json(CvsResponse { cvs }))
}
