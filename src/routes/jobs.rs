use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use super::{require_employer, require_graduate, ApiError, AppState};
use crate::models::{
    CloseJobRequest, CreateJobRequest, JobPosting, JobSkillRequest, JobsResponse, Passport, UserId,
};

/// Configure all job-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/jobs", web::get().to(list_open_jobs))
        .route("/jobs", web::post().to(create_job))
        .route("/jobs/filtered", web::get().to(filtered_jobs_for_caller))
        .route("/jobs/filtered/{graduate_id}", web::get().to(filtered_jobs))
        .route("/jobs/skills", web::post().to(add_job_skill))
        .route("/jobs/close", web::post().to(close_job))
        .route("/jobs/hidden", web::get().to(hidden_jobs));
}

async fn list_open_jobs(
    state: web::Data<AppState>,
    passport: Passport,
) -> Result<HttpResponse, ApiError> {
    require_graduate(&passport)?;

    let jobs = state.store.load_open_jobs().await?;

    Ok(HttpResponse::Ok().json(JobsResponse { jobs }))
}

/// POST /api/v1/jobs
///
/// The caller becomes the owner of the posting.
async fn create_job(
    state: web::Data<AppState>,
    passport: Passport,
    req: web::Json<CreateJobRequest>,
) -> Result<HttpResponse, ApiError> {
    require_employer(&passport)?;
    req.validate()?;

    let job = state
        .store
        .create_job(&req.title, req.yoe, req.role_id, passport.id)
        .await?;

    tracing::info!("Employer {} published job {}", passport.id, job.id);

    Ok(HttpResponse::Ok().json(json!({ "job": job })))
}

async fn filtered_jobs_for_caller(
    state: web::Data<AppState>,
    passport: Passport,
) -> Result<HttpResponse, ApiError> {
    eligible_jobs(&state, passport.id).await
}

async fn filtered_jobs(
    state: web::Data<AppState>,
    _passport: Passport,
    path: web::Path<UserId>,
) -> Result<HttpResponse, ApiError> {
    eligible_jobs(&state, path.into_inner()).await
}

/// Open postings the graduate's CV scores high enough for
async fn eligible_jobs(state: &AppState, graduate_id: UserId) -> Result<HttpResponse, ApiError> {
    let cv = state.store.load_cv_for_graduate(graduate_id).await?;
    let candidates = state.store.load_open_jobs().await?;

    tracing::info!(
        "Ranking {} open jobs for graduate {}",
        candidates.len(),
        graduate_id
    );

    let jobs = state.matcher.rank_jobs(&cv, candidates);

    Ok(HttpResponse::Ok().json(JobsResponse { jobs }))
}

async fn owned_job(
    state: &AppState,
    passport: &Passport,
    job_id: i64,
) -> Result<JobPosting, ApiError> {
    require_employer(passport)?;

    let job = state.store.get_job(job_id).await?;
    if !passport.admin && job.employer_id != Some(passport.id) {
        return Err(ApiError::Forbidden(format!(
            "Job {} belongs to another employer",
            job_id
        )));
    }

    Ok(job)
}

async fn add_job_skill(
    state: web::Data<AppState>,
    passport: Passport,
    req: web::Json<JobSkillRequest>,
) -> Result<HttpResponse, ApiError> {
    owned_job(&state, &passport, req.job_id).await?;

    state.store.add_job_skill(req.job_id, req.job_skill_id).await?;
    let job = state.store.get_job(req.job_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "tree": job.tree })))
}

async fn close_job(
    state: web::Data<AppState>,
    passport: Passport,
    req: web::Json<CloseJobRequest>,
) -> Result<HttpResponse, ApiError> {
    owned_job(&state, &passport, req.id).await?;

    state.store.set_recruiting(req.id, req.is_recruiting).await?;
    let job = state.store.get_job(req.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "job_update": job })))
}

async fn hidden_jobs(
    state: web::Data<AppState>,
    _passport: Passport,
) -> Result<HttpResponse, ApiError> {
    let jobs = state.store.load_closed_jobs().await?;

    Ok(HttpResponse::Ok().json(JobsResponse { jobs }))
}
