use serde::{Deserialize, Serialize};
use crate::models::domain::{CurriculumVitae, JobPosting};

/// Job postings under the `jobs` field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobPosting>,
}

/// Graduate CVs under the `cvs` field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvsResponse {
    pub cvs: Vec<CurriculumVitae>,
}

/// Response for a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
