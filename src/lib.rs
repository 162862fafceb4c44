//! Gradjobs - job platform backend for graduates and employers
//!
//! Graduates publish a CV and look for postings, employers publish postings.
//! The core of the crate is the eligibility scorer that decides which open
//! postings suit a graduate and which other graduates are worth contacting.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{latest_per_conversation, score_job, score_peer, Affinity, Matcher};
pub use models::{
    AdmissionThresholds, CurriculumVitae, JobPosting, JobSkill, Passport, ScoringWeights,
};
