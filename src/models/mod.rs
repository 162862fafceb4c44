// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AdmissionThresholds, CurriculumVitae, Friendship, JobApplication, JobPosting, JobRequirements,
    JobRole, JobSkill, Message, Passport, PublicUser, RoleId, ScoringProfile, ScoringWeights,
    SkillId, SkillSet, UserId,
};
pub use requests::{
    ApplicationRequest, CatalogEntryRequest, CloseJobRequest, CreateCvRequest, CreateJobRequest,
    CvSkillRequest, FriendshipRequest, JobSkillRequest, LoginRequest, MessageRequest,
    RegistrationRequest,
};
pub use responses::{CvsResponse, ErrorResponse, HealthResponse, JobsResponse, TokenResponse};
