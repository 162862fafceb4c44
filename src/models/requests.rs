use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub graduate: bool,
    #[serde(default)]
    pub employer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request to publish a job posting
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 0.0))]
    pub yoe: f64,
    #[validate(range(min = 1))]
    pub role_id: i64,
}

/// Attach a required skill to a job posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSkillRequest {
    pub job_id: i64,
    pub job_skill_id: i64,
}

/// Open or close a job posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseJobRequest {
    pub id: i64,
    #[serde(default)]
    pub is_recruiting: bool,
}

/// `graduate_id` defaults to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub job_id: i64,
    #[serde(default)]
    pub graduate_id: Option<i64>,
}

/// `from` defaults to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendshipRequest {
    #[serde(default)]
    pub from: Option<i64>,
    pub to: i64,
}

/// `sender_id` defaults to the caller
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MessageRequest {
    #[serde(default)]
    pub sender_id: Option<i64>,
    pub receiver_id: i64,
    #[validate(length(min = 1))]
    pub message: String,
}

/// `graduate_id` defaults to the caller
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCvRequest {
    #[validate(range(min = 0.0))]
    pub gpa: f64,
    #[validate(range(min = 0.0))]
    pub yoe: f64,
    #[validate(range(min = 1))]
    pub job_role_id: i64,
    #[serde(default)]
    pub graduate_id: Option<i64>,
}

/// Attach a skill to a CV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvSkillRequest {
    pub cv_id: i64,
    pub job_skill_id: i64,
}

/// Create a skill or a job role
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CatalogEntryRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_rejects_bad_email() {
        let req = RegistrationRequest {
            username: "ada".to_string(),
            password: "secret".to_string(),
            email: "not-an-email".to_string(),
            admin: false,
            graduate: true,
            employer: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_registration_rejects_empty_password() {
        let req: RegistrationRequest = serde_json::from_str(
            r#"{"username": "ada", "password": "", "email": "ada@example.com"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
        assert!(!req.graduate && !req.employer && !req.admin);
    }

    #[test]
    fn test_empty_message_rejected() {
        let req: MessageRequest =
            serde_json::from_str(r#"{"receiver_id": 2, "message": ""}"#).unwrap();
        assert!(req.validate().is_err());
        assert_eq!(req.sender_id, None);
    }

    #[test]
    fn test_job_request_needs_role() {
        let req = CreateJobRequest {
            title: "Backend engineer".to_string(),
            yoe: 1.0,
            role_id: 0,
        };
        assert!(req.validate().is_err());
    }
}
