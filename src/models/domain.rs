use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type UserId = i64;
pub type RoleId = i64;
pub type SkillId = i64;

/// Unique skill identifiers, the unit the scorer compares
pub type SkillSet = BTreeSet<SkillId>;

/// Public view of an account, never carries credential material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub graduate: bool,
    pub employer: bool,
}

impl PublicUser {
    pub fn passport(&self) -> Passport {
        Passport {
            id: self.id,
            admin: self.admin,
            graduate: self.graduate,
            employer: self.employer,
        }
    }
}

/// Identity and role flags carried inside an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    pub id: UserId,
    pub admin: bool,
    pub graduate: bool,
    pub employer: bool,
}

impl Passport {
    /// Admins may act on behalf of any user
    pub fn may_act_for(&self, user_id: UserId) -> bool {
        self.admin || self.id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRole {
    pub id: RoleId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSkill {
    pub id: SkillId,
    pub name: String,
}

/// Job posting published by an employer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    /// Minimum years of experience asked for
    pub yoe: f64,
    pub role_id: RoleId,
    #[serde(default)]
    pub role: Option<JobRole>,
    /// Required skills
    #[serde(default)]
    pub tree: Vec<JobSkill>,
    #[serde(default = "default_true")]
    pub is_recruiting: bool,
    #[serde(default)]
    pub employer_id: Option<UserId>,
}

impl JobPosting {
    pub fn requirements(&self) -> JobRequirements {
        JobRequirements {
            role_id: self.role_id,
            skill_ids: self.tree.iter().map(|s| s.id).collect(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A graduate's curriculum vitae
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumVitae {
    pub id: i64,
    pub gpa: f64,
    pub yoe: f64,
    pub graduate_id: UserId,
    pub job_role_id: RoleId,
    #[serde(default, rename = "user")]
    pub graduate: Option<PublicUser>,
    #[serde(default)]
    pub job_role: Option<JobRole>,
    #[serde(default)]
    pub tree: Vec<JobSkill>,
}

impl CurriculumVitae {
    pub fn profile(&self) -> ScoringProfile {
        ScoringProfile {
            gpa: self.gpa,
            years_of_experience: self.yoe,
            target_role_id: self.job_role_id,
            skill_ids: self.tree.iter().map(|s| s.id).collect(),
        }
    }
}

/// What the scorer reads from a CV
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringProfile {
    pub gpa: f64,
    pub years_of_experience: f64,
    pub target_role_id: RoleId,
    pub skill_ids: SkillSet,
}

/// What the scorer reads from a job posting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequirements {
    pub role_id: RoleId,
    pub skill_ids: SkillSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: i64,
    pub graduate_id: UserId,
    pub job_id: i64,
    #[serde(default)]
    pub graduate: Option<PublicUser>,
    #[serde(default)]
    pub job: Option<JobPosting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friendship {
    pub id: i64,
    pub from: UserId,
    pub to: UserId,
    #[serde(default)]
    pub from_user: Option<PublicUser>,
    #[serde(default)]
    pub to_user: Option<PublicUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Message {
    /// Unordered participant pair, identical for both directions
    pub fn conversation_key(&self) -> (UserId, UserId) {
        if self.sender_id <= self.receiver_id {
            (self.sender_id, self.receiver_id)
        } else {
            (self.receiver_id, self.sender_id)
        }
    }
}

/// Point values of the affinity formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// GPA above this earns points
    pub gpa_floor: f64,
    pub gpa_multiplier: f64,
    pub role_match: f64,
    /// Points per year of experience on a role match
    pub experience: f64,
    /// Points per shared skill
    pub shared_skill: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            gpa_floor: 2.5,
            gpa_multiplier: 10.0,
            role_match: 10.0,
            experience: 5.0,
            shared_skill: 3.0,
        }
    }
}

/// Minimum score for a candidate to be admitted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmissionThresholds {
    pub job: f64,
    pub peer: f64,
}

impl Default for AdmissionThresholds {
    fn default() -> Self {
        Self {
            job: 15.0,
            peer: 10.0,
        }
    }
}
