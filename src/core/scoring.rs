use crate::models::{JobRequirements, RoleId, ScoringProfile, ScoringWeights, SkillSet};

/// Per-factor breakdown of an affinity score
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Affinity {
    pub gpa: f64,
    pub role: f64,
    pub skills: f64,
}

impl Affinity {
    #[inline]
    pub fn total(&self) -> f64 {
        self.gpa + self.role + self.skills
    }
}

/// Score a job posting against a graduate's profile
///
/// Scoring formula, starting from zero for every posting:
/// score = (
///     (gpa - 2.5) * 10             # only when gpa > 2.5
///     + 10 + yoe * 5               # only when target role == posting role
///     + 3 * shared_skills          # skills required by the posting and held by the graduate
/// )
///
/// GPA and experience are the graduate's.
pub fn score_job(
    profile: &ScoringProfile,
    job: &JobRequirements,
    weights: &ScoringWeights,
) -> Affinity {
    Affinity {
        gpa: gpa_bonus(profile.gpa, weights),
        role: role_bonus(
            profile.target_role_id,
            job.role_id,
            profile.years_of_experience,
            weights,
        ),
        skills: skill_bonus(&profile.skill_ids, &job.skill_ids, weights),
    }
}

/// Score another graduate against the seeker's profile
///
/// Same formula as [`score_job`], but GPA and experience come from the
/// candidate being scored, not from the seeker.
pub fn score_peer(
    seeker: &ScoringProfile,
    candidate: &ScoringProfile,
    weights: &ScoringWeights,
) -> Affinity {
    Affinity {
        gpa: gpa_bonus(candidate.gpa, weights),
        role: role_bonus(
            seeker.target_role_id,
            candidate.target_role_id,
            candidate.years_of_experience,
            weights,
        ),
        skills: skill_bonus(&seeker.skill_ids, &candidate.skill_ids, weights),
    }
}

/// GPA points above the floor, zero at or below it
#[inline]
pub fn gpa_bonus(gpa: f64, weights: &ScoringWeights) -> f64 {
    if gpa > weights.gpa_floor {
        (gpa - weights.gpa_floor) * weights.gpa_multiplier
    } else {
        0.0
    }
}

/// Flat bonus plus experience points when both sides target the same role
#[inline]
pub fn role_bonus(
    wanted: RoleId,
    offered: RoleId,
    years_of_experience: f64,
    weights: &ScoringWeights,
) -> f64 {
    if wanted == offered {
        weights.role_match + years_of_experience * weights.experience
    } else {
        0.0
    }
}

#[inline]
fn skill_bonus(a: &SkillSet, b: &SkillSet, weights: &ScoringWeights) -> f64 {
    shared_skill_count(a, b) as f64 * weights.shared_skill
}

/// Number of skill ids held by both sets
#[inline]
pub fn shared_skill_count(a: &SkillSet, b: &SkillSet) -> usize {
    a.intersection(b).count()
}
