use crate::core::scoring::{score_job, score_peer, Affinity};
use crate::models::{AdmissionThresholds, CurriculumVitae, JobPosting, ScoringWeights};

/// Filters candidates by their affinity with a graduate's CV
///
/// # Entry points
/// 1. `rank_jobs` - open job postings the graduate is eligible for
/// 2. `rank_peers` - other graduates worth contacting
///
/// Both are stable filters: admitted candidates keep their input order.
/// The caller is expected to pass only open postings, and never the
/// seeker's own CV.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    weights: ScoringWeights,
    thresholds: AdmissionThresholds,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, thresholds: AdmissionThresholds) -> Self {
        Self { weights, thresholds }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &AdmissionThresholds {
        &self.thresholds
    }

    /// Keep the job postings scoring at least the job threshold
    pub fn rank_jobs(&self, cv: &CurriculumVitae, candidates: Vec<JobPosting>) -> Vec<JobPosting> {
        let profile = cv.profile();

        admit(candidates, self.thresholds.job, |job| {
            let affinity = score_job(&profile, &job.requirements(), &self.weights);
            tracing::debug!(
                "cv {} vs job {}: gpa={} role={} skills={} total={}",
                cv.id,
                job.id,
                affinity.gpa,
                affinity.role,
                affinity.skills,
                affinity.total()
            );
            affinity
        })
    }

    /// Keep the other graduates' CVs scoring at least the peer threshold
    pub fn rank_peers(
        &self,
        cv: &CurriculumVitae,
        candidates: Vec<CurriculumVitae>,
    ) -> Vec<CurriculumVitae> {
        let seeker = cv.profile();

        admit(candidates, self.thresholds.peer, |candidate| {
            let affinity = score_peer(&seeker, &candidate.profile(), &self.weights);
            tracing::debug!(
                "cv {} vs cv {}: gpa={} role={} skills={} total={}",
                cv.id,
                candidate.id,
                affinity.gpa,
                affinity.role,
                affinity.skills,
                affinity.total()
            );
            affinity
        })
    }
}

fn admit<T, F>(candidates: Vec<T>, threshold: f64, score: F) -> Vec<T>
where
    F: Fn(&T) -> Affinity,
{
    let total = candidates.len();

    let admitted: Vec<T> = candidates
        .into_iter()
        .filter(|candidate| score(candidate).total() >= threshold)
        .collect();

    tracing::info!(
        "Admitted {} of {} candidates (threshold {})",
        admitted.len(),
        total,
        threshold
    );

    admitted
}
