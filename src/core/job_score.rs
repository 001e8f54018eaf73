use crate::core::similarity::{ComparisonDomain, SimilarityEngine};
use crate::models::{JobProfileEntry, Skill};

/// Points awarded for a perfect job fit under the default weights
pub const DEFAULT_JOB_POINTS: f64 = 40.0;

// Share of the job points earned by each comparison (20/10/10 of 40)
const TITLE_SHARE: f64 = 0.5;
const INDUSTRY_SHARE: f64 = 0.25;
const SKILLS_SHARE: f64 = 0.25;

/// Similarity signals of one candidate-job x posting-job pair, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PairScore {
    pub title: f64,
    pub industry: f64,
    /// Mean over required skills of the best matching held skill
    pub skills: f64,
    /// Set when any comparison used the lexical fallback
    pub degraded: bool,
}

impl PairScore {
    pub fn total(&self, max_points: f64) -> f64 {
        self.title * (max_points * TITLE_SHARE)
            + self.industry * (max_points * INDUSTRY_SHARE)
            + self.skills * (max_points * SKILLS_SHARE)
    }
}

/// Best total over all pairs, 0 when there are none
pub fn best_total(pairs: &[PairScore], max_points: f64) -> f64 {
    pairs.iter().map(|p| p.total(max_points)).fold(0.0, f64::max)
}

/// Scores how well a candidate's desired jobs fit a posting's jobs
///
/// Every candidate job is compared to every posting job and the best pair
/// wins, so an unrelated secondary job type never drags a candidate down.
#[derive(Debug, Clone)]
pub struct JobScoreAggregator {
    engine: SimilarityEngine,
}

impl JobScoreAggregator {
    pub fn new(engine: SimilarityEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    /// Job score in `[0, 40]`
    pub async fn job_score(&self, candidate_jobs: &[JobProfileEntry], posting_jobs: &[JobProfileEntry]) -> f64 {
        let pairs = self.pair_scores(candidate_jobs, posting_jobs).await;
        best_total(&pairs, DEFAULT_JOB_POINTS)
    }

    /// Signals for the full cross product; empty if either side is empty
    pub async fn pair_scores(
        &self,
        candidate_jobs: &[JobProfileEntry],
        posting_jobs: &[JobProfileEntry],
    ) -> Vec<PairScore> {
        let mut pairs = Vec::with_capacity(candidate_jobs.len() * posting_jobs.len());
        for candidate in candidate_jobs {
            for posting in posting_jobs {
                pairs.push(self.pair_score(candidate, posting).await);
            }
        }
        pairs
    }

    pub async fn pair_score(&self, candidate: &JobProfileEntry, posting: &JobProfileEntry) -> PairScore {
        let title_domain = ComparisonDomain::JobTitle {
            industry: candidate.industry.clone(),
        };
        let title = self
            .engine
            .similarity(&candidate.title, &posting.title, &title_domain)
            .await;
        let industry = self
            .engine
            .similarity(&candidate.industry, &posting.industry, &ComparisonDomain::Industry)
            .await;
        let (skills, skills_degraded) = self
            .skills_coverage(&posting.skills, &candidate.skills, &candidate.industry)
            .await;

        let pair = PairScore {
            title: title.value(),
            industry: industry.value(),
            skills,
            degraded: title.is_degraded() || industry.is_degraded() || skills_degraded,
        };

        tracing::debug!(
            "Job pair '{}' vs '{}': title {:.3}, industry {:.3}, skills {:.3}, total {:.2}/{}",
            candidate.title,
            posting.title,
            pair.title,
            pair.industry,
            pair.skills,
            pair.total(DEFAULT_JOB_POINTS),
            DEFAULT_JOB_POINTS
        );
        pair
    }

    /// Average over `required` of the best similarity among `held`
    async fn skills_coverage(&self, required: &[Skill], held: &[Skill], industry: &str) -> (f64, bool) {
        if required.is_empty() || held.is_empty() {
            return (0.0, false);
        }

        let domain = ComparisonDomain::Skill {
            industry: industry.to_string(),
        };
        let held: Vec<String> = held.iter().map(|s| s.name.to_lowercase()).collect();

        let mut sum = 0.0;
        let mut degraded = false;
        for skill in required {
            let wanted = skill.name.to_lowercase();
            let mut best = 0.0f64;
            for name in &held {
                let similarity = self.engine.similarity(&wanted, name, &domain).await;
                degraded |= similarity.is_degraded();
                best = best.max(similarity.value());
            }
            sum += best;
        }

        (sum / required.len() as f64, degraded)
    }
}
