use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::{
    availability::{availability_score, OverlapPolicy},
    distance::{distance_score, DEFAULT_MAX_DISTANCE_M},
    job_score::{best_total, JobScoreAggregator, PairScore},
    scoring::{overview_score, pay_score},
    similarity::SimilarityEngine,
};
use crate::models::{Factor, MatchResult, Profile, ScoreGroup, ScoringWeights};

/// Errors that abort a match computation
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{0} score is not a finite number")]
    NonFiniteScore(Factor),
}

/// Top-level scorer: candidate profile x posting profile -> composite score
///
/// Each weighted factor earns up to `weight * 100` points. Missing inputs
/// degrade their own factor to 0; they never fail the computation.
#[derive(Debug, Clone)]
pub struct MatchOrchestrator {
    jobs: JobScoreAggregator,
    weights: ScoringWeights,
    max_distance_m: f64,
    overlap_policy: OverlapPolicy,
}

impl MatchOrchestrator {
    pub fn new(engine: SimilarityEngine, weights: ScoringWeights) -> Self {
        Self {
            jobs: JobScoreAggregator::new(engine),
            weights,
            max_distance_m: DEFAULT_MAX_DISTANCE_M,
            overlap_policy: OverlapPolicy::default(),
        }
    }

    pub fn with_default_weights(engine: SimilarityEngine) -> Self {
        Self::new(engine, ScoringWeights::default())
    }

    pub fn with_max_distance(mut self, max_distance_m: f64) -> Self {
        self.max_distance_m = max_distance_m;
        self
    }

    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn engine(&self) -> &SimilarityEngine {
        self.jobs.engine()
    }

    /// Score `candidate` against `posting`
    ///
    /// The candidate is the reference side for availability. A non-finite
    /// factor fails the whole computation rather than returning a partial score.
    pub async fn compute_match(&self, candidate: &Profile, posting: &Profile) -> Result<MatchResult, MatchError> {
        let needs_pairs = [Factor::Job, Factor::Title, Factor::Industry, Factor::Skills]
            .iter()
            .any(|f| self.weights.contains(*f));
        let pairs = if needs_pairs {
            self.jobs
                .pair_scores(&candidate.selected_jobs, &posting.selected_jobs)
                .await
        } else {
            Vec::new()
        };

        if pairs.iter().any(|p| p.degraded) {
            tracing::debug!("Job similarity computed in fallback mode");
        }

        let mut breakdown = BTreeMap::new();
        for factor in self.weights.factors() {
            let points = self.weights.points(factor);
            let value = match factor {
                Factor::Job => best_total(&pairs, points),
                Factor::Location => distance_score(
                    candidate.location.as_ref(),
                    posting.location.as_ref(),
                    self.max_distance_m,
                    points,
                ),
                Factor::Availability => availability_score(
                    candidate.availability.as_ref(),
                    posting.availability.as_ref(),
                    points,
                    self.overlap_policy,
                ),
                Factor::Title => best_signal(&pairs, |p| p.title) * points,
                Factor::Industry => best_signal(&pairs, |p| p.industry) * points,
                Factor::Skills => best_signal(&pairs, |p| p.skills) * points,
                Factor::Overview => {
                    overview_score(self.engine(), candidate, posting)
                        .await
                        .map(|s| s.value())
                        .unwrap_or(0.0)
                        * points
                }
                Factor::Pay => pay_score(candidate, posting) * points,
            };

            if !value.is_finite() {
                return Err(MatchError::NonFiniteScore(factor));
            }
            tracing::debug!("{} score: {:.2}/{}", factor, value, points);
            breakdown.insert(factor, value);
        }

        let job_score = group_total(&breakdown, ScoreGroup::Job);
        let location_score = group_total(&breakdown, ScoreGroup::Location);
        let availability_score = group_total(&breakdown, ScoreGroup::Availability);
        let score = job_score + location_score + availability_score;

        tracing::info!(
            "Match score {:.2} (job {:.2}, location {:.2}, availability {:.2})",
            score,
            job_score,
            location_score,
            availability_score
        );

        Ok(MatchResult {
            score,
            job_score,
            location_score,
            availability_score,
            breakdown,
        })
    }
}

fn best_signal(pairs: &[PairScore], signal: impl Fn(&PairScore) -> f64) -> f64 {
    pairs.iter().map(signal).fold(0.0, f64::max)
}

fn group_total(breakdown: &BTreeMap<Factor, f64>, group: ScoreGroup) -> f64 {
    breakdown
        .iter()
        .filter(|(factor, _)| factor.group() == group)
        .map(|(_, points)| *points)
        .sum()
}
