// Core algorithm exports
pub mod availability;
pub mod distance;
pub mod job_score;
pub mod matcher;
pub mod scoring;
pub mod similarity;

pub use availability::{availability_score, OverlapPolicy};
pub use distance::{distance_score, haversine_distance};
pub use job_score::{JobScoreAggregator, PairScore};
pub use matcher::{MatchError, MatchOrchestrator};
pub use scoring::{overview_score, pay_score};
pub use similarity::{jaccard_similarity, ComparisonDomain, Similarity, SimilarityEngine};
