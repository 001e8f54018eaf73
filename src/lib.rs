//! Jobmatch - explainable job/candidate match scoring
//!
//! This library provides the scoring engine behind the `/calculate-match`
//! service: semantic similarity with a lexical fallback, geographic proximity,
//! weekly schedule overlap and their weighted combination into one composite
//! score with a per-factor breakdown.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchOrchestrator, Similarity, SimilarityEngine};
pub use models::{CalculateMatchRequest, MatchResult, Profile, ScoringWeights};
