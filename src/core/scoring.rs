use crate::core::similarity::{ComparisonDomain, Similarity, SimilarityEngine};
use crate::models::Profile;

/// Pay compatibility in `[0, 1]`
///
/// Compares the posting's best total pay (`payRange.max` plus `tipRange.max`
/// when tips are advertised) to the candidate's desired floor
/// (`payRange.min`). Pay at the floor scores 0; 50% above it scores 1.
/// Missing data or a non-positive floor scores 0.
pub fn pay_score(candidate: &Profile, posting: &Profile) -> f64 {
    let Some(desired_min) = candidate.pay_range.and_then(|p| p.min) else {
        return 0.0;
    };
    let Some(mut offer_max) = posting.pay_range.and_then(|p| p.max) else {
        return 0.0;
    };

    if let Some(tip_max) = posting.tip_range.and_then(|t| t.max) {
        offer_max += tip_max;
    }

    if !desired_min.is_finite() || !offer_max.is_finite() || desired_min <= 0.0 {
        return 0.0;
    }

    if offer_max >= desired_min {
        ((offer_max - desired_min) / (desired_min * 0.5)).min(1.0)
    } else {
        0.0
    }
}

/// Similarity of the posting's overview to the candidate's self-description
///
/// `None` when either side has no overview text.
pub async fn overview_score(engine: &SimilarityEngine, candidate: &Profile, posting: &Profile) -> Option<Similarity> {
    let posting_text = posting.overview_text()?;
    let candidate_text = candidate.overview_text()?;

    Some(
        engine
            .similarity(&posting_text, &candidate_text, &ComparisonDomain::Overview)
            .await,
    )
}
