use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::services::{EmbeddingError, EmbeddingProvider, SimilarityCache, SimilarityKey};

/// What kind of text is being compared.
///
/// The domain decides the prefix the embedding model sees. Using the same
/// variant for the same field type keeps scores comparable across calls and
/// keeps cache keys stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonDomain {
    JobTitle { industry: String },
    Industry,
    Skill { industry: String },
    Overview,
}

impl ComparisonDomain {
    pub fn prefix(&self) -> Option<String> {
        match self {
            ComparisonDomain::JobTitle { industry } => Some(format!("Job title in {} industry", industry)),
            ComparisonDomain::Skill { industry } => Some(format!("Skill in {}", industry)),
            ComparisonDomain::Industry | ComparisonDomain::Overview => None,
        }
    }

    fn apply(&self, text: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{}: {}", prefix, text),
            None => text.to_string(),
        }
    }
}

/// A similarity in `[0, 1]`, tagged with how it was computed.
///
/// The tag reports the engine's mode, not a model call per value: with a
/// provider configured, an empty or whitespace-only input yields
/// `Embedded(0.0)` without consulting the model (see [`Similarity::empty_input`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Similarity {
    /// Cosine similarity of sentence embeddings, or 0 for empty input in
    /// embedding mode
    Embedded(f64),
    /// Jaccard similarity of lowercase word sets
    Fallback(f64),
}

impl Similarity {
    /// Score for a comparison where one side has no text. Never computed by
    /// the model; tagged `Embedded` so an empty field is not reported as a
    /// degraded signal.
    pub fn empty_input() -> Self {
        Similarity::Embedded(0.0)
    }

    pub fn value(&self) -> f64 {
        match self {
            Similarity::Embedded(v) | Similarity::Fallback(v) => *v,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Similarity::Fallback(_))
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Similarity::Embedded(v) => write!(f, "{:.4} (embedding)", v),
            Similarity::Fallback(v) => write!(f, "{:.4} (fallback)", v),
        }
    }
}

/// Jaccard similarity of whitespace-separated, lowercased word sets.
///
/// Returns 0 if either side has no words.
pub fn jaccard_similarity(text_a: &str, text_b: &str) -> f64 {
    let a_lower = text_a.to_lowercase();
    let b_lower = text_b.to_lowercase();
    let words_a: HashSet<&str> = a_lower.split_whitespace().collect();
    let words_b: HashSet<&str> = b_lower.split_whitespace().collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count() as f64;
    let union = words_a.union(&words_b).count() as f64;

    intersection / union
}

/// Cosine similarity clamped to `[0, 1]`; negative similarity counts as none
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch(a.len(), b.len()));
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(EmbeddingError::DegenerateVector);
    }

    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !cosine.is_finite() {
        return Err(EmbeddingError::DegenerateVector);
    }

    Ok(cosine.clamp(0.0, 1.0))
}

/// Bounded text similarity with a lexical fallback
///
/// With an embedding provider, texts are encoded (prefixed by their
/// comparison domain) and compared by cosine. Without one, or whenever the
/// provider fails, the Jaccard fallback answers instead. Errors never reach
/// the caller; they surface as `Similarity::Fallback`.
#[derive(Clone, Default)]
pub struct SimilarityEngine {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    cache: Option<Arc<SimilarityCache>>,
}

impl SimilarityEngine {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, cache: Option<Arc<SimilarityCache>>) -> Self {
        Self {
            provider: Some(provider),
            cache,
        }
    }

    pub fn fallback_only() -> Self {
        Self::default()
    }

    pub fn is_embedding_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub fn cache(&self) -> Option<&SimilarityCache> {
        self.cache.as_deref()
    }

    /// Encode a probe sentence to confirm the provider is usable
    pub async fn probe(&self) -> Result<(), EmbeddingError> {
        match &self.provider {
            Some(provider) => provider.encode("test sentence").await.map(|_| ()),
            None => Ok(()),
        }
    }

    pub async fn similarity(&self, text_a: &str, text_b: &str, domain: &ComparisonDomain) -> Similarity {
        let Some(provider) = &self.provider else {
            return Similarity::Fallback(jaccard_similarity(text_a, text_b));
        };

        if text_a.trim().is_empty() || text_b.trim().is_empty() {
            return Similarity::empty_input();
        }

        let key = SimilarityKey::new(text_a, text_b, domain);
        if let Some(cache) = &self.cache {
            if let Some(value) = cache.get(&key).await {
                return Similarity::Embedded(value);
            }
        }

        match self.embedded(provider.as_ref(), text_a, text_b, domain).await {
            Ok(value) => {
                tracing::trace!("Similarity between '{}' and '{}': {}", text_a, text_b, value);
                if let Some(cache) = &self.cache {
                    cache.insert(key, value).await;
                }
                Similarity::Embedded(value)
            }
            Err(e) => {
                tracing::warn!(
                    "Embedding similarity failed ({}), falling back to word overlap",
                    e
                );
                Similarity::Fallback(jaccard_similarity(text_a, text_b))
            }
        }
    }

    async fn embedded(
        &self,
        provider: &dyn EmbeddingProvider,
        text_a: &str,
        text_b: &str,
        domain: &ComparisonDomain,
    ) -> Result<f64, EmbeddingError> {
        let (input_a, input_b) = (domain.apply(text_a), domain.apply(text_b));
        let (embedding_a, embedding_b) =
            tokio::try_join!(provider.encode(&input_a), provider.encode(&input_b))?;

        cosine_similarity(&embedding_a, &embedding_b)
    }
}

impl fmt::Debug for SimilarityEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityEngine")
            .field("model", &self.provider.as_ref().map(|p| p.model_name().to_string()))
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
