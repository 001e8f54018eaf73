// Service exports
pub mod cache;
pub mod embedding;

pub use cache::{CacheStats, SimilarityCache, SimilarityKey};
pub use embedding::{EmbeddingError, EmbeddingProvider, HttpEmbeddingProvider};
