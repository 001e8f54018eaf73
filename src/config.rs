use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::core::OverlapPolicy;
use crate::models::{ScoringWeights, WeightsError};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_true")]
    pub probe_on_startup: bool,
}

impl EmbeddingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            api_key: None,
            timeout_secs: None,
            probe_on_startup: true,
        }
    }
}

fn default_true() -> bool { true }
fn default_embedding_endpoint() -> String { "http://localhost:8080".to_string() }
fn default_embedding_model() -> String { "sentence-transformers/paraphrase-MiniLM-L6-v2".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub max_capacity: Option<u64>,
    /// Absent means entries live for the process lifetime
    pub ttl_secs: Option<u64>,
}

impl CacheSettings {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: None,
            ttl_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Explicit `factor -> weight` map; overrides `profile` when present
    pub weights: Option<HashMap<String, f64>>,
    #[serde(default = "default_max_distance_meters")]
    pub max_distance_meters: f64,
    #[serde(default)]
    pub merge_overlapping_slots: bool,
}

impl ScoringSettings {
    /// Resolve and validate the configured weights
    pub fn weights(&self) -> Result<ScoringWeights, WeightsError> {
        match &self.weights {
            Some(named) => ScoringWeights::from_named(named),
            None => ScoringWeights::profile(&self.profile),
        }
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        if self.merge_overlapping_slots {
            OverlapPolicy::MergeOverlapping
        } else {
            OverlapPolicy::CrossProduct
        }
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            weights: None,
            max_distance_meters: default_max_distance_meters(),
            merge_overlapping_slots: false,
        }
    }
}

fn default_profile() -> String { "three_factor".to_string() }
fn default_max_distance_meters() -> f64 { 50_000.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with JOBMATCH)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., JOBMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Honour the conventional unprefixed variables for the embedding provider
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(endpoint) = env::var("EMBEDDING_ENDPOINT") {
        builder = builder.set_override("embedding.endpoint", endpoint)?;
    }
    if let Ok(api_key) = env::var("EMBEDDING_API_KEY") {
        builder = builder.set_override("embedding.api_key", api_key)?;
    }

    builder.build()
}
