use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use jobmatch::config::Settings;
use jobmatch::core::{MatchOrchestrator, SimilarityEngine};
use jobmatch::routes::{self, matches::AppState};
use jobmatch::services::{HttpEmbeddingProvider, SimilarityCache};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Build the similarity engine, dropping to fallback-only if the model is unusable
async fn build_engine(settings: &Settings) -> SimilarityEngine {
    if !settings.embedding.enabled {
        info!("Embedding model disabled, using word-overlap similarity");
        return SimilarityEngine::fallback_only();
    }

    let provider = match HttpEmbeddingProvider::new(
        settings.embedding.endpoint.clone(),
        settings.embedding.model.clone(),
        settings.embedding.api_key.clone(),
        settings.embedding.timeout(),
    ) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            warn!("Failed to create embedding client ({}), falling back to basic matching", e);
            return SimilarityEngine::fallback_only();
        }
    };

    let cache = if settings.cache.enabled {
        let capacity = settings.cache.max_capacity.unwrap_or(10_000);
        info!(
            "Similarity cache initialized ({} entries, TTL: {:?})",
            capacity,
            settings.cache.ttl_secs
        );
        Some(Arc::new(SimilarityCache::new(capacity, settings.cache.ttl())))
    } else {
        None
    };

    let engine = SimilarityEngine::new(provider, cache);

    if settings.embedding.probe_on_startup {
        if let Err(e) = engine.probe().await {
            warn!(
                "Embedding model at {} failed to initialize ({}), falling back to basic matching",
                settings.embedding.endpoint, e
            );
            return SimilarityEngine::fallback_only();
        }
    }

    info!(
        "Embedding model {} ready at {}",
        settings.embedding.model, settings.embedding.endpoint
    );
    engine
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting jobmatch scoring service...");

    // Weights are validated once, here
    let weights = settings.scoring.weights().unwrap_or_else(|e| {
        error!("Invalid scoring weights: {}", e);
        panic!("Configuration error: {}", e);
    });

    let engine = build_engine(&settings).await;

    let matcher = MatchOrchestrator::new(engine, weights.clone())
        .with_max_distance(settings.scoring.max_distance_meters)
        .with_overlap_policy(settings.scoring.overlap_policy());

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState { matcher };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
