// Integration tests for Jobmatch: the HTTP surface end to end

use actix_web::{test, web, App};
use jobmatch::core::{MatchOrchestrator, SimilarityEngine};
use jobmatch::models::{ErrorResponse, MatchResult, ScoringWeights};
use jobmatch::routes::{self, matches::AppState};
use jobmatch::services::{HttpEmbeddingProvider, SimilarityCache};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn fallback_state() -> AppState {
    AppState {
        matcher: MatchOrchestrator::with_default_weights(SimilarityEngine::fallback_only()),
    }
}

fn week_of(start: &str, end: &str) -> Value {
    let day = json!({"slots": [{"startTime": start, "endTime": end}]});
    json!({
        "Monday": day, "Tuesday": day, "Wednesday": day, "Thursday": day,
        "Friday": day, "Saturday": day, "Sunday": day
    })
}

fn nurse_profile() -> Value {
    json!({
        "selectedJobs": [
            {"title": "Nurse", "industry": "Healthcare", "skills": [{"name": "Patient Care", "yearsOfExperience": 4}]}
        ],
        "location": {"latitude": 40.7128, "longitude": -74.0060},
        "availability": week_of("09:00", "17:00")
    })
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(routes::json_config())
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_identical_profiles_score_100() {
    let app = init_app!(fallback_state());

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .set_json(json!({"userData": nurse_profile(), "itemData": nurse_profile()}))
        .to_request();
    let result: MatchResult = test::call_and_read_body_json(&app, req).await;

    assert_eq!(result.job_score, 40.0);
    assert_eq!(result.location_score, 30.0);
    assert_eq!(result.availability_score, 30.0);
    assert_eq!(result.score, 100.0);
}

#[actix_web::test]
async fn test_response_shape() {
    let app = init_app!(fallback_state());

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .set_json(json!({"userData": nurse_profile(), "itemData": {"selectedJobs": []}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    for key in ["score", "jobScore", "locationScore", "availabilityScore"] {
        assert!(body[key].is_f64(), "missing numeric {}", key);
    }
    assert_eq!(body["score"], 0.0);
    assert_eq!(body["breakdown"]["job"], 0.0);
}

#[actix_web::test]
async fn test_best_fitting_job_drives_score() {
    let app = init_app!(fallback_state());

    let candidate = json!({
        "selectedJobs": [
            {"title": "Nurse", "industry": "Healthcare", "skills": [{"name": "Patient Care"}]},
            {"title": "Cashier", "industry": "Retail", "skills": [{"name": "POS"}]}
        ]
    });
    let posting = json!({
        "selectedJobs": [
            {"title": "Registered Nurse", "industry": "Healthcare", "skills": [{"name": "Patient Care"}]}
        ]
    });

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .set_json(json!({"userData": candidate, "itemData": posting}))
        .to_request();
    let result: MatchResult = test::call_and_read_body_json(&app, req).await;

    // title 0.5 * 20 + industry 10 + skills 10
    assert_eq!(result.job_score, 30.0);
    assert_eq!(result.score, 30.0);
}

#[actix_web::test]
async fn test_partial_location_is_ignored() {
    let app = init_app!(fallback_state());

    let mut posting = nurse_profile();
    posting["location"] = json!({"latitude": 40.7128});

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .set_json(json!({"userData": nurse_profile(), "itemData": posting}))
        .to_request();
    let result: MatchResult = test::call_and_read_body_json(&app, req).await;

    assert_eq!(result.location_score, 0.0);
    assert_eq!(result.score, result.job_score + result.availability_score);
}

#[actix_web::test]
async fn test_date_keyed_availability_is_ignored() {
    let app = init_app!(fallback_state());

    let monday = json!({"slots": [{"startTime": "09:00", "endTime": "17:00"}]});
    let mut candidate = nurse_profile();
    candidate["availability"] = json!({"Monday": monday, "2024-03-04": {"slots": []}});
    let mut posting = nurse_profile();
    posting["availability"] = json!({"Monday": monday, "Tuesday": {"slots": null}});

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .set_json(json!({"userData": candidate, "itemData": posting}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let result: MatchResult = test::read_body_json(resp).await;
    assert_eq!(result.availability_score, 30.0);
    assert_eq!(result.score, 100.0);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = init_app!(fallback_state());

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_json");
}

#[actix_web::test]
async fn test_missing_item_data_is_bad_request() {
    let app = init_app!(fallback_state());

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .set_json(json!({"userData": nurse_profile()}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_out_of_range_location_fails_validation() {
    let app = init_app!(fallback_state());

    let mut candidate = nurse_profile();
    candidate["location"] = json!({"latitude": 140.0, "longitude": 0.0});

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .set_json(json!({"userData": candidate, "itemData": nurse_profile()}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Validation failed");
}

#[actix_web::test]
async fn test_five_factor_profile_over_http() {
    let state = AppState {
        matcher: MatchOrchestrator::new(SimilarityEngine::fallback_only(), ScoringWeights::five_factor()),
    };
    let app = init_app!(state);

    let mut candidate = nurse_profile();
    candidate["overviewResponses"] = json!({"Why nursing?": "I care for people"});
    candidate["payRange"] = json!({"min": 30.0});
    let mut posting = nurse_profile();
    posting["overview"] = json!("care for people");
    posting["payRange"] = json!({"min": 32.0, "max": 45.0});

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .set_json(json!({"userData": candidate, "itemData": posting}))
        .to_request();
    let result: MatchResult = test::call_and_read_body_json(&app, req).await;

    assert_eq!(result.location_score, 0.0);
    assert_eq!(result.availability_score, 0.0);
    assert_eq!(result.score, result.job_score);
    assert_eq!(result.breakdown.len(), 5);
    assert!(result.score > 70.0 && result.score <= 100.0);
}

#[actix_web::test]
async fn test_http_embedding_provider_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": [{"embedding": [0.6, 0.8, 0.0]}]}"#)
        .expect_at_least(1)
        .create_async()
        .await;

    let provider = HttpEmbeddingProvider::new(
        server.url(),
        "paraphrase-MiniLM-L6-v2".to_string(),
        None,
        Duration::from_secs(5),
    )
    .unwrap();
    let cache = Arc::new(SimilarityCache::new(1_000, None));
    let engine = SimilarityEngine::new(Arc::new(provider), Some(cache.clone()));
    let app = init_app!(AppState {
        matcher: MatchOrchestrator::with_default_weights(engine),
    });

    let mut posting = nurse_profile();
    posting["selectedJobs"][0]["title"] = json!("Charge Nurse");

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .set_json(json!({"userData": nurse_profile(), "itemData": posting}))
        .to_request();
    let result: MatchResult = test::call_and_read_body_json(&app, req).await;

    // Every text maps to the same vector, so every comparison is a perfect match
    assert!((result.job_score - 40.0).abs() < 1e-6);
    mock.assert_async().await;

    cache.sync().await;
    assert_eq!(cache.stats().entries, 3);
}

#[actix_web::test]
async fn test_embedding_outage_falls_back() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/embeddings")
        .with_status(500)
        .expect_at_least(1)
        .create_async()
        .await;

    let provider = HttpEmbeddingProvider::new(
        server.url(),
        "paraphrase-MiniLM-L6-v2".to_string(),
        None,
        Duration::from_secs(5),
    )
    .unwrap();
    let app = init_app!(AppState {
        matcher: MatchOrchestrator::with_default_weights(SimilarityEngine::new(Arc::new(provider), None)),
    });

    let mut posting = nurse_profile();
    posting["selectedJobs"][0]["title"] = json!("Registered Nurse");

    let req = test::TestRequest::post()
        .uri("/calculate-match")
        .set_json(json!({"userData": nurse_profile(), "itemData": posting}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let result: MatchResult = test::read_body_json(resp).await;
    // Word overlap: title 0.5 * 20 + industry 10 + skills 10
    assert_eq!(result.job_score, 30.0);
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = init_app!(fallback_state());

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "degraded");
    assert_eq!(body["similarityMode"], "fallback");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
