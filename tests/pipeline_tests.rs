//! Integration tests for the retrieval pipeline against a real database.
//!
//! Covers cache hits and expiry, per-owner scoping, and scheduled eviction.

use formarr::config::{AuthConfig, SchedulerConfig};
use formarr::db::Store;
use formarr::models::{FieldType, FormField, GeneratedForm};
use formarr::prompt::extract_keywords;
use formarr::scheduler::Scheduler;
use formarr::services::{EmbeddingService, RetrievalService};

async fn test_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("formarr-pipeline-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open test store")
}

fn retrieval(store: &Store) -> RetrievalService {
    RetrievalService::new(store.clone(), EmbeddingService::new(None))
}

async fn seed_user(store: &Store, email: &str) -> i32 {
    store
        .create_user(email, "changeme123", &AuthConfig::default())
        .await
        .expect("failed to seed user")
        .id
}

fn sample_form(title: &str, keywords: &[&str]) -> GeneratedForm {
    GeneratedForm {
        title: title.to_string(),
        purpose: format!("Collect {title} data"),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        fields: vec![FormField {
            name: "email".to_string(),
            field_type: FieldType::Email,
            required: true,
            placeholder: None,
            options: None,
        }],
    }
}

#[tokio::test]
async fn test_cached_result_survives_new_matching_forms() {
    let store = test_store().await;
    let user_id = seed_user(&store, "owner@example.com").await;
    let service = retrieval(&store);

    store
        .create_form(
            user_id,
            &sample_form("Event Registration", &["event", "registration"]),
            None,
        )
        .await
        .unwrap();

    let query = "event registration signup";
    let keywords = extract_keywords(query);

    let first = service
        .retrieve(user_id, query, &keywords, false, 5, 3600)
        .await
        .unwrap();
    assert_eq!(first.len(), 1);

    // A newly created match stays invisible while the cached result is fresh
    store
        .create_form(user_id, &sample_form("Second Event", &["event"]), None)
        .await
        .unwrap();

    let second = service
        .retrieve(user_id, query, &keywords, false, 5, 3600)
        .await
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, first[0].id);
}

#[tokio::test]
async fn test_expired_cache_entry_forces_recompute() {
    let store = test_store().await;
    let user_id = seed_user(&store, "owner@example.com").await;
    let service = retrieval(&store);

    store
        .create_form(user_id, &sample_form("Event Registration", &["event"]), None)
        .await
        .unwrap();

    let query = "event signup";
    let keywords = extract_keywords(query);

    // Negative TTL expires the entry immediately
    let first = service
        .retrieve(user_id, query, &keywords, false, 5, -1)
        .await
        .unwrap();
    assert_eq!(first.len(), 1);

    store
        .create_form(user_id, &sample_form("Second Event", &["event"]), None)
        .await
        .unwrap();

    let second = service
        .retrieve(user_id, query, &keywords, false, 5, 3600)
        .await
        .unwrap();
    assert_eq!(second.len(), 2);
}

#[tokio::test]
async fn test_retrieval_scoped_to_owner() {
    let store = test_store().await;
    let first_user = seed_user(&store, "first@example.com").await;
    let second_user = seed_user(&store, "second@example.com").await;
    let service = retrieval(&store);

    store
        .create_form(
            first_user,
            &sample_form("First Feedback", &["feedback"]),
            None,
        )
        .await
        .unwrap();
    store
        .create_form(
            second_user,
            &sample_form("Second Feedback", &["feedback"]),
            None,
        )
        .await
        .unwrap();

    let query = "customer feedback";
    let matched = service
        .retrieve(first_user, query, &extract_keywords(query), false, 5, 3600)
        .await
        .unwrap();

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].user_id, first_user);
}

#[tokio::test]
async fn test_cache_hit_drops_deleted_forms() {
    let store = test_store().await;
    let user_id = seed_user(&store, "owner@example.com").await;
    let service = retrieval(&store);

    let kept = store
        .create_form(user_id, &sample_form("Kept Survey", &["survey"]), None)
        .await
        .unwrap();
    let doomed = store
        .create_form(user_id, &sample_form("Doomed Survey", &["survey"]), None)
        .await
        .unwrap();

    let query = "a survey about snacks";
    let keywords = extract_keywords(query);

    let first = service
        .retrieve(user_id, query, &keywords, false, 5, 3600)
        .await
        .unwrap();
    assert_eq!(first.len(), 2);

    store.delete_form_cascade(doomed.id).await.unwrap();

    // The stale cached id resolves to nothing and drops out silently
    let second = service
        .retrieve(user_id, query, &keywords, false, 5, 3600)
        .await
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, kept.id);
}

#[tokio::test]
async fn test_keyword_match_respects_limit() {
    let store = test_store().await;
    let user_id = seed_user(&store, "owner@example.com").await;
    let service = retrieval(&store);

    for n in 1..=3 {
        store
            .create_form(user_id, &sample_form(&format!("Survey {n}"), &["survey"]), None)
            .await
            .unwrap();
    }

    let query = "another survey";
    let matched = service
        .retrieve(user_id, query, &extract_keywords(query), false, 2, 3600)
        .await
        .unwrap();

    assert_eq!(matched.len(), 2);
    assert!(matched[0].id < matched[1].id);
}

#[tokio::test]
async fn test_embedding_mode_without_backend_returns_empty() {
    let store = test_store().await;
    let user_id = seed_user(&store, "owner@example.com").await;
    let service = retrieval(&store);

    store
        .create_form(user_id, &sample_form("Event Registration", &["event"]), None)
        .await
        .unwrap();

    // No embedding backend configured: no matches, and no keyword fallback
    let query = "event signup";
    let matched = service
        .retrieve(user_id, query, &extract_keywords(query), true, 5, 3600)
        .await
        .unwrap();
    assert!(matched.is_empty());
}

#[tokio::test]
async fn test_cache_upsert_is_last_writer_wins() {
    let store = test_store().await;
    let user_id = seed_user(&store, "owner@example.com").await;

    store
        .put_cached_retrieval("hash-x", user_id, &[1], 3600)
        .await
        .unwrap();
    store
        .put_cached_retrieval("hash-x", user_id, &[2, 3], 3600)
        .await
        .unwrap();

    assert_eq!(
        store.get_cached_retrieval("hash-x").await.unwrap(),
        Some(vec![2, 3])
    );
}

#[tokio::test]
async fn test_clear_expired_cache_removes_only_expired_rows() {
    let store = test_store().await;
    let user_id = seed_user(&store, "owner@example.com").await;

    store
        .put_cached_retrieval("live-hash", user_id, &[1, 2], 3600)
        .await
        .unwrap();
    store
        .put_cached_retrieval("stale-hash", user_id, &[3], -5)
        .await
        .unwrap();
    store
        .put_cached_value("live-key", &serde_json::json!({"v": 1}), 3600)
        .await
        .unwrap();
    store
        .put_cached_value("stale-key", &serde_json::json!({"v": 2}), -5)
        .await
        .unwrap();

    let (retrievals, values) = store.clear_expired_cache().await.unwrap();
    assert_eq!(retrievals, 1);
    assert_eq!(values, 1);

    assert!(
        store
            .get_cached_retrieval("live-hash")
            .await
            .unwrap()
            .is_some()
    );
    assert!(store.get_cached_value("live-key").await.unwrap().is_some());
}

#[tokio::test]
async fn test_scheduler_run_once_clears_expired_rows() {
    let store = test_store().await;
    let user_id = seed_user(&store, "owner@example.com").await;

    store
        .put_cached_retrieval("stale-hash", user_id, &[1], -5)
        .await
        .unwrap();

    let scheduler = Scheduler::new(store.clone(), SchedulerConfig::default());
    scheduler.run_once().await.expect("cleanup should succeed");

    // Nothing left for a second sweep to remove
    let (retrievals, values) = store.clear_expired_cache().await.unwrap();
    assert_eq!(retrievals, 0);
    assert_eq!(values, 0);
}
