//! Smoke tests for core web flows used by the frontend.

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use formarr::config::Config;
use formarr::services::{GenerationBackend, SchemaGenerator};
use formarr::state::SharedState;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

/// Always answers with the same conference registration schema.
struct CannedBackend;

#[async_trait::async_trait]
impl GenerationBackend for CannedBackend {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(r#"{
            "title": "Conference Registration",
            "purpose": "Collect attendee details",
            "fields": [
                {"name": "full_name", "type": "text", "required": true},
                {"name": "email", "type": "email", "required": true},
                {"name": "badge_photo", "type": "image", "required": false}
            ]
        }"#
        .to_string())
    }
}

async fn spawn_app() -> (Arc<formarr::api::AppState>, Router) {
    let db_path =
        std::env::temp_dir().join(format!("formarr-smoke-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let mut shared = SharedState::new(config)
        .await
        .expect("failed to create shared state");
    shared.generator = Arc::new(SchemaGenerator::new(vec![Arc::new(CannedBackend)]));

    let state = formarr::api::create_app_state(Arc::new(shared), None);
    let router = formarr::api::router(state.clone()).await;
    (state, router)
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, api_key: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn signup(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            None,
            &serde_json::json!({"email": email, "password": "changeme123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["data"]["api_key"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn smoke_signup_generate_share_submit_review() {
    let (_, app) = spawn_app().await;
    let api_key = signup(&app, "organizer@example.com").await;

    // Describe the form; the canned backend answers predictably.
    let generate_response = app
        .clone()
        .oneshot(post_json(
            "/api/forms/generate",
            Some(&api_key),
            &serde_json::json!({"prompt": "conference registration with badge photo"}),
        ))
        .await
        .unwrap();
    assert_eq!(generate_response.status(), StatusCode::CREATED);

    let generate_json = body_json(generate_response).await;
    let form_id = generate_json["data"]["id"].as_i64().unwrap();
    let share_token = generate_json["data"]["share_token"]
        .as_str()
        .unwrap()
        .to_string();

    // The share link works without any credentials and hides owner data.
    let public_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/public/forms/{share_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(public_response.status(), StatusCode::OK);

    let public_json = body_json(public_response).await;
    assert_eq!(public_json["data"]["title"], "Conference Registration");
    assert_eq!(public_json["data"]["fields"].as_array().unwrap().len(), 3);
    assert!(public_json["data"]["id"].is_null());
    assert!(public_json["data"]["keywords"].is_null());

    let missing_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/public/forms/not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing_response.status(), StatusCode::NOT_FOUND);

    // Anonymous visitors submit responses, optionally with uploaded image URLs.
    let submit_response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/public/forms/{share_token}/submit"),
            None,
            &serde_json::json!({
                "responses": {"full_name": "Ada Lovelace", "email": "ada@example.com"},
                "image_urls": {"badge_photo": "https://cdn.example.com/badge.png"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(submit_response.status(), StatusCode::CREATED);

    let submit_json = body_json(submit_response).await;
    let submission_id = submit_json["data"]["submission_id"].as_i64().unwrap();
    assert!(submission_id > 0);

    let bad_submit_response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/public/forms/{share_token}/submit"),
            None,
            &serde_json::json!({"responses": ["not", "an", "object"]}),
        ))
        .await
        .unwrap();
    assert_eq!(bad_submit_response.status(), StatusCode::BAD_REQUEST);

    let orphan_submit = app
        .clone()
        .oneshot(post_json(
            "/api/public/forms/not-a-real-token/submit",
            None,
            &serde_json::json!({"responses": {"full_name": "Nobody"}}),
        ))
        .await
        .unwrap();
    assert_eq!(orphan_submit.status(), StatusCode::NOT_FOUND);

    // Second submission without image URLs.
    let second_submit = app
        .clone()
        .oneshot(post_json(
            &format!("/api/public/forms/{share_token}/submit"),
            None,
            &serde_json::json!({"responses": {"full_name": "Grace Hopper", "email": "grace@example.com"}}),
        ))
        .await
        .unwrap();
    assert_eq!(second_submit.status(), StatusCode::CREATED);

    // The owner reviews what came in.
    let list_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/forms/{form_id}/submissions"))
                .header("X-Api-Key", api_key.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(list_response.status(), StatusCode::OK);

    let list_json = body_json(list_response).await;
    assert_eq!(list_json["data"]["form_title"], "Conference Registration");
    let submissions = list_json["data"]["submissions"].as_array().unwrap();
    assert_eq!(submissions.len(), 2);

    // Newest first: Grace submitted last
    assert_eq!(submissions[0]["responses"]["full_name"], "Grace Hopper");
    assert_eq!(submissions[0]["image_urls"], serde_json::json!({}));
    assert_eq!(submissions[1]["responses"]["full_name"], "Ada Lovelace");
    assert_eq!(
        submissions[1]["image_urls"]["badge_photo"],
        "https://cdn.example.com/badge.png"
    );

    let form_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/forms/{form_id}"))
                .header("X-Api-Key", api_key.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let form_json = body_json(form_response).await;
    assert_eq!(form_json["data"]["submission_count"], serde_json::json!(2));

    // Clean out one submission; deleting it twice is a 404.
    let delete_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/forms/{form_id}/submissions/{submission_id}"))
                .header("X-Api-Key", api_key.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(delete_response.status(), StatusCode::OK);

    let repeat_delete = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/forms/{form_id}/submissions/{submission_id}"))
                .header("X-Api-Key", api_key.clone())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(repeat_delete.status(), StatusCode::NOT_FOUND);

    let list_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/forms/{form_id}/submissions"))
                .header("X-Api-Key", api_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let list_json = body_json(list_response).await;
    assert_eq!(list_json["data"]["submissions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn smoke_form_delete_cascades_to_submissions() {
    let (state, app) = spawn_app().await;
    let api_key = signup(&app, "owner@example.com").await;

    let generate_response = app
        .clone()
        .oneshot(post_json(
            "/api/forms/generate",
            Some(&api_key),
            &serde_json::json!({"prompt": "conference registration"}),
        ))
        .await
        .unwrap();
    assert_eq!(generate_response.status(), StatusCode::CREATED);

    let generate_json = body_json(generate_response).await;
    let form_id = i32::try_from(generate_json["data"]["id"].as_i64().unwrap()).unwrap();
    let share_token = generate_json["data"]["share_token"]
        .as_str()
        .unwrap()
        .to_string();

    for attendee in ["ada@example.com", "grace@example.com"] {
        let submit = app
            .clone()
            .oneshot(post_json(
                &format!("/api/public/forms/{share_token}/submit"),
                None,
                &serde_json::json!({"responses": {"email": attendee}}),
            ))
            .await
            .unwrap();
        assert_eq!(submit.status(), StatusCode::CREATED);
    }

    assert_eq!(
        state
            .store()
            .count_submissions_for_form(form_id)
            .await
            .unwrap(),
        2
    );

    let delete_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/forms/{form_id}"))
                .header("X-Api-Key", api_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(delete_response.status(), StatusCode::OK);

    assert_eq!(
        state
            .store()
            .count_submissions_for_form(form_id)
            .await
            .unwrap(),
        0
    );

    // The share link dies with the form.
    let public_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/public/forms/{share_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(public_response.status(), StatusCode::NOT_FOUND);
}
