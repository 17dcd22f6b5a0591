mod common;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hooswho::config::Config;
use hooswho::providers::FakeProvider;
use hooswho::server::{router, AppState, AskResponse, SessionCreated};
use hooswho::Assistant;

/// Serve the router on an ephemeral port and return its base URL
async fn spawn_app(assistant: Assistant) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(
        Arc::new(assistant),
        3,
        chrono::Duration::hours(2),
    ));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn create_session(client: &reqwest::Client, base: &str) -> String {
    let created: SessionCreated = client
        .post(format!("{}/api/sessions", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!created.welcome_acknowledged);
    created.session_id
}

#[tokio::test]
async fn test_end_to_end_question_over_http() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "Reach out to Jane Doe at ICF." }],
            "usage": { "input_tokens": 700, "output_tokens": 9 }
        })))
        .mount(&upstream)
        .await;

    let tmp = tempfile::TempDir::new().unwrap();
    let base = spawn_app(common::assistant_against(&upstream.uri(), &tmp)).await;
    let client = reqwest::Client::new();

    let health: serde_json::Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let id = create_session(&client, &base).await;
    let response = client
        .post(format!("{}/api/sessions/{}/messages", base, id))
        .json(&json!({ "message": "Who works at ICF?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let answer: AskResponse = response.json().await.unwrap();
    assert_eq!(answer.reply, "Reach out to Jane Doe at ICF.");
    assert_eq!(answer.transcript_len, 2);
}

#[tokio::test]
async fn test_sessions_have_independent_rate_windows() {
    let tmp = tempfile::TempDir::new().unwrap();
    let fake = FakeProvider::new();
    for _ in 0..3 {
        fake.push_reply("ok");
    }
    let mut config = Config::default();
    config.security.max_queries_per_window = 1;
    let assistant = common::assistant_with(Arc::new(fake.clone()), &tmp, &config);
    let base = spawn_app(assistant).await;
    let client = reqwest::Client::new();

    let first = create_session(&client, &base).await;
    let second = create_session(&client, &base).await;

    let ask = |id: String| {
        let client = client.clone();
        let base = base.clone();
        async move {
            client
                .post(format!("{}/api/sessions/{}/messages", base, id))
                .json(&json!({ "message": "Who works at ICF?" }))
                .send()
                .await
                .unwrap()
                .status()
        }
    };

    assert_eq!(ask(first.clone()).await, 200);
    assert_eq!(ask(first).await, 429);
    assert_eq!(ask(second).await, 200);
    assert_eq!(fake.requests().len(), 2);
    assert!(common::read_audit(&tmp).contains("WARNING - Rate limit exceeded"));
}

#[tokio::test]
async fn test_busy_session_is_conflict() {
    let tmp = tempfile::TempDir::new().unwrap();
    let fake = FakeProvider::new();
    fake.push_hang(std::time::Duration::from_secs(2));
    let assistant = common::assistant_with(Arc::new(fake.clone()), &tmp, &Config::default());
    let base = spawn_app(assistant).await;
    let client = reqwest::Client::new();
    let id = create_session(&client, &base).await;
    let url = format!("{}/api/sessions/{}/messages", base, id);

    let slow = tokio::spawn({
        let client = client.clone();
        let url = url.clone();
        async move {
            client
                .post(url)
                .json(&json!({ "message": "Who works at ICF?" }))
                .send()
                .await
                .unwrap()
                .status()
        }
    });

    // Wait until the first question is in flight
    for _ in 0..100 {
        if !fake.requests().is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let status = client
        .post(&url)
        .json(&json!({ "message": "Who works at Capital One?" }))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, 409);

    let status = client.get(&url).send().await.unwrap().status();
    assert_eq!(status, 409);
    let status = client.delete(&url).send().await.unwrap().status();
    assert_eq!(status, 409);

    assert!(slow.await.unwrap().is_success());
    let status = client.get(&url).send().await.unwrap().status();
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_ended_session_is_gone() {
    let tmp = tempfile::TempDir::new().unwrap();
    let fake = FakeProvider::new();
    let assistant = common::assistant_with(Arc::new(fake), &tmp, &Config::default());
    let base = spawn_app(assistant).await;
    let client = reqwest::Client::new();
    let id = create_session(&client, &base).await;

    let session_url = format!("{}/api/sessions/{}", base, id);
    let status = client.delete(&session_url).send().await.unwrap().status();
    assert_eq!(status, 204);

    let status = client
        .get(format!("{}/messages", session_url))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(status, 404);
}
