//! Drives the HTTP router end to end with an in-process conversation service.

use api_lib::{
    config::Config,
    web::{self, state::AppState, SESSION_HEADER},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;
use wellness_core::{
    ports::{ConversationService, DialogueContext, PortError, PortResult},
    Fragment, Reply, FALLBACK_REPLY,
};

//=========================================================================================
// Test Doubles
//=========================================================================================

/// Streams back "echo: " plus the message, or fails when the message says "fail".
struct EchoService {
    calls: Arc<AtomicUsize>,
}

struct EchoDialogue {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ConversationService for EchoService {
    async fn start_dialogue(&self) -> PortResult<Box<dyn DialogueContext>> {
        Ok(Box::new(EchoDialogue {
            calls: self.calls.clone(),
        }))
    }
}

#[async_trait]
impl DialogueContext for EchoDialogue {
    async fn send(&mut self, text: &str) -> PortResult<Reply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains("fail") {
            return Err(PortError::Remote("quota exceeded".to_string()));
        }
        Ok(Reply::from_fragments(vec![
            Fragment::text("echo: "),
            Fragment::without_text("{role: assistant}"),
            Fragment::text(text.to_string()),
        ]))
    }
}

fn app(chat_service: Option<Arc<dyn ConversationService>>) -> Router {
    let config = Arc::new(Config::from_map(&HashMap::new()).unwrap());
    let state = Arc::new(AppState::new(config, chat_service));
    web::router(state, HeaderValue::from_static("http://localhost:3000"))
}

fn echo_app() -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let service: Arc<dyn ConversationService> = Arc::new(EchoService {
        calls: calls.clone(),
    });
    (app(Some(service)), calls)
}

//=========================================================================================
// Helpers
//=========================================================================================

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    session: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn open_session(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/sessions", None, None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

//=========================================================================================
// Tests
//=========================================================================================

#[tokio::test]
async fn status_reports_missing_credential() {
    let app = app(None);
    let (status, body) = send(&app, "GET", "/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chat_connected"], json!(false));
    assert!(body["notice"].as_str().unwrap().contains("GOOGLE_API_KEY"));

    let (app, _) = echo_app();
    let (_, body) = send(&app, "GET", "/status", None, None).await;
    assert_eq!(body["chat_connected"], json!(true));
    assert_eq!(body["notice"], Value::Null);
}

#[tokio::test]
async fn chat_turn_is_recorded_in_history() {
    let (app, _) = echo_app();
    let session = open_session(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(&session),
        Some(json!({ "message": "I feel tense" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], json!("echo: I feel tense"));
    assert_eq!(body["skipped"], json!(false));

    let (_, history) = send(&app, "GET", "/chat/history", Some(&session), None).await;
    assert_eq!(
        history,
        json!([
            { "speaker": "user", "text": "I feel tense" },
            { "speaker": "assistant", "text": "echo: I feel tense" },
        ])
    );
}

#[tokio::test]
async fn failed_chat_turn_keeps_only_the_user_turn() {
    let (app, _) = echo_app();
    let session = open_session(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/chat",
        Some(&session),
        Some(json!({ "message": "please fail" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], Value::Null);
    assert!(body["warning"].as_str().unwrap().contains("quota exceeded"));

    let (_, history) = send(&app, "GET", "/chat/history", Some(&session), None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_chat_message_is_skipped() {
    let (app, calls) = echo_app();
    let session = open_session(&app).await;

    let (_, body) = send(&app, "POST", "/chat", Some(&session), Some(json!({ "message": "  " }))).await;
    assert_eq!(body["skipped"], json!(true));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let (_, history) = send(&app, "GET", "/chat/history", Some(&session), None).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn unconfigured_chat_replies_with_fallback() {
    let app = app(None);
    let (_, created) = send(&app, "POST", "/sessions", None, None).await;
    assert_eq!(created["chat_connected"], json!(false));
    let session = created["session_id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, "POST", "/chat", Some(&session), Some(json!({ "message": "hi" }))).await;
    assert_eq!(body["reply"], json!(FALLBACK_REPLY));
}

#[tokio::test]
async fn sessions_do_not_share_state() {
    let (app, _) = echo_app();
    let first = open_session(&app).await;
    let second = open_session(&app).await;

    send(&app, "POST", "/chat", Some(&first), Some(json!({ "message": "hello" }))).await;

    let (_, history) = send(&app, "GET", "/chat/history", Some(&second), None).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn session_header_is_required_and_checked() {
    let (app, _) = echo_app();

    let (status, _) = send(&app, "GET", "/chat/history", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/chat/history", Some("not-a-uuid"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = uuid::Uuid::new_v4().to_string();
    let (status, _) = send(&app, "GET", "/chat/history", Some(&unknown), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mood_entries_are_listed_newest_first() {
    let app = app(None);
    let session = open_session(&app).await;

    let (status, saved) = send(
        &app,
        "POST",
        "/mood",
        Some(&session),
        Some(json!({ "mood": "Bad", "notes": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["notes"], Value::Null);

    send(&app, "POST", "/mood", Some(&session), Some(json!({ "mood": "very_good", "notes": "sunny" }))).await;
    send(&app, "POST", "/mood", Some(&session), Some(json!({}))).await;

    let (_, moods) = send(&app, "GET", "/mood", Some(&session), None).await;
    let labels: Vec<_> = moods
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["mood"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(labels, vec!["Neutral", "Very Good", "Bad"]);

    let (_, limited) = send(&app, "GET", "/mood?limit=1", Some(&session), None).await;
    assert_eq!(limited.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "POST", "/mood", Some(&session), Some(json!({ "mood": "meh" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stress_levels_are_validated() {
    let app = app(None);
    let session = open_session(&app).await;

    let (status, entry) = send(&app, "POST", "/stress", Some(&session), Some(json!({ "level": 8 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["level"], json!(8));
    assert_eq!(entry["timestamp"].as_str().unwrap().len(), "2024-01-01 09:30".len());

    let (status, _) = send(&app, "POST", "/stress", Some(&session), Some(json!({ "level": 11 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, entries) = send(&app, "GET", "/stress", Some(&session), None).await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn journal_saves_overwrite_the_same_date() {
    let app = app(None);
    let session = open_session(&app).await;

    for text in ["first draft", "final thoughts"] {
        let (status, _) = send(
            &app,
            "POST",
            "/journal",
            Some(&session),
            Some(json!({ "date": "2024-06-01", "text": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, entries) = send(&app, "GET", "/journal", Some(&session), None).await;
    assert_eq!(
        entries,
        json!([{ "date": "2024-06-01", "text": "final thoughts" }])
    );
}

#[tokio::test]
async fn breathing_counter_and_reset() {
    let app = app(None);
    let session = open_session(&app).await;

    send(&app, "POST", "/breathing", Some(&session), None).await;
    let (_, body) = send(&app, "POST", "/breathing", Some(&session), None).await;
    assert_eq!(body["count"], json!(2));
    assert_eq!(
        body["message"],
        json!("Great job! You've completed 2 breathing exercises.")
    );
    assert!(body["instructions"]
        .as_str()
        .unwrap()
        .starts_with("Take a deep breath in for 4 seconds"));

    let (status, _) = send(&app, "POST", "/session/reset", Some(&session), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "POST", "/breathing", Some(&session), None).await;
    assert_eq!(body["count"], json!(1));
}

#[tokio::test]
async fn emotion_wheel_and_check_in() {
    let app = app(None);

    let (_, wheel) = send(&app, "GET", "/emotions", None, None).await;
    assert_eq!(wheel.as_array().unwrap().len(), 6);
    assert_eq!(wheel[0]["primary"], json!("Joy"));

    let (status, body) = send(
        &app,
        "POST",
        "/emotions/check-in",
        None,
        Some(json!({ "primary": "Anger", "secondary": "frustrated" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        json!("You're feeling: Frustrated (a form of Anger)")
    );

    let (status, _) = send(
        &app,
        "POST",
        "/emotions/check-in",
        None,
        Some(json!({ "primary": "Joy", "secondary": "Lonely" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quick_prompts_are_listed() {
    let app = app(None);
    let (_, body) = send(&app, "GET", "/prompts", None, None).await;
    assert_eq!(body["prompts"].as_array().unwrap().len(), 4);
    assert_eq!(body["prompts"][0], json!("How are you feeling today?"));
}

#[tokio::test]
async fn stress_relief_techniques_are_listed() {
    let app = app(None);
    let (status, body) = send(&app, "GET", "/stress-relief", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body[0],
        json!({
            "name": "3-3-3 Grounding Technique",
            "steps": [
                "Name 3 things you see",
                "Name 3 things you hear",
                "Move 3 parts of your body",
            ],
        })
    );
    assert_eq!(body[1]["name"], json!("Body Scan"));
}

#[tokio::test]
async fn deleted_session_is_no_longer_found() {
    let (app, _) = echo_app();
    let session = open_session(&app).await;
    send(&app, "POST", "/chat", Some(&session), Some(json!({ "message": "hello" }))).await;

    let (status, _) = send(&app, "DELETE", "/session", Some(&session), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/chat/history", Some(&session), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/session", Some(&session), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn idle_sessions_are_evicted_when_a_new_one_opens() {
    let config = Config::from_map(&HashMap::from([(
        "SESSION_IDLE_MINUTES".to_string(),
        "0".to_string(),
    )]))
    .unwrap();
    let state = Arc::new(AppState::new(Arc::new(config), None));
    let app = web::router(state.clone(), HeaderValue::from_static("http://localhost:3000"));

    let stale = open_session(&app).await;
    let fresh = open_session(&app).await;

    let (status, _) = send(&app, "GET", "/chat/history", Some(&stale), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/chat/history", Some(&fresh), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.sessions.live_count().await, 1);
}
