//! HTTP API Tests
//!
//! Drives the full router (health, auth, sessions, tokens) with stub TTS and
//! room collaborators.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_health_check_is_public() {
    let mut config = test_config();
    config.worker_secret = Some("hook-secret".to_string());
    let (app, _) = stub_app(config, None, None);

    let response = send(&app, empty_request("GET", "/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "OK" }));
}

#[tokio::test]
async fn test_protected_routes_require_secret() {
    let mut config = test_config();
    config.worker_secret = Some("hook-secret".to_string());
    let (app, _) = stub_app(
        config,
        Some(StubTts::returning_samples(320)),
        Some(StubConnector::new()),
    );

    let body = json!({ "room_name": "lobby" });

    let response = send(&app, json_request("POST", "/start-session", body.clone())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_json(response).await["error"].is_string());

    let mut wrong = json_request("POST", "/start-session", body.clone());
    wrong
        .headers_mut()
        .insert("x-worker-secret", "nope".parse().unwrap());
    assert_eq!(send(&app, wrong).await.status(), StatusCode::UNAUTHORIZED);

    let mut right = json_request("POST", "/start-session", body.clone());
    right
        .headers_mut()
        .insert("x-worker-secret", "hook-secret".parse().unwrap());
    assert_eq!(send(&app, right).await.status(), StatusCode::ACCEPTED);

    let mut bearer = json_request("POST", "/start-session", body);
    bearer
        .headers_mut()
        .insert("authorization", "Bearer hook-secret".parse().unwrap());
    assert_eq!(send(&app, bearer).await.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_start_session_plays_greeting() {
    let tts = StubTts::returning_samples(1_000);
    let connector = StubConnector::new();
    let (app, _) = stub_app(test_config(), Some(tts.clone()), Some(connector.clone()));

    let response = send(
        &app,
        json_request(
            "POST",
            "/start-session",
            json!({
                "roomName": "support-42",
                "identity": "greeter",
                "greetingText": "Hello, thanks for calling",
                "sessionId": "call-1"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["session_id"], "call-1");
    assert_eq!(body["room_name"], "support-42");

    let finished = wait_for_terminal(&app, "call-1").await;
    assert_eq!(finished["status"], "completed");
    assert_eq!(finished["room_name"], "support-42");
    // 1000 samples at 320 per frame: three full frames and a 40-sample tail
    assert_eq!(finished["frames_delivered"], 4);
    assert_eq!(finished["samples_delivered"], 1_000);

    assert_eq!(
        tts.texts.lock().unwrap().as_slice(),
        ["Hello, thanks for calling"]
    );
    let activity = connector.activity.lock().unwrap();
    assert_eq!(activity.joined.len(), 1);
    assert_eq!(activity.joined[0].room_name, "support-42");
    assert_eq!(activity.joined[0].identity, "greeter");
    assert_eq!(activity.frames, 4);
    assert_eq!(activity.closed, 1);
}

#[tokio::test]
async fn test_session_alias_route() {
    let (app, _) = stub_app(
        test_config(),
        Some(StubTts::returning_samples(320)),
        Some(StubConnector::new()),
    );

    let response = send(
        &app,
        json_request("POST", "/session/start", json!({ "room": "lobby" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    let session_id = body["session_id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(session_id).is_ok());
}

#[tokio::test]
async fn test_session_without_greeting_is_skipped() {
    let connector = StubConnector::new();
    let (app, _) = stub_app(test_config(), None, Some(connector.clone()));

    let response = send(
        &app,
        json_request(
            "POST",
            "/start-session",
            json!({ "room_name": "lobby", "session_id": "quiet" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let finished = wait_for_terminal(&app, "quiet").await;
    assert_eq!(finished["status"], "skipped");
    assert!(connector.activity.lock().unwrap().joined.is_empty());
}

#[tokio::test]
async fn test_synthesis_failure_is_reported_as_skipped() {
    let connector = StubConnector::new();
    let (app, _) = stub_app(
        test_config(),
        Some(StubTts::failing()),
        Some(connector.clone()),
    );

    let response = send(
        &app,
        json_request(
            "POST",
            "/start-session",
            json!({ "room_name": "lobby", "greeting": "Hi", "session_id": "s-fail" }),
        ),
    )
    .await;
    // The caller is never told about upstream synthesis trouble
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let finished = wait_for_terminal(&app, "s-fail").await;
    assert_eq!(finished["status"], "skipped");
    assert!(
        finished["reason"]
            .as_str()
            .unwrap()
            .contains("voice service overloaded")
    );
    assert!(connector.activity.lock().unwrap().joined.is_empty());
}

#[tokio::test]
async fn test_start_session_validation() {
    let (app, _) = stub_app(
        test_config(),
        Some(StubTts::returning_samples(320)),
        Some(StubConnector::new()),
    );

    let missing_room = send(
        &app,
        json_request("POST", "/start-session", json!({ "greeting": "Hi" })),
    )
    .await;
    assert_eq!(missing_room.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_json(missing_room).await["error"]
            .as_str()
            .unwrap()
            .contains("room_name")
    );

    let bad_room = send(
        &app,
        json_request("POST", "/start-session", json!({ "room_name": "lobby/../etc" })),
    )
    .await;
    assert_eq!(bad_room.status(), StatusCode::BAD_REQUEST);

    let long_greeting = send(
        &app,
        json_request(
            "POST",
            "/start-session",
            json!({ "room_name": "lobby", "greeting": "a".repeat(2_001) }),
        ),
    )
    .await;
    assert_eq!(long_greeting.status(), StatusCode::BAD_REQUEST);

    let not_json = send(
        &app,
        axum::http::Request::builder()
            .method("POST")
            .uri("/start-session")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_session_unavailable_without_collaborators() {
    let (no_livekit, _) = stub_app(test_config(), Some(StubTts::returning_samples(320)), None);
    let response = send(
        &no_livekit,
        json_request("POST", "/start-session", json!({ "room_name": "lobby" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let (no_tts, _) = stub_app(test_config(), None, Some(StubConnector::new()));
    let response = send(
        &no_tts,
        json_request(
            "POST",
            "/start-session",
            json!({ "room_name": "lobby", "greeting": "Hi" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_default_greeting_applies() {
    let mut config = test_config();
    config.default_greeting = Some("Welcome to the room".to_string());
    let tts = StubTts::returning_samples(320);
    let (app, _) = stub_app(config, Some(tts.clone()), Some(StubConnector::new()));

    let response = send(
        &app,
        json_request(
            "POST",
            "/start-session",
            json!({ "room_name": "lobby", "session_id": "defaulted" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let finished = wait_for_terminal(&app, "defaulted").await;
    assert_eq!(finished["status"], "completed");
    assert_eq!(tts.texts.lock().unwrap().as_slice(), ["Welcome to the room"]);
}

#[tokio::test]
async fn test_cancel_in_flight_session() {
    // Ten seconds of audio keeps the session playing long enough to cancel
    let connector = StubConnector::new();
    let (app, state) = stub_app(
        test_config(),
        Some(StubTts::returning_samples(160_000)),
        Some(connector.clone()),
    );

    let response = send(
        &app,
        json_request(
            "POST",
            "/start-session",
            json!({ "room_name": "lobby", "greeting": "A long hello", "session_id": "long" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let duplicate = send(
        &app,
        json_request(
            "POST",
            "/start-session",
            json!({ "room_name": "lobby", "greeting": "Again", "session_id": "long" }),
        ),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(state.playbacks.active_count(), 1);

    let cancel = send(&app, empty_request("DELETE", "/sessions/long")).await;
    assert_eq!(cancel.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(cancel).await["status"], "cancelling");

    let finished = wait_for_terminal(&app, "long").await;
    assert_eq!(finished["status"], "cancelled");
    assert!(finished["frames_delivered"].as_u64().unwrap() < 500);
    assert_eq!(connector.activity.lock().unwrap().closed, 1);

    let again = send(&app, empty_request("DELETE", "/sessions/long")).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unknown_session() {
    let (app, _) = stub_app(test_config(), None, Some(StubConnector::new()));

    let status = send(&app, empty_request("GET", "/sessions/missing")).await;
    assert_eq!(status.status(), StatusCode::NOT_FOUND);

    let cancel = send(&app, empty_request("DELETE", "/sessions/missing")).await;
    assert_eq!(cancel.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sessions_refused_after_shutdown() {
    let (app, state) = stub_app(
        test_config(),
        Some(StubTts::returning_samples(320)),
        Some(StubConnector::new()),
    );
    state.playbacks.cancel_all();

    let response = send(
        &app,
        json_request("POST", "/start-session", json!({ "room_name": "lobby" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(state.playbacks.wait_for_shutdown(Duration::from_secs(1)).await);
}

#[tokio::test]
async fn test_livekit_token() {
    let mut config = test_config();
    config.livekit_url = "wss://rooms.example.com".to_string();
    config.livekit_api_key = Some("devkey".to_string());
    config.livekit_api_secret = Some("a-secret-long-enough-for-hs256-signing".to_string());
    let (app, _) = stub_app(config, None, None);

    let response = send(
        &app,
        json_request(
            "POST",
            "/livekit/token",
            json!({ "roomName": "support-42", "identity": "caller-7", "participantName": "Caller" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["url"], "wss://rooms.example.com");
    assert_eq!(body["room_name"], "support-42");
    assert_eq!(body["identity"], "caller-7");

    let claims = livekit_api::access_token::TokenVerifier::with_api_key(
        "devkey",
        "a-secret-long-enough-for-hs256-signing",
    )
    .verify(body["token"].as_str().unwrap())
    .unwrap();
    assert_eq!(claims.sub, "caller-7");
    assert_eq!(claims.video.room, "support-42");
    assert!(claims.video.room_join);
}

#[tokio::test]
async fn test_livekit_token_errors() {
    let (unconfigured, _) = stub_app(test_config(), None, None);
    let response = send(
        &unconfigured,
        json_request(
            "POST",
            "/livekit/token",
            json!({ "room_name": "lobby", "participant_identity": "caller" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let mut config = test_config();
    config.livekit_api_key = Some("devkey".to_string());
    config.livekit_api_secret = Some("a-secret-long-enough-for-hs256-signing".to_string());
    let (app, _) = stub_app(config, None, None);

    let missing_identity = send(
        &app,
        json_request("POST", "/livekit/token", json!({ "room_name": "lobby" })),
    )
    .await;
    assert_eq!(missing_identity.status(), StatusCode::BAD_REQUEST);

    let bad_room = send(
        &app,
        json_request(
            "POST",
            "/livekit/token",
            json!({ "room_name": "no spaces", "participant_identity": "caller" }),
        ),
    )
    .await;
    assert_eq!(bad_room.status(), StatusCode::BAD_REQUEST);
}
