//! Live push integration tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test ws_tests

use std::time::Duration;

use futures_util::StreamExt;
use integration_tests::{assert_json, check_test_env, fixtures::*, TestServer};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest,
        http::{header::AUTHORIZATION, HeaderValue},
        Error as WsError, Message,
    },
    MaybeTlsStream, WebSocketStream,
};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(server: &TestServer, path: &str, token: Option<&str>) -> Result<Socket, WsError> {
    let mut request = server.ws_url(path).into_client_request()?;
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header");
        request.headers_mut().insert(AUTHORIZATION, value);
    }
    let (socket, _) = connect_async(request).await?;
    Ok(socket)
}

/// Next text frame as JSON, skipping heartbeats
async fn next_event(socket: &mut Socket) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for a live event")
            .expect("socket closed")
            .expect("socket error");

        match frame {
            Message::Text(text) => return serde_json::from_str(&text).expect("json frame"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_club_live_receives_new_messages() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let club_id = seed_public_club(&server).await.unwrap();

    // Guests may watch public clubs
    let mut socket = connect(&server, &format!("/clubs/{club_id}/live"), None)
        .await
        .expect("connect");

    let response = server
        .post_auth(
            &format!("/clubs/{club_id}/messages"),
            &alice.token,
            &PostMessage::new("Chapter one thoughts"),
        )
        .await
        .unwrap();
    let posted: ClubMessage = assert_json(response, StatusCode::CREATED).await.unwrap();

    let event = next_event(&mut socket).await;
    assert_eq!(event["event"], "message.created");
    assert_eq!(event["data"]["id"], posted.id);
    assert_eq!(event["data"]["body"], "Chapter one thoughts");
    assert_eq!(event["data"]["user"]["id"], alice.id);
}

#[tokio::test]
async fn test_club_live_replays_after_cursor() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let club_id = seed_public_club(&server).await.unwrap();
    let path = format!("/clubs/{club_id}/messages");

    let mut ids = Vec::new();
    for body in ["first", "second", "third"] {
        let response = server
            .post_auth(&path, &alice.token, &PostMessage::new(body))
            .await
            .unwrap();
        let message: ClubMessage = assert_json(response, StatusCode::CREATED).await.unwrap();
        ids.push(message.id);
    }

    let mut socket = connect(&server, &format!("/clubs/{club_id}/live?after={}", ids[0]), None)
        .await
        .expect("connect");

    let second = next_event(&mut socket).await;
    let third = next_event(&mut socket).await;
    assert_eq!(second["data"]["id"], ids[1]);
    assert_eq!(third["data"]["id"], ids[2]);
}

#[tokio::test]
async fn test_private_club_live_rejects_outsiders() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = seed_user(&server, "owner").await.unwrap();
    let outsider = seed_user(&server, "outsider").await.unwrap();

    let response = server
        .post_auth("/clubs", &owner.token, &CreateClub::unique())
        .await
        .unwrap();
    let club: Club = assert_json(response, StatusCode::CREATED).await.unwrap();

    let live = format!("/clubs/{}/live", club.id);
    match connect(&server, &live, Some(&outsider.token)).await {
        Err(WsError::Http(response)) => assert_eq!(response.status(), 403),
        other => panic!("expected 403, got {:?}", other.map(|_| ())),
    }

    connect(&server, &live, Some(&owner.token))
        .await
        .expect("owner can watch");
}

#[tokio::test]
async fn test_dm_live_requires_approved_participant() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let bob = seed_user(&server, "bob").await.unwrap();

    let response = server
        .post_empty_auth(&format!("/dm/{}", bob.id), &alice.token)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    let started: ConversationStart = response.json().await.unwrap();
    let live = format!("/api/dm/{}/live", started.conversation_id);

    match connect(&server, &live, None).await {
        Err(WsError::Http(response)) => assert_eq!(response.status(), 401),
        other => panic!("expected 401, got {:?}", other.map(|_| ())),
    }

    // Bob has not accepted yet
    match connect(&server, &live, Some(&bob.token)).await {
        Err(WsError::Http(response)) => assert_eq!(response.status(), 403),
        other => panic!("expected 403, got {:?}", other.map(|_| ())),
    }

    let response = server
        .post_auth(
            &format!("/dm-requests/{}/accept", started.conversation_id),
            &bob.token,
            &json!({}),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut socket = connect(&server, &live, Some(&bob.token))
        .await
        .expect("connect");

    let response = server
        .post_auth(
            &format!("/api/dm/{}/messages", started.conversation_id),
            &alice.token,
            &PostMessage::new("Welcome aboard"),
        )
        .await
        .unwrap();
    let sent: DirectMessage = assert_json(response, StatusCode::CREATED).await.unwrap();

    let event = next_event(&mut socket).await;
    assert_eq!(event["event"], "direct_message.created");
    assert_eq!(event["data"]["id"], sent.id);
    assert_eq!(event["data"]["conversation_id"], started.conversation_id);
    assert_eq!(event["data"]["sender"]["id"], alice.id);
}
