//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use bookclub_common::MessagingConfig;
use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::{header, StatusCode};
use serde_json::json;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/messages").await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "MISSING_AUTHORIZATION");

    let response = server.get_auth("/notifications", "not-a-jwt").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Club Feed Tests
// ============================================================================

#[tokio::test]
async fn test_guest_reads_public_club_but_cannot_post() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let club_id = seed_public_club(&server).await.unwrap();
    let path = format!("/clubs/{club_id}/messages");

    let response = server
        .post_auth(&path, &alice.token, &PostMessage::new("Hello readers"))
        .await
        .unwrap();
    let posted: ClubMessage = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(posted.club_id, club_id);
    assert_eq!(posted.kind, "text");

    let response = server.get(&path).await.unwrap();
    let page: Page<ClubMessage> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].body, "Hello readers");
    assert_eq!(page.data[0].user.as_ref().unwrap().id, alice.id);

    let response = server.post(&path, &PostMessage::new("guest")).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(club_message_count(&server, club_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_feed_cursors() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let club_id = seed_public_club(&server).await.unwrap();
    let path = format!("/clubs/{club_id}/messages");

    let mut ids = Vec::new();
    for i in 0..4 {
        let response = server
            .post_auth(&path, &alice.token, &PostMessage::new(format!("line {i}")))
            .await
            .unwrap();
        let message: ClubMessage = assert_json(response, StatusCode::CREATED).await.unwrap();
        ids.push(message.id);
    }

    let response = server.get(&format!("{path}?limit=2")).await.unwrap();
    let latest: Page<ClubMessage> = assert_json(response, StatusCode::OK).await.unwrap();
    let latest_ids: Vec<i64> = latest.data.iter().map(|m| m.id).collect();
    assert_eq!(latest_ids, vec![ids[3], ids[2]]);
    assert!(latest.pagination.has_more);
    assert_eq!(latest.pagination.limit, 2);

    let before = latest.pagination.before.unwrap();
    let response = server
        .get(&format!("{path}?before={before}&limit=2"))
        .await
        .unwrap();
    let older: Page<ClubMessage> = assert_json(response, StatusCode::OK).await.unwrap();
    let older_ids: Vec<i64> = older.data.iter().map(|m| m.id).collect();
    assert_eq!(older_ids, vec![ids[1], ids[0]]);

    let response = server
        .get(&format!("{path}?after={}", ids[2]))
        .await
        .unwrap();
    let newer: Page<ClubMessage> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(newer.data.len(), 1);
    assert_eq!(newer.data[0].id, ids[3]);

    let response = server.get(&format!("{path}?before=abc")).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_body_length_boundaries() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let club_id = seed_public_club(&server).await.unwrap();
    let path = format!("/clubs/{club_id}/messages");

    let response = server
        .post_auth(&path, &alice.token, &PostMessage::new("a".repeat(2000)))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(&path, &alice.token, &PostMessage::new("a".repeat(2001)))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY).await.unwrap();

    let response = server
        .post_auth(&path, &alice.token, &PostMessage::new("   "))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY).await.unwrap();

    assert_eq!(club_message_count(&server, club_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_muted_user_cannot_post() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let club_id = seed_public_club(&server).await.unwrap();
    mute_user(&server, alice.id).await.unwrap();

    let response = server
        .post_auth(
            &format!("/clubs/{club_id}/messages"),
            &alice.token,
            &PostMessage::new("let me speak"),
        )
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "USER_MUTED");
    assert!(body.error.message.starts_with("You are muted until"));
    assert_eq!(club_message_count(&server, club_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_post_throttle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start_with_messaging(MessagingConfig {
        post_throttle_per_minute: 2,
        ..MessagingConfig::default()
    })
    .await
    .expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let club_id = seed_public_club(&server).await.unwrap();
    let path = format!("/clubs/{club_id}/messages");

    for i in 0..2 {
        let response = server
            .post_auth(&path, &alice.token, &PostMessage::new(format!("msg {i}")))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server
        .post_auth(&path, &alice.token, &PostMessage::new("one too many"))
        .await
        .unwrap();
    assert_status(response, StatusCode::TOO_MANY_REQUESTS).await.unwrap();
    assert_eq!(club_message_count(&server, club_id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_rejected_posts_do_not_spend_throttle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start_with_messaging(MessagingConfig {
        post_throttle_per_minute: 1,
        ..MessagingConfig::default()
    })
    .await
    .expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let club_id = seed_public_club(&server).await.unwrap();
    let path = format!("/clubs/{club_id}/messages");

    let response = server
        .post_auth(&path, &alice.token, &PostMessage::new("   "))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY).await.unwrap();

    let response = server
        .post_auth(&path, &alice.token, &PostMessage::new("counted"))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
}

// ============================================================================
// Private Club Tests
// ============================================================================

#[tokio::test]
async fn test_private_club_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = seed_user(&server, "owner").await.unwrap();
    let bob = seed_user(&server, "bob").await.unwrap();

    let response = server
        .post_auth("/clubs", &owner.token, &CreateClub::unique())
        .await
        .unwrap();
    let club: Club = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(!club.is_public);
    assert_eq!(club.owner_id, Some(owner.id));
    assert_eq!(club.member_count, 1);

    let messages = format!("/clubs/{}/messages", club.id);

    // Outsiders and guests see nothing
    let response = server.get_auth(&messages, &bob.token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
    let response = server.get(&messages).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .post_empty_auth(&format!("/clubs/{}/join", club.id), &bob.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // Invitation lets bob in
    let response = server
        .post_auth(
            &format!("/clubs/{}/invites", club.id),
            &owner.token,
            &CreateInvitation {
                invitee_id: Some(bob.id),
                email: None,
            },
        )
        .await
        .unwrap();
    let invitation: Invitation = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(invitation.token.len(), 48);

    let accept = format!("/invites/{}/accept", invitation.token);
    let response = server.post_empty_auth(&accept, &bob.token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    let response = server.post_empty_auth(&accept, &bob.token).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = server
        .post_auth(&messages, &bob.token, &PostMessage::new("thanks for the invite"))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    // Rename and delete are owner only
    let club_path = format!("/clubs/{}", club.id);
    let response = server
        .patch_auth(&club_path, &bob.token, &json!({ "name": "Mine now" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .patch_auth(&club_path, &owner.token, &json!({ "name": "Renamed" }))
        .await
        .unwrap();
    let renamed: Club = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(renamed.name, "Renamed");
    assert_eq!(renamed.member_count, 2);

    let response = server.delete_auth(&club_path, &owner.token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    let response = server.get_auth(&messages, &owner.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_outsider_empty_post_is_forbidden() {
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

    // Membership is checked before the body
    let response = server
        .post_auth(
            &format!("/clubs/{}/messages", club.id),
            &outsider.token,
            &json!({ "body": "" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(club_message_count(&server, club.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_public_clubs_cannot_be_created_here() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();

    let response = server
        .post_auth(
            "/clubs",
            &alice.token,
            &json!({ "name": "Everyone", "is_public": true }),
        )
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(body.error.message, "Use admin flow to create public clubs.");
}

#[tokio::test]
async fn test_join_public_club_and_directory() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let club_id = seed_public_club(&server).await.unwrap();

    let response = server
        .post_empty_auth(&format!("/clubs/{club_id}/join"), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&format!("/clubs/{club_id}")).await.unwrap();
    let club: Club = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(club.member_count, 1);

    let response = server.get("/clubs?q=public%20club").await.unwrap();
    let directory: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(directory["page"], 1);
    assert!(directory["data"].as_array().is_some_and(|clubs| !clubs.is_empty()));
}

// ============================================================================
// Direct Message Tests
// ============================================================================

#[tokio::test]
async fn test_alice_and_bob_conversation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let bob = seed_user(&server, "bob").await.unwrap();

    // Alice starts the conversation and is redirected to the thread
    let response = server
        .post_empty_auth(&format!("/dm/{}", bob.id), &alice.token)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    let started: ConversationStart = response.json().await.unwrap();
    assert!(started.created);
    assert_eq!(location, format!("/messages/{}", started.conversation_id));
    assert_eq!(started.location, location);

    // Bob finds the same conversation
    let response = server
        .post_empty_auth(&format!("/dm/{}", alice.id), &bob.token)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    let again: ConversationStart = response.json().await.unwrap();
    assert!(!again.created);
    assert_eq!(again.conversation_id, started.conversation_id);

    // Bob got exactly one request notification
    let response = server.get_auth("/notifications", &bob.token).await.unwrap();
    let notifications: DataEnvelope<Vec<Notification>> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(notifications.data.len(), 1);
    let request = &notifications.data[0];
    assert_eq!(request.kind, "dm_request");
    assert_eq!(request.data["conversation_id"], started.conversation_id);
    assert_eq!(request.data["from_user_id"], alice.id);

    // Pending participant may view the thread but not the feed
    let thread_path = format!("/messages/{}", started.conversation_id);
    let response = server.get_auth(&thread_path, &bob.token).await.unwrap();
    let thread: Thread = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(thread.pending);

    let feed = format!("/api/dm/{}/messages", started.conversation_id);
    let response = server
        .post_auth(&feed, &bob.token, &PostMessage::new("hi"))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // Bob accepts, marking the request read
    let response = server
        .post_auth(
            &format!("/dm-requests/{}/accept", started.conversation_id),
            &bob.token,
            &json!({ "notification_id": request.id }),
        )
        .await
        .unwrap();
    let participant: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(participant["approved_at"].is_string());

    let response = server.get_auth("/notifications", &bob.token).await.unwrap();
    let notifications: DataEnvelope<Vec<Notification>> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert!(notifications.data.is_empty());

    // Both can now talk
    let response = server
        .post_auth(&feed, &alice.token, &PostMessage::new("Have you read Dune?"))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
    let response = server
        .post_auth(&feed, &bob.token, &PostMessage::new("Twice!"))
        .await
        .unwrap();
    let reply: DirectMessage = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(reply.sender.id, bob.id);

    // Alice has an unread reply in her inbox
    let response = server.get_auth("/messages", &alice.token).await.unwrap();
    let inbox: DataEnvelope<Vec<InboxEntry>> = assert_json(response, StatusCode::OK).await.unwrap();
    let entry = inbox
        .data
        .iter()
        .find(|e| e.conversation_id == started.conversation_id)
        .unwrap();
    assert!(entry.has_unread);
    assert!(!entry.pending);
    assert_eq!(entry.other.as_ref().unwrap().id, bob.id);

    // Reading the thread clears it, oldest message first
    let response = server.get_auth(&thread_path, &alice.token).await.unwrap();
    let thread: Thread = assert_json(response, StatusCode::OK).await.unwrap();
    let bodies: Vec<&str> = thread.messages.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, vec!["Have you read Dune?", "Twice!"]);

    let response = server.get_auth("/messages", &alice.token).await.unwrap();
    let inbox: DataEnvelope<Vec<InboxEntry>> = assert_json(response, StatusCode::OK).await.unwrap();
    let entry = inbox
        .data
        .iter()
        .find(|e| e.conversation_id == started.conversation_id)
        .unwrap();
    assert!(!entry.has_unread);
}

#[tokio::test]
async fn test_cannot_message_self() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();

    let response = server
        .post_empty_auth(&format!("/dm/{}", alice.id), &alice.token)
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(body.error.message, "You cannot message yourself.");
}

#[tokio::test]
async fn test_deny_removes_conversation() {
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
    let started: ConversationStart = response.json().await.unwrap();

    let response = server
        .post_empty_auth(
            &format!("/dm-requests/{}/deny", started.conversation_id),
            &bob.token,
        )
        .await
        .unwrap();
    let outcome: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome["conversation_deleted"], true);

    let response = server
        .get_auth(&format!("/messages/{}", started.conversation_id), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_outsider_cannot_read_conversation() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let bob = seed_user(&server, "bob").await.unwrap();
    let mallory = seed_user(&server, "mallory").await.unwrap();

    let response = server
        .post_empty_auth(&format!("/dm/{}", bob.id), &alice.token)
        .await
        .unwrap();
    let started: ConversationStart = response.json().await.unwrap();

    let response = server
        .get_auth(&format!("/messages/{}", started.conversation_id), &mallory.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/dm/{}/messages", started.conversation_id),
            &mallory.token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_mark_notification_read_only_touches_own() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = seed_user(&server, "alice").await.unwrap();
    let bob = seed_user(&server, "bob").await.unwrap();

    server
        .post_empty_auth(&format!("/dm/{}", bob.id), &alice.token)
        .await
        .unwrap();

    let response = server.get_auth("/notifications", &bob.token).await.unwrap();
    let notifications: DataEnvelope<Vec<Notification>> =
        assert_json(response, StatusCode::OK).await.unwrap();
    let id = notifications.data[0].id.clone();

    // Someone else's id succeeds without effect
    let response = server
        .post_empty_auth(&format!("/notifications/{id}/read"), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth("/notifications", &bob.token).await.unwrap();
    let notifications: DataEnvelope<Vec<Notification>> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(notifications.data.len(), 1);

    let response = server
        .post_empty_auth(&format!("/notifications/{id}/read"), &bob.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth("/notifications", &bob.token).await.unwrap();
    let notifications: DataEnvelope<Vec<Notification>> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert!(notifications.data.is_empty());
}
