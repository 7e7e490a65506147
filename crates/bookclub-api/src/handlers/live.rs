//! Live push over WebSocket
//!
//! A connection is authorized exactly like the matching GET messages route,
//! subscribed to its topic, and only then upgraded. With `?after=<id>` the
//! stored messages newer than the cursor are replayed first; live events at
//! or below the last id sent are skipped. A lagging subscriber gets
//! `{"event":"resync"}` and re-fetches with its cursor.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use bookclub_core::{ClubId, ConversationId, DirectMessageId, DomainEvent, MessageId};
use bookclub_service::{
    ClubMessageService, DeliveryHub, DirectMessageService, Replay, Subscription, Topic,
};
use futures_util::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::extractors::{CurrentUser, FeedQuery, IdPath, MaybeUser};
use crate::response::ApiResult;
use crate::state::AppState;

/// Club push
///
/// GET /clubs/{club_id}/live
pub async fn club_live(
    State(state): State<AppState>,
    MaybeUser(actor): MaybeUser,
    IdPath(club_id): IdPath<ClubId>,
    FeedQuery(cursor): FeedQuery,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    let service = ClubMessageService::new(state.service_context());
    let subscription = service.subscribe(club_id, &actor).await?;

    let replay = match cursor.after {
        Some(after) => service.replay(club_id, MessageId::new(after)).await?,
        None => Replay::default(),
    };

    Ok(upgrade(
        ws,
        &state,
        Topic::Club(club_id),
        subscription,
        replay,
        cursor.after.unwrap_or(0),
    ))
}

/// Direct message push
///
/// GET /api/dm/{conversation_id}/live
pub async fn dm_live(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(conversation_id): IdPath<ConversationId>,
    FeedQuery(cursor): FeedQuery,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    let service = DirectMessageService::new(state.service_context());
    let subscription = service.subscribe(conversation_id, &actor).await?;

    let replay = match cursor.after {
        Some(after) => {
            service
                .replay(conversation_id, DirectMessageId::new(after))
                .await?
        }
        None => Replay::default(),
    };

    Ok(upgrade(
        ws,
        &state,
        Topic::Conversation(conversation_id),
        subscription,
        replay,
        cursor.after.unwrap_or(0),
    ))
}

fn upgrade(
    ws: WebSocketUpgrade,
    state: &AppState,
    topic: Topic,
    subscription: Subscription,
    replay: Replay,
    after: i64,
) -> Response {
    let hub = state.service_context().hub().clone();
    let heartbeat = Duration::from_secs(state.config().messaging.heartbeat_interval_secs.max(1));

    ws.on_upgrade(move |socket| {
        handle_socket(socket, hub, topic, subscription, replay, after, heartbeat)
    })
}

async fn handle_socket(
    socket: WebSocket,
    hub: DeliveryHub,
    topic: Topic,
    mut subscription: Subscription,
    replay: Replay,
    after: i64,
    heartbeat: Duration,
) {
    info!(topic = %topic, replayed = replay.events.len(), "Live connection opened");

    let (mut sender, mut receiver) = socket.split();

    // Replay, then live events and heartbeats
    let mut send_task = tokio::spawn(async move {
        let mut last_sent = after;

        for event in &replay.events {
            if !send_event(&mut sender, event).await {
                return;
            }
            last_sent = last_sent.max(event.message_id());
        }
        if replay.truncated && !send_resync(&mut sender).await {
            return;
        }

        let mut ping = tokio::time::interval(heartbeat);
        ping.tick().await;

        loop {
            tokio::select! {
                received = subscription.recv() => match received {
                    Ok(event) => {
                        let id = event.message_id();
                        if id <= last_sent {
                            continue;
                        }
                        last_sent = id;
                        if !send_event(&mut sender, &event).await {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(topic = %topic, skipped, "Live subscriber lagged");
                        if !send_resync(&mut sender).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = ping.tick() => {
                    if sender.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                }
            }
        }

        let _ = sender.close().await;
    });

    // Client frames are only watched for close
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => {
                    debug!(topic = %topic, "Client closed live connection");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(topic = %topic, error = %e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    // The aborted task is awaited so its receiver is dropped before pruning
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
            let _ = recv_task.await;
        }
        _ = &mut recv_task => {
            send_task.abort();
            let _ = send_task.await;
        }
    }
    hub.prune(topic);

    info!(topic = %topic, "Live connection closed");
}

async fn send_event(sender: &mut SplitSink<WebSocket, Message>, event: &DomainEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => sender.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            warn!(error = %e, event = event.event_name(), "Failed to serialize live event");
            true
        }
    }
}

async fn send_resync(sender: &mut SplitSink<WebSocket, Message>) -> bool {
    let frame = serde_json::json!({ "event": "resync" }).to_string();
    sender.send(Message::Text(frame)).await.is_ok()
}
