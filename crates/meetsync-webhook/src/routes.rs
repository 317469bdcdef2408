// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Axum surface for the webhook endpoint.
//!
//! One route: `POST /webhook?secret=<shared secret>`. Status mapping is the
//! externally observable contract: 501 while unconfigured, 401 on secret
//! mismatch, 400 for malformed deliveries, 413 for oversized bodies, the
//! collaborator's own status (or 502) when the post mutation fails.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use meetsync_core::MeetsyncError;
use serde::Deserialize;
use tracing::warn;

use crate::pipeline::{WebhookOutcome, WebhookPipeline};

/// Largest accepted delivery body.
pub const MAX_BODY_BYTES: usize = 1 << 20;

#[derive(Debug, Deserialize)]
struct WebhookQuery {
    #[serde(default)]
    secret: String,
}

/// Build the webhook router.
pub fn router(pipeline: Arc<WebhookPipeline>) -> Router {
    Router::new()
        .route("/webhook", post(post_webhook))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(pipeline)
}

async fn post_webhook(
    State(pipeline): State<Arc<WebhookPipeline>>,
    Query(query): Query<WebhookQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    match pipeline.handle(&query.secret, content_type, &body).await {
        Ok(WebhookOutcome::Challenge {
            plain_token,
            encrypted_token,
        }) => Json(serde_json::json!({
            "plainToken": plain_token,
            "encryptedToken": encrypted_token,
        }))
        .into_response(),
        Ok(WebhookOutcome::PostUpdated(post)) => Json(post).into_response(),
        Ok(WebhookOutcome::Ignored) => StatusCode::OK.into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(error: MeetsyncError) -> Response {
    let status = match &error {
        MeetsyncError::Config(_) => StatusCode::NOT_IMPLEMENTED,
        MeetsyncError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        MeetsyncError::BadRequest(_) => StatusCode::BAD_REQUEST,
        // Collaborator failures are server errors at this boundary: a 5xx
        // status is passed through, anything else (e.g. a 404 for a deleted
        // post) becomes a 502 so the remote service treats it as retryable.
        MeetsyncError::Upstream { status, .. } => status
            .filter(|code| *code >= 500)
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::BAD_GATEWAY),
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(%error, "webhook delivery failed");
    }
    (status, error.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use http::Request;
    use meetsync_config::{ConfigStore, Configuration};
    use meetsync_core::types::Post;
    use meetsync_store::EphemeralStore;
    use meetsync_test_utils::{MemoryKv, RecordingPostApi};
    use tower::ServiceExt;

    const SECRET: &str = "s";
    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef";

    struct Harness {
        kv: Arc<MemoryKv>,
        posts: Arc<RecordingPostApi>,
        config: Arc<ConfigStore>,
        router: Router,
    }

    fn harness() -> Harness {
        let kv = Arc::new(MemoryKv::new());
        let posts = Arc::new(RecordingPostApi::new());
        let config = Arc::new(ConfigStore::new());
        config
            .on_change(Configuration {
                enable_oauth: true,
                oauth_client_id: "cid".into(),
                oauth_client_secret: "cs".into(),
                encryption_key: TEST_KEY.into(),
                webhook_secret: SECRET.into(),
                ..Default::default()
            })
            .unwrap();
        let pipeline = Arc::new(WebhookPipeline::new(
            config.clone(),
            EphemeralStore::new(kv.clone()),
            posts.clone(),
        ));
        Harness {
            kv,
            posts,
            config,
            router: router(pipeline),
        }
    }

    fn meeting_ended_body(meeting_id: &str) -> String {
        format!(
            r#"{{"event":"meeting.ended","payload":{{"object":{{"id":"{meeting_id}"}}}}}}"#
        )
    }

    fn request(secret: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/webhook?secret={secret}"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, String) {
        let response = router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn started_post(id: &str, minutes_ago: i64) -> Post {
        Post {
            id: id.to_string(),
            channel_id: "c1".to_string(),
            message: "Meeting started".to_string(),
            create_at: chrono::Utc::now().timestamp_millis() - minutes_ago * 60_000,
            props: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn known_meeting_end_updates_the_post_once() {
        let h = harness();
        h.posts.insert(started_post("post1", 10));
        let ephemeral = EphemeralStore::new(h.kv.clone());
        ephemeral.put_meeting_mapping("234", "post1").await.unwrap();

        let (status, body) = send(&h.router, request(SECRET, &meeting_ended_body("234"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("The meeting has ended."));

        let post = h.posts.post("post1").unwrap();
        assert_eq!(post.message, "The meeting has ended.");
        assert_eq!(post.prop_str("meeting_status"), Some("ENDED"));
        assert!(post.props.contains_key("meeting_end_time"));
        assert!(post.props.contains_key("attachments"));
        assert_eq!(
            h.posts.calls(),
            vec!["get_post:post1", "update_post:post1"]
        );
        assert!(ephemeral.get_meeting_mapping("234").await.unwrap().is_none());

        // Replay: the mapping is gone, so nothing is touched again.
        let (status, _) = send(&h.router, request(SECRET, &meeting_ended_body("234"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(h.posts.calls().len(), 2);
    }

    #[tokio::test]
    async fn unknown_meeting_is_a_success_with_no_collaborator_calls() {
        let h = harness();
        let (status, _) = send(&h.router, request(SECRET, &meeting_ended_body("999"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(h.posts.calls().is_empty());
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected_before_any_state_read() {
        let h = harness();
        h.kv.set_failing(true); // any storage read would blow up
        let (status, _) = send(&h.router, request("wrong", &meeting_ended_body("234"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(h.posts.calls().is_empty());
    }

    #[tokio::test]
    async fn challenge_echoes_the_signed_token() {
        let h = harness();
        let body = r#"{"event":"endpoint.url_validation","payload":{"plainToken":"abc"}}"#;
        let (status, response) = send(&h.router, request(SECRET, body)).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(json["plainToken"], "abc");
        // HMAC-SHA256("s", "abc"), hex.
        assert_eq!(
            json["encryptedToken"],
            "47d920ed90784dc5eae635bfd0824f612d05f09f9a47f60390de873ad37e546b"
        );
        assert!(h.posts.calls().is_empty());
    }

    #[tokio::test]
    async fn unconfigured_bridge_answers_501() {
        let h = harness();
        // A fresh store was never configured.
        let pipeline = Arc::new(WebhookPipeline::new(
            Arc::new(ConfigStore::new()),
            EphemeralStore::new(h.kv.clone()),
            h.posts.clone(),
        ));
        let router = router(pipeline);
        let (status, _) = send(&router, request(SECRET, &meeting_ended_body("234"))).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn non_json_content_type_is_a_bad_request() {
        let h = harness();
        let req = Request::builder()
            .method("POST")
            .uri(format!("/webhook?secret={SECRET}"))
            .header("content-type", "text/plain")
            .body(Body::from(meeting_ended_body("234")))
            .unwrap();
        let (status, _) = send(&h.router, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn undecodable_envelope_is_a_bad_request() {
        let h = harness();
        let (status, _) = send(&h.router, request(SECRET, "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected() {
        let h = harness();
        let oversized = "x".repeat(MAX_BODY_BYTES + 1);
        let (status, _) = send(&h.router, request(SECRET, &oversized)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn post_update_failure_keeps_the_mapping_for_the_remote_retry() {
        let h = harness();
        h.posts.insert(started_post("post1", 5));
        h.posts.fail_updates_with(503);
        let ephemeral = EphemeralStore::new(h.kv.clone());
        ephemeral.put_meeting_mapping("234", "post1").await.unwrap();

        let (status, _) = send(&h.router, request(SECRET, &meeting_ended_body("234"))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ephemeral.get_meeting_mapping("234").await.unwrap(),
            Some("post1".to_string())
        );
    }

    #[tokio::test]
    async fn deleted_post_surfaces_as_a_retryable_server_error() {
        let h = harness();
        // Mapping exists but the post was deleted on the host platform; the
        // collaborator's 404 must not leak through as a client error.
        let ephemeral = EphemeralStore::new(h.kv.clone());
        ephemeral.put_meeting_mapping("234", "gone").await.unwrap();

        let (status, _) = send(&h.router, request(SECRET, &meeting_ended_body("234"))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            ephemeral.get_meeting_mapping("234").await.unwrap(),
            Some("gone".to_string())
        );
    }

    #[tokio::test]
    async fn already_ended_post_is_not_rewritten() {
        let h = harness();
        let mut post = started_post("post1", 5);
        post.props
            .insert("meeting_status".to_string(), "ENDED".into());
        h.posts.insert(post);
        let ephemeral = EphemeralStore::new(h.kv.clone());
        ephemeral.put_meeting_mapping("234", "post1").await.unwrap();

        let (status, _) = send(&h.router, request(SECRET, &meeting_ended_body("234"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(h.posts.calls(), vec!["get_post:post1"]);
    }

    #[tokio::test]
    async fn unhandled_events_are_acknowledged() {
        let h = harness();
        let body = r#"{"event":"meeting.started","payload":{"object":{"id":"234"}}}"#;
        let (status, _) = send(&h.router, request(SECRET, body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(h.posts.calls().is_empty());
    }

    #[tokio::test]
    async fn uuid_mapping_keys_survive_escaping() {
        let h = harness();
        h.posts.insert(started_post("post1", 5));
        let ephemeral = EphemeralStore::new(h.kv.clone());
        ephemeral
            .put_meeting_mapping("abc/def==", "post1")
            .await
            .unwrap();

        let body = r#"{"event":"meeting.ended","payload":{"object":{"id":"234","uuid":"abc/def=="}}}"#;
        let (status, _) = send(&h.router, request(SECRET, body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(h.posts.post("post1").unwrap().message, "The meeting has ended.");
        assert!(
            ephemeral
                .get_meeting_mapping("abc/def==")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn config_gate_uses_the_live_snapshot() {
        let h = harness();
        assert!(h.config.is_configured());
    }
}
