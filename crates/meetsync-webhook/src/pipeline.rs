// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-delivery webhook processing.
//!
//! Each delivery runs a fixed gauntlet: configuration gate, shared-secret
//! authentication, envelope checks, then the event-specific action. Nothing
//! is read from or written to storage before the delivery authenticates.

use std::sync::Arc;

use chrono::Utc;
use meetsync_config::ConfigStore;
use meetsync_core::MeetsyncError;
use meetsync_core::traits::PostApi;
use meetsync_core::types::Post;
use meetsync_store::EphemeralStore;
use tracing::{debug, info, warn};

use crate::event::{self, MeetingObject, WebhookEvent};

/// Message a meeting post is rewritten to once the meeting ends.
pub const MEETING_ENDED_MESSAGE: &str = "The meeting has ended.";

/// Post property carrying the meeting lifecycle status.
pub const PROP_MEETING_STATUS: &str = "meeting_status";

/// `meeting_status` value for an ended meeting.
pub const STATUS_ENDED: &str = "ENDED";

/// Topic used when the meeting post carries none.
const DEFAULT_MEETING_TOPIC: &str = "Meetsync Meeting";

/// What a successfully processed delivery amounts to.
#[derive(Debug)]
pub enum WebhookOutcome {
    /// URL-validation challenge; echo the token pair back.
    Challenge {
        plain_token: String,
        encrypted_token: String,
    },
    /// A meeting post was rewritten; return it to the caller.
    PostUpdated(Post),
    /// Nothing to do. Unknown events, unknown meetings, and replays all
    /// land here.
    Ignored,
}

/// Processes authenticated webhook deliveries.
pub struct WebhookPipeline {
    config: Arc<ConfigStore>,
    ephemeral: EphemeralStore,
    posts: Arc<dyn PostApi>,
}

impl WebhookPipeline {
    pub fn new(
        config: Arc<ConfigStore>,
        ephemeral: EphemeralStore,
        posts: Arc<dyn PostApi>,
    ) -> Self {
        WebhookPipeline {
            config,
            ephemeral,
            posts,
        }
    }

    /// Run one delivery through the pipeline.
    ///
    /// `presented_secret` is the `secret` query parameter, `content_type`
    /// the delivery's Content-Type header, `body` the raw (already
    /// length-capped) body.
    pub async fn handle(
        &self,
        presented_secret: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<WebhookOutcome, MeetsyncError> {
        if !self.config.is_configured() {
            return Err(MeetsyncError::Config(
                "bridge is not configured".to_string(),
            ));
        }
        let config = self.config.get();

        if !meetsync_crypto::verify_shared_secret(presented_secret, &config.webhook_secret) {
            return Err(MeetsyncError::Unauthorized(
                "webhook secret mismatch".to_string(),
            ));
        }

        if !content_type.contains("application/json") {
            return Err(MeetsyncError::BadRequest(format!(
                "expected Content-Type 'application/json', received '{content_type}'"
            )));
        }

        match event::decode(body)? {
            WebhookEvent::Challenge { plain_token } => {
                if config.webhook_secret.is_empty() {
                    return Err(MeetsyncError::BadRequest(
                        "no webhook secret configured".to_string(),
                    ));
                }
                let encrypted_token =
                    meetsync_crypto::challenge_hash(&config.webhook_secret, &plain_token);
                debug!("answering endpoint validation challenge");
                Ok(WebhookOutcome::Challenge {
                    plain_token,
                    encrypted_token,
                })
            }
            WebhookEvent::MeetingEnded(object) => self.handle_meeting_ended(object).await,
            WebhookEvent::Unhandled => Ok(WebhookOutcome::Ignored),
        }
    }

    async fn handle_meeting_ended(
        &self,
        object: MeetingObject,
    ) -> Result<WebhookOutcome, MeetsyncError> {
        let mapping_id = object.mapping_id();
        let Some(post_id) = self.ephemeral.get_meeting_mapping(mapping_id).await? else {
            // Expired, started outside this bridge, or a replay of a
            // delivery that was already consumed. All expected.
            debug!(meeting_id = mapping_id, "no post mapping for ended meeting");
            return Ok(WebhookOutcome::Ignored);
        };

        let mut post = self.posts.get_post(&post_id).await?;
        if post.prop_str(PROP_MEETING_STATUS) == Some(STATUS_ENDED) {
            debug!(post_id, "meeting post already marked ended");
            return Ok(WebhookOutcome::Ignored);
        }

        let end_ms = Utc::now().timestamp_millis();
        let length_minutes = meeting_length_minutes(post.create_at, end_ms);
        let start_text = chrono::DateTime::from_timestamp_millis(post.create_at)
            .unwrap_or_default()
            .to_rfc2822();
        let topic = post
            .prop_str("meeting_topic")
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_MEETING_TOPIC)
            .to_string();

        let attachment = serde_json::json!({
            "fallback": format!(
                "Meeting {} has ended: started at {start_text}, length: {length_minutes} minute(s).",
                object.id
            ),
            "title": topic,
            "text": format!(
                "Meeting ID: {}\n\n##### Meeting Summary\n\nDate: {start_text}\n\nMeeting Length: {length_minutes} minute(s)",
                object.id
            ),
        });

        post.message = MEETING_ENDED_MESSAGE.to_string();
        post.props
            .insert(PROP_MEETING_STATUS.to_string(), STATUS_ENDED.into());
        post.props
            .insert("meeting_end_time".to_string(), end_ms.into());
        post.props
            .insert("attachments".to_string(), serde_json::json!([attachment]));

        if let Err(e) = self.posts.update_post(&post).await {
            // The mapping stays so the remote service's retry can succeed.
            warn!(post_id = post.id, error = %e, "failed to update ended-meeting post");
            return Err(e);
        }

        self.ephemeral.delete_meeting_mapping(mapping_id).await?;
        info!(
            meeting_id = mapping_id,
            post_id = post.id,
            length_minutes,
            "marked meeting post as ended"
        );
        Ok(WebhookOutcome::PostUpdated(post))
    }
}

/// Meeting length in whole minutes, rounded up.
fn meeting_length_minutes(create_at_ms: i64, end_ms: i64) -> i64 {
    let elapsed_secs = (end_ms - create_at_ms) / 1000;
    (elapsed_secs as f64 / 60.0).ceil() as i64
}
