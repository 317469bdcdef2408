// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook event envelope.
//!
//! Deliveries are decoded in two passes: the outer envelope identifies the
//! event type, then the event-specific payload shape is decoded from the
//! same bytes. Unknown event types decode successfully as
//! [`WebhookEvent::Unhandled`], so new remote-side events never break the
//! endpoint.

use meetsync_core::MeetsyncError;
use serde::Deserialize;

/// Event type for the endpoint URL-validation challenge.
pub const EVENT_URL_VALIDATION: &str = "endpoint.url_validation";

/// Event type delivered when a meeting ends.
pub const EVENT_MEETING_ENDED: &str = "meeting.ended";

/// The meeting object carried by meeting lifecycle events.
#[derive(Debug, Clone, Deserialize)]
pub struct MeetingObject {
    /// Numeric meeting id, as a string on the wire.
    #[serde(default)]
    pub id: String,
    /// Per-occurrence meeting UUID. May contain `/` and `=`.
    #[serde(default)]
    pub uuid: String,
    /// Meeting topic.
    #[serde(default)]
    pub topic: String,
}

impl MeetingObject {
    /// The identifier the meeting-to-post mapping is keyed by.
    ///
    /// The per-occurrence UUID when the event carries one, otherwise the
    /// numeric id.
    pub fn mapping_id(&self) -> &str {
        if self.uuid.is_empty() { &self.id } else { &self.uuid }
    }
}

/// A decoded webhook delivery.
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    /// `endpoint.url_validation`: the remote service is probing the endpoint
    /// and expects its token echoed back signed.
    Challenge {
        plain_token: String,
    },
    /// `meeting.ended`.
    MeetingEnded(MeetingObject),
    /// Any event type this bridge does not act on.
    Unhandled,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    event: String,
}

#[derive(Deserialize, Default)]
struct ChallengePayload {
    #[serde(rename = "plainToken", default)]
    plain_token: String,
}

#[derive(Deserialize)]
struct Payload<T> {
    #[serde(default)]
    payload: Option<T>,
}

#[derive(Deserialize, Default)]
struct MeetingPayload {
    #[serde(default)]
    object: Option<MeetingObject>,
}

/// Decode a delivery body into a [`WebhookEvent`].
///
/// Any decode failure is a [`MeetsyncError::BadRequest`]; nothing is read
/// from storage before the body decodes cleanly.
pub fn decode(body: &[u8]) -> Result<WebhookEvent, MeetsyncError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| MeetsyncError::BadRequest(format!("undecodable webhook envelope: {e}")))?;

    match envelope.event.as_str() {
        EVENT_URL_VALIDATION => {
            let outer: Payload<ChallengePayload> = serde_json::from_slice(body).map_err(|e| {
                MeetsyncError::BadRequest(format!("undecodable validation payload: {e}"))
            })?;
            let plain_token = outer.payload.map(|p| p.plain_token).unwrap_or_default();
            Ok(WebhookEvent::Challenge { plain_token })
        }
        EVENT_MEETING_ENDED => {
            let outer: Payload<MeetingPayload> = serde_json::from_slice(body).map_err(|e| {
                MeetsyncError::BadRequest(format!("undecodable meeting payload: {e}"))
            })?;
            let object = outer
                .payload
                .and_then(|p| p.object)
                .ok_or_else(|| {
                    MeetsyncError::BadRequest("meeting event without an object".to_string())
                })?;
            Ok(WebhookEvent::MeetingEnded(object))
        }
        _ => Ok(WebhookEvent::Unhandled),
    }
}
