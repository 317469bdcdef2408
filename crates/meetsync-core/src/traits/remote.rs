// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote conferencing API collaborator trait.
//!
//! Outbound HTTP to the remote service is outside meetsync's core; this
//! trait is the seam callers implement against it.

use async_trait::async_trait;

use crate::error::MeetsyncError;
use crate::types::{Meeting, RemoteUser};

/// The remote video-conferencing API, specified at its interface boundary.
#[async_trait]
pub trait RemoteApi: Send + Sync + 'static {
    /// Fetches an existing meeting by id.
    async fn get_meeting(&self, id: i64) -> Result<Meeting, MeetsyncError>;

    /// Creates a meeting on behalf of `host_id` with the given topic.
    async fn create_meeting(&self, host_id: &str, topic: &str) -> Result<Meeting, MeetsyncError>;

    /// Fetches a user profile by remote user id or email.
    async fn get_user(&self, id: &str) -> Result<RemoteUser, MeetsyncError>;
}
