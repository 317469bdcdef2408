// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post collaborator trait for the host chat platform.

use async_trait::async_trait;

use crate::error::MeetsyncError;
use crate::types::Post;

/// The host platform's post surface, as consumed by meetsync.
///
/// Failures carry the collaborator's HTTP-style status code where one exists
/// (`MeetsyncError::Upstream`); meetsync propagates them verbatim and never
/// retries synchronously.
#[async_trait]
pub trait PostApi: Send + Sync + 'static {
    /// Fetches a post by id.
    async fn get_post(&self, id: &str) -> Result<Post, MeetsyncError>;

    /// Replaces an existing post's content and properties.
    async fn update_post(&self, post: &Post) -> Result<(), MeetsyncError>;

    /// Creates a new post, returning it with its assigned id.
    async fn create_post(&self, post: Post) -> Result<Post, MeetsyncError>;
}
