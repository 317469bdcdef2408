// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator stand-ins for the standalone binary.
//!
//! The standalone server has no chat platform attached; post mutations fail
//! upstream, which the webhook pipeline surfaces as a server error so the
//! remote service retries once a host platform is wired in. Embedders
//! replace this with the host platform's real post surface.

use async_trait::async_trait;
use meetsync_core::MeetsyncError;
use meetsync_core::traits::PostApi;
use meetsync_core::types::Post;

/// [`PostApi`] used when no host platform is attached.
pub struct DetachedPostApi;

impl DetachedPostApi {
    fn unavailable() -> MeetsyncError {
        MeetsyncError::upstream(None, "no host platform attached")
    }
}

#[async_trait]
impl PostApi for DetachedPostApi {
    async fn get_post(&self, _id: &str) -> Result<Post, MeetsyncError> {
        Err(Self::unavailable())
    }

    async fn update_post(&self, _post: &Post) -> Result<(), MeetsyncError> {
        Err(Self::unavailable())
    }

    async fn create_post(&self, _post: Post) -> Result<Post, MeetsyncError> {
        Err(Self::unavailable())
    }
}
