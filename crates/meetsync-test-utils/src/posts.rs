// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording [`PostApi`] double.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use meetsync_core::MeetsyncError;
use meetsync_core::traits::PostApi;
use meetsync_core::types::Post;

#[derive(Default)]
struct Inner {
    posts: HashMap<String, Post>,
    /// Call log, one entry per invocation, e.g. `"update_post:p1"`.
    calls: Vec<String>,
    /// When set, `update_post` fails with an upstream error of this status.
    fail_update_status: Option<u16>,
}

/// Post collaborator double that stores posts in memory and records every
/// call, so tests can assert both outcomes and call counts (including zero).
#[derive(Default)]
pub struct RecordingPostApi {
    inner: Mutex<Inner>,
}

impl RecordingPostApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a post as if the host platform already held it.
    pub fn insert(&self, post: Post) {
        let mut inner = self.inner.lock().unwrap();
        inner.posts.insert(post.id.clone(), post);
    }

    /// Current stored state of a post.
    pub fn post(&self, id: &str) -> Option<Post> {
        self.inner.lock().unwrap().posts.get(id).cloned()
    }

    /// The full call log, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Make `update_post` fail with the given upstream status.
    pub fn fail_updates_with(&self, status: u16) {
        self.inner.lock().unwrap().fail_update_status = Some(status);
    }
}

#[async_trait]
impl PostApi for RecordingPostApi {
    async fn get_post(&self, id: &str) -> Result<Post, MeetsyncError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("get_post:{id}"));
        inner
            .posts
            .get(id)
            .cloned()
            .ok_or_else(|| MeetsyncError::upstream(Some(404), format!("post {id} not found")))
    }

    async fn update_post(&self, post: &Post) -> Result<(), MeetsyncError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("update_post:{}", post.id));
        if let Some(status) = inner.fail_update_status {
            return Err(MeetsyncError::upstream(Some(status), "injected post failure"));
        }
        if !inner.posts.contains_key(&post.id) {
            return Err(MeetsyncError::upstream(
                Some(404),
                format!("post {} not found", post.id),
            ));
        }
        inner.posts.insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn create_post(&self, mut post: Post) -> Result<Post, MeetsyncError> {
        let mut inner = self.inner.lock().unwrap();
        if post.id.is_empty() {
            post.id = format!("post-{}", inner.posts.len() + 1);
        }
        inner.calls.push(format!("create_post:{}", post.id));
        inner.posts.insert(post.id.clone(), post.clone());
        Ok(post)
    }
}
