// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook surface.
//!
//! The remote conferencing service delivers lifecycle events over HTTP; this
//! crate authenticates each delivery, decodes its envelope, and drives the
//! resulting post mutation. Everything observable from outside goes through
//! [`routes::router`].

pub mod event;
pub mod pipeline;
pub mod routes;

pub use event::WebhookEvent;
pub use pipeline::{WebhookOutcome, WebhookPipeline};
pub use routes::router;
