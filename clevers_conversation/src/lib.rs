#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Stateful conversation over the `getreply` endpoint.
//!
//! # Key Features
//! - Continuity token threaded from each reply into the next request
//! - Calls on one client queued so tokens form a causal chain
//! - Bounded retry when the service returns a malformed body
//! - Mood dials adjustable between calls

mod client;
mod retry;

pub use client::ConversationClient;
pub use retry::{DEFAULT_MAX_ATTEMPTS, RetryPolicy, retry_transient};
