#![deny(
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

//! Session state, wire encoding and error types for the `getreply` client.

pub mod encoder;
pub mod error;
pub mod reply;
pub mod session;
pub mod transport;

pub use encoder::{DEFAULT_BASE_URL, DEFAULT_WRAPPER, RequestEncoder};
pub use error::{ConfigError, Error, MoodField, Result, ServiceError, TransportError};
pub use reply::{ContinuityToken, ServiceReply};
pub use session::{API_KEY_LENGTH, ApiKey, MOOD_MAX, Mood, SessionConfig, SessionSettings};
pub use transport::{HttpResponse, Transport};
