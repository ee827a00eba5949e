//! Error taxonomy for the conversational client.
//!
//! Configuration and service errors are terminal. A malformed reply body is
//! the only transient condition; the conversation layer retries it a bounded
//! number of times before surfacing [`Error::ExhaustedRetries`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Rejected session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid API key: expected 27 characters, got {length}")]
    InvalidApiKey { length: usize },

    #[error("{field} must be a value between 0 and 100, got {value}")]
    OutOfRange { field: MoodField, value: i64 },
}

/// Which mood dial a [`ConfigError::OutOfRange`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodField {
    Emotion,
    Engagement,
    Regard,
}

impl std::fmt::Display for MoodField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Emotion => "emotion",
            Self::Engagement => "engagement",
            Self::Regard => "regard",
        };
        f.write_str(name)
    }
}

/// A non-success HTTP status returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid API key or API key not supplied")]
    InvalidApiKey,

    #[error("API endpoint not found")]
    NotFound,

    #[error("request too large (status {0}), use a shorter message")]
    PayloadTooLarge(u16),

    #[error("service unreachable upstream (status {0})")]
    UpstreamUnavailable(u16),

    #[error("too many requests from this client")]
    RateLimited,

    #[error("unexpected response status {0}")]
    Unexpected(u16),
}

impl ServiceError {
    /// Classify an HTTP status. Returns `None` for 2xx.
    #[must_use]
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            401 => Some(Self::InvalidApiKey),
            404 => Some(Self::NotFound),
            413 | 414 => Some(Self::PayloadTooLarge(status)),
            502 | 504 => Some(Self::UpstreamUnavailable(status)),
            503 => Some(Self::RateLimited),
            other => Some(Self::Unexpected(other)),
        }
    }

    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::InvalidApiKey => 401,
            Self::NotFound => 404,
            Self::RateLimited => 503,
            Self::PayloadTooLarge(status)
            | Self::UpstreamUnavailable(status)
            | Self::Unexpected(status) => *status,
        }
    }
}

/// Network-level failure reported by a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed reply: {0}")]
    MalformedReply(#[source] serde_json::Error),

    #[error("gave up after {attempts} malformed replies: {source}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Whether the same request may succeed if sent again unchanged.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::MalformedReply(_))
    }
}
