//! Request URL construction.
//!
//! The parameter order is part of the wire contract:
//!
//! ```text
//! <base>?key=..&wrapper=..&input=..[&cs=..][&cb_settings_tweak1=..][&cb_settings_tweak2=..][&cb_settings_tweak3=..]
//! ```
//!
//! Optional parameters are left out entirely when absent. An unset mood dial
//! is never sent as a default value.

use crate::reply::ContinuityToken;
use crate::session::{ApiKey, Mood, SessionConfig};

pub const DEFAULT_BASE_URL: &str = "https://www.cleverbot.com/getreply";

/// Client identifier sent on every request.
pub const DEFAULT_WRAPPER: &str = "clevers";

const EMOTION_PARAM: &str = "cb_settings_tweak1";
const ENGAGEMENT_PARAM: &str = "cb_settings_tweak2";
const REGARD_PARAM: &str = "cb_settings_tweak3";

/// Builds `getreply` URLs. Holds only the endpoint and wrapper id; all
/// per-call state is passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEncoder {
    base_url: String,
    wrapper: String,
}

impl Default for RequestEncoder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wrapper: DEFAULT_WRAPPER.to_string(),
        }
    }
}

impl RequestEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_wrapper(mut self, wrapper: impl Into<String>) -> Self {
        self.wrapper = wrapper.into();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn wrapper(&self) -> &str {
        &self.wrapper
    }

    /// Encode one request from a config snapshot.
    #[must_use]
    pub fn encode(
        &self,
        config: &SessionConfig,
        token: Option<&ContinuityToken>,
        message: &str,
    ) -> String {
        self.encode_parts(config.api_key(), config.mood(), token, message)
    }

    /// Same request with the key replaced by its masked form, for logging.
    #[must_use]
    pub fn encode_redacted(
        &self,
        config: &SessionConfig,
        token: Option<&ContinuityToken>,
        message: &str,
    ) -> String {
        self.build(&config.api_key().masked(), config.mood(), token, message)
    }

    #[must_use]
    pub fn encode_parts(
        &self,
        api_key: &ApiKey,
        mood: Mood,
        token: Option<&ContinuityToken>,
        message: &str,
    ) -> String {
        self.build(api_key.as_str(), mood, token, message)
    }

    fn build(
        &self,
        api_key: &str,
        mood: Mood,
        token: Option<&ContinuityToken>,
        message: &str,
    ) -> String {
        let mut url = format!(
            "{}?key={}&wrapper={}&input={}",
            self.base_url,
            urlencoding::encode(api_key),
            urlencoding::encode(&self.wrapper),
            urlencoding::encode(message),
        );

        if let Some(token) = token {
            push_param(&mut url, "cs", &urlencoding::encode(token.as_str()));
        }
        for (name, level) in [
            (EMOTION_PARAM, mood.emotion),
            (ENGAGEMENT_PARAM, mood.engagement),
            (REGARD_PARAM, mood.regard),
        ] {
            if let Some(level) = level {
                push_param(&mut url, name, &level.to_string());
            }
        }

        url
    }
}

fn push_param(url: &mut String, name: &str, value: &str) {
    url.push('&');
    url.push_str(name);
    url.push('=');
    url.push_str(value);
}
