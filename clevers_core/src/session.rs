//! Per-session credentials and mood dials.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MoodField};

/// Required length of a service API key.
pub const API_KEY_LENGTH: usize = 27;

/// Upper bound of every mood dial.
pub const MOOD_MAX: u8 = 100;

/// A validated service API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        let length = key.chars().count();
        if length != API_KEY_LENGTH {
            return Err(ConfigError::InvalidApiKey { length });
        }
        Ok(Self(key))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First and last four characters only, for logs and `info` output.
    #[must_use]
    pub fn masked(&self) -> String {
        let head: String = self.0.chars().take(4).collect();
        let tail: String = self.0.chars().skip(API_KEY_LENGTH - 4).collect();
        format!("{head}...{tail}")
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

/// Snapshot of the three mood dials. `None` means the caller never set the
/// dial and the service default applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mood {
    pub emotion: Option<u8>,
    pub engagement: Option<u8>,
    pub regard: Option<u8>,
}

impl Mood {
    fn slot(&mut self, field: MoodField) -> &mut Option<u8> {
        match field {
            MoodField::Emotion => &mut self.emotion,
            MoodField::Engagement => &mut self.engagement,
            MoodField::Regard => &mut self.regard,
        }
    }

    /// Validate and store one dial. On error nothing changes.
    pub fn set(&mut self, field: MoodField, value: i64) -> Result<(), ConfigError> {
        let level = u8::try_from(value)
            .ok()
            .filter(|v| *v <= MOOD_MAX)
            .ok_or(ConfigError::OutOfRange { field, value })?;
        *self.slot(field) = Some(level);
        Ok(())
    }
}

/// Structured construction input: the key plus optional initial moods.
///
/// This is also the `session` section of the on-disk config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regard: Option<i64>,
}

impl SessionSettings {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

/// API key and mood for one conversational session.
///
/// The key is fixed at construction; moods can change between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    api_key: ApiKey,
    mood: Mood,
}

impl SessionConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: ApiKey::new(api_key)?,
            mood: Mood::default(),
        })
    }

    pub fn from_settings(settings: SessionSettings) -> Result<Self, ConfigError> {
        let mut config = Self::new(settings.api_key)?;
        if let Some(value) = settings.emotion {
            config.set_emotion(value)?;
        }
        if let Some(value) = settings.engagement {
            config.set_engagement(value)?;
        }
        if let Some(value) = settings.regard {
            config.set_regard(value)?;
        }
        Ok(config)
    }

    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    #[must_use]
    pub const fn mood(&self) -> Mood {
        self.mood
    }

    pub fn set_emotion(&mut self, value: i64) -> Result<(), ConfigError> {
        self.mood.set(MoodField::Emotion, value)
    }

    pub fn set_engagement(&mut self, value: i64) -> Result<(), ConfigError> {
        self.mood.set(MoodField::Engagement, value)
    }

    pub fn set_regard(&mut self, value: i64) -> Result<(), ConfigError> {
        self.mood.set(MoodField::Regard, value)
    }

    pub fn set_mood(&mut self, field: MoodField, value: i64) -> Result<(), ConfigError> {
        self.mood.set(field, value)
    }
}

impl TryFrom<&str> for SessionConfig {
    type Error = ConfigError;

    fn try_from(api_key: &str) -> Result<Self, Self::Error> {
        Self::new(api_key)
    }
}

impl TryFrom<String> for SessionConfig {
    type Error = ConfigError;

    fn try_from(api_key: String) -> Result<Self, Self::Error> {
        Self::new(api_key)
    }
}

impl TryFrom<SessionSettings> for SessionConfig {
    type Error = ConfigError;

    fn try_from(settings: SessionSettings) -> Result<Self, Self::Error> {
        Self::from_settings(settings)
    }
}
