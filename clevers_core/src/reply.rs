//! Parsed reply bodies and the continuity token they carry.

use serde::{Deserialize, Serialize};

/// Opaque conversation-state token issued by the service.
///
/// Echoing it on the next request lets the service recall earlier turns. It
/// is only ever obtained from a [`ServiceReply`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuityToken(String);

impl ContinuityToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContinuityToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSON body of a successful `getreply` call.
///
/// Only `output` and `cs` are required; the remaining metadata the service
/// sends is kept for verbose callers. Metadata of an unexpected shape is
/// dropped rather than failing the reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReply {
    pub output: String,
    pub cs: ContinuityToken,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::string"
    )]
    pub conversation_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::count"
    )]
    pub interaction_count: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::count"
    )]
    pub time_taken: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ServiceReply {
    /// Parse a reply body. Truncated or malformed JSON is reported as-is so the
    /// caller can decide whether to retry.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// The service encodes metadata sometimes as numbers and sometimes as
/// strings. Any value is accepted; shapes that do not fit become `None`.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_reply() {
        let reply = ServiceReply::parse(r#"{"output":"hi","cs":"abc"}"#).unwrap();
        assert_eq!(reply.output, "hi");
        assert_eq!(reply.cs.as_str(), "abc");
        assert_eq!(reply.conversation_id, None);
        assert!(reply.extra.is_empty());
    }

    #[test]
    fn keeps_service_metadata() {
        let body = r#"{
            "cs": "76nxdxIJO2...AAA",
            "output": "Good afternoon.",
            "conversation_id": "AYAR1E3ITW",
            "interaction_count": "2",
            "time_taken": 12,
            "interaction_1": "Hello.",
            "clever_accuracy": "97"
        }"#;
        let reply = ServiceReply::parse(body).unwrap();
        assert_eq!(reply.output, "Good afternoon.");
        assert_eq!(reply.conversation_id.as_deref(), Some("AYAR1E3ITW"));
        assert_eq!(reply.interaction_count, Some(2));
        assert_eq!(reply.time_taken, Some(12));
        assert_eq!(
            reply.extra.get("interaction_1").and_then(|v| v.as_str()),
            Some("Hello.")
        );
    }

    #[test]
    fn odd_metadata_does_not_fail_the_reply() {
        let reply = ServiceReply::parse(
            r#"{"output":"hi","cs":"abc","time_taken":12.5,"interaction_count":-1,"conversation_id":{"id":1}}"#,
        )
        .unwrap();
        assert_eq!(reply.output, "hi");
        assert_eq!(reply.cs.as_str(), "abc");
        assert_eq!(reply.time_taken, None);
        assert_eq!(reply.interaction_count, None);
        assert_eq!(reply.conversation_id, None);
    }

    #[test]
    fn null_and_non_numeric_counts_are_dropped() {
        let reply = ServiceReply::parse(
            r#"{"output":"hi","cs":"abc","time_taken":null,"interaction_count":"many","conversation_id":42}"#,
        )
        .unwrap();
        assert_eq!(reply.time_taken, None);
        assert_eq!(reply.interaction_count, None);
        assert_eq!(reply.conversation_id.as_deref(), Some("42"));
    }

    #[test]
    fn rejects_truncated_body() {
        assert!(ServiceReply::parse(r#"{"output":"hi","cs":"ab"#).is_err());
    }

    #[test]
    fn rejects_reply_without_token() {
        assert!(ServiceReply::parse(r#"{"output":"hi"}"#).is_err());
    }

    #[test]
    fn rejects_empty_body() {
        assert!(ServiceReply::parse("").is_err());
    }
}
