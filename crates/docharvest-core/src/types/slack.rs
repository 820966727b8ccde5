use chrono::{DateTime, SecondsFormat};

use crate::document::{DocumentCore, Representation};

/// A Slack message, keyed by `<channel>_<ts>`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlackMessageDocument {
    core: DocumentCore,
}

impl SlackMessageDocument {
    pub fn user(&self) -> String {
        self.core.get_str("user")
    }

    pub fn channel(&self) -> String {
        self.core.get_str("channel")
    }

    /// Raw Slack timestamp (`"1700000000.000200"`).
    pub fn timestamp(&self) -> String {
        self.core.get_str("ts")
    }

    pub fn thread_ts(&self) -> String {
        self.core.get_str("thread_ts")
    }

    pub fn is_thread_reply(&self) -> bool {
        !self.thread_ts().is_empty()
    }

    /// `ts` rendered as RFC 3339 UTC. Unparsable values are returned as-is
    /// and a missing timestamp renders as `"N/A"`.
    pub fn formatted_timestamp(&self) -> String {
        let raw = self.timestamp();
        if raw.is_empty() {
            return "N/A".to_string();
        }
        parse_slack_ts(&raw)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or(raw)
    }
}

fn parse_slack_ts(raw: &str) -> Option<DateTime<chrono::Utc>> {
    let seconds: f64 = raw.trim().parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.trunc() as i64;
    let nanos = ((seconds - seconds.trunc()) * 1e9) as u32;
    DateTime::from_timestamp(whole, nanos)
}

impl Representation for SlackMessageDocument {
    const KIND: &'static str = "SlackMessageDocument";

    fn from_core(core: DocumentCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DocumentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DocumentCore {
        &mut self.core
    }

    fn natural_identity(&self) -> Option<String> {
        let channel = self.channel();
        let timestamp = self.timestamp();
        if channel.is_empty() || timestamp.is_empty() {
            return None;
        }
        Some(format!("{}_{}", channel, timestamp))
    }

    fn labeled_fields(&self) -> Vec<(&'static str, String)> {
        let reply = if self.is_thread_reply() { "Yes" } else { "No" };
        vec![
            ("User", self.user()),
            ("Channel", self.channel()),
            ("Timestamp", self.formatted_timestamp()),
            ("Thread Reply", reply.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use serde_json::json;

    fn message(metadata: serde_json::Value) -> SlackMessageDocument {
        SlackMessageDocument::from_core(DocumentCore::new("hi team", metadata.as_object().cloned()))
    }

    #[test]
    fn test_identity_is_channel_and_ts() {
        let doc = message(json!({"channel": "C042", "ts": "1700000000.000200"}));
        assert_eq!(doc.identity(), "C042_1700000000.000200");
    }

    #[test]
    fn test_identity_needs_both_parts() {
        let doc = message(json!({"channel": "C042"}));
        assert_eq!(doc.identity(), "Unknown");
    }

    #[test]
    fn test_thread_reply_flag() {
        assert!(message(json!({"thread_ts": "1699999999.1"})).is_thread_reply());
        assert!(!message(json!({})).is_thread_reply());
    }

    #[test]
    fn test_formatted_timestamp() {
        assert_eq!(
            message(json!({"ts": "1700000000"})).formatted_timestamp(),
            "2023-11-14T22:13:20Z"
        );
        assert_eq!(message(json!({"ts": "yesterday"})).formatted_timestamp(), "yesterday");
        assert_eq!(message(json!({})).formatted_timestamp(), "N/A");
    }

    #[test]
    fn test_describe_includes_reply_flag() {
        let text = message(json!({"user": "U1", "channel": "C1", "ts": "1700000000"})).describe();
        assert!(text.contains("User: U1\nChannel: C1\nTimestamp: 2023-11-14T22:13:20Z\nThread Reply: No"));
    }
}
