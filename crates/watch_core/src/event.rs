use chrono::{DateTime, Utc};
use serde::Deserialize;
use watch_logging::{watch_debug, watch_warn};

/// Telegram chat identifier. Group chats are negative.
pub type ChatId = i64;

/// One keyword hit reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub author: String,
    pub chat_name: String,
    #[serde(default)]
    pub chat_link: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub keyword: String,
}

/// Frames pushed over the live channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    NewMatch(Match),
    #[serde(rename = "keywords")]
    KeywordsSnapshot(Vec<String>),
    #[serde(rename = "chats")]
    ChatsSnapshot(Vec<ChatId>),
}

/// Why a payload produced no event.
#[derive(Debug)]
pub enum Rejection {
    /// Not JSON at all.
    Malformed(serde_json::Error),
    /// JSON, but an unknown `type` or a `data` of the wrong shape.
    Unrecognized(serde_json::Error),
}

impl InboundEvent {
    pub fn decode(payload: &str) -> Result<Self, Rejection> {
        let value: serde_json::Value =
            serde_json::from_str(payload).map_err(Rejection::Malformed)?;
        serde_json::from_value(value).map_err(Rejection::Unrecognized)
    }
}

/// Turns one raw payload into at most one event. Never fails.
pub fn dispatch(payload: &str) -> Option<InboundEvent> {
    match InboundEvent::decode(payload) {
        Ok(event) => Some(event),
        Err(Rejection::Malformed(err)) => {
            watch_warn!("Failed to parse live payload ({} bytes): {}", payload.len(), err);
            None
        }
        Err(Rejection::Unrecognized(err)) => {
            watch_debug!("Dropping unrecognized live payload: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATCH_JSON: &str = r#"{
        "type": "new_match",
        "data": {
            "id": "42",
            "author": "alice",
            "chatName": "Freelance",
            "chatLink": "https://t.me/freelance/42",
            "message": "need a rust dev",
            "timestamp": "2024-05-01T10:00:00.123456Z",
            "keyword": "rust"
        }
    }"#;

    #[test]
    fn decodes_new_match() {
        let event = dispatch(MATCH_JSON).expect("event");
        let InboundEvent::NewMatch(found) = event else {
            panic!("expected a match, got {event:?}");
        };
        assert_eq!(found.chat_name, "Freelance");
        assert_eq!(found.keyword, "rust");
        assert_eq!(found.id, "42");
    }

    #[test]
    fn chat_link_defaults_to_empty() {
        let payload = r#"{"type":"new_match","data":{"id":"1","author":"a","chatName":"c",
            "message":"m","timestamp":"2024-05-01T10:00:00Z","keyword":"k"}}"#;
        let Some(InboundEvent::NewMatch(found)) = dispatch(payload) else {
            panic!("expected a match");
        };
        assert!(found.chat_link.is_empty());
    }

    #[test]
    fn decodes_snapshots() {
        assert_eq!(
            dispatch(r#"{"type":"keywords","data":["fraud","scam"]}"#),
            Some(InboundEvent::KeywordsSnapshot(vec![
                "fraud".to_string(),
                "scam".to_string()
            ]))
        );
        assert_eq!(
            dispatch(r#"{"type":"chats","data":[111,-100222]}"#),
            Some(InboundEvent::ChatsSnapshot(vec![111, -100222]))
        );
        assert_eq!(
            dispatch(r#"{"type":"chats","data":[]}"#),
            Some(InboundEvent::ChatsSnapshot(Vec::new()))
        );
    }

    #[test]
    fn rejects_unknown_or_misshapen_payloads() {
        for payload in [
            "not json",
            "",
            "[]",
            r#"{"type":"presence","data":{}}"#,
            r#"{"type":"keywords","data":"fraud"}"#,
            r#"{"type":"chats","data":["111"]}"#,
            r#"{"type":"new_match","data":{"id":"1"}}"#,
            r#"{"type":"new_match"}"#,
            r#"{"data":["fraud"]}"#,
        ] {
            assert_eq!(dispatch(payload), None, "payload {payload:?}");
        }
    }

    #[test]
    fn distinguishes_malformed_from_unrecognized() {
        assert!(matches!(
            InboundEvent::decode("{oops"),
            Err(Rejection::Malformed(_))
        ));
        assert!(matches!(
            InboundEvent::decode(r#"{"type":"future_event","data":1}"#),
            Err(Rejection::Unrecognized(_))
        ));
    }
}
