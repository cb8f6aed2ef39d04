//! Webhook event types for the LINE Messaging API

use chrono::{DateTime, Utc};
use serde::Deserialize;

// =============================================================================
// Relay Entities
// =============================================================================

/// A text message that can be answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub reply_token: String,
    pub message_text: String,
    /// Sender's LINE user ID, when the source exposes one
    pub user_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    /// LINE re-sent this event after an earlier delivery failed
    pub is_redelivery: bool,
}

/// A reply ready to be sent back to the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub reply_token: String,
    pub text: String,
}

impl OutboundReply {
    pub fn new(event: &InboundEvent, text: impl Into<String>) -> Self {
        Self {
            reply_token: event.reply_token.clone(),
            text: text.into(),
        }
    }
}

// =============================================================================
// Webhook Envelope
// =============================================================================

/// Body of a LINE webhook delivery
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    /// Bot user ID the events were sent to
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// A single webhook event, reduced to what the relay acts on
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEvent")]
pub enum WebhookEvent {
    TextMessage(InboundEvent),
    Other {
        event_type: String,
        message_type: Option<String>,
    },
}

impl WebhookEvent {
    /// Short label for logs, e.g. `message/sticker` or `follow`
    pub fn kind(&self) -> String {
        match self {
            Self::TextMessage(_) => "message/text".to_string(),
            Self::Other {
                event_type,
                message_type: Some(message_type),
            } => format!("{}/{}", event_type, message_type),
            Self::Other { event_type, .. } => event_type.clone(),
        }
    }
}

/// Event as LINE sends it; only the fields the relay reads
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    reply_token: Option<String>,
    #[serde(default)]
    message: Option<RawMessage>,
    #[serde(default)]
    source: Option<EventSource>,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    delivery_context: Option<DeliveryContext>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    message_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// Where an event came from (user, group or room)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryContext {
    #[serde(default)]
    is_redelivery: bool,
}

impl From<RawEvent> for WebhookEvent {
    fn from(raw: RawEvent) -> Self {
        let message_type = raw.message.as_ref().map(|m| m.message_type.clone());
        let is_text =
            raw.event_type == "message" && message_type.as_deref() == Some("text");
        let text = raw.message.and_then(|m| m.text);

        match (is_text, text, raw.reply_token) {
            (true, Some(text), Some(reply_token)) => {
                Self::TextMessage(InboundEvent {
                    reply_token,
                    message_text: text,
                    user_id: raw.source.and_then(|s| s.user_id),
                    timestamp: raw.timestamp.and_then(DateTime::from_timestamp_millis),
                    is_redelivery: raw.delivery_context.is_some_and(|c| c.is_redelivery),
                })
            }
            _ => Self::Other {
                event_type: raw.event_type,
                message_type,
            },
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
