//! Test doubles for the completion and reply clients

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use crate::error::{CompletionError, DeliveryError};
use crate::gemini::CompletionClient;
use crate::line_api::ReplySender;
use crate::types::OutboundReply;

/// Completion client that records prompts
pub struct FakeCompletions {
    answer: Option<String>,
    // Taken by the first call; later calls fail with `Empty`
    failure: Mutex<Option<CompletionError>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeCompletions {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.to_string()),
            failure: Mutex::new(None),
            prompts: Mutex::default(),
        })
    }

    pub fn failing(failure: CompletionError) -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            failure: Mutex::new(Some(failure)),
            prompts: Mutex::default(),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletions {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.answer {
            Some(answer) => Ok(answer.clone()),
            None => Err(self
                .failure
                .lock()
                .unwrap()
                .take()
                .unwrap_or(CompletionError::Empty)),
        }
    }
}

/// Reply sender that records every attempted reply
pub struct FakeReplies {
    failure: Mutex<Option<DeliveryError>>,
    calls: Mutex<Vec<OutboundReply>>,
}

impl FakeReplies {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            failure: Mutex::new(None),
            calls: Mutex::default(),
        })
    }

    /// Fails the first reply with `failure`
    pub fn rejecting(failure: DeliveryError) -> Arc<Self> {
        Arc::new(Self {
            failure: Mutex::new(Some(failure)),
            calls: Mutex::default(),
        })
    }

    pub fn calls(&self) -> Vec<OutboundReply> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySender for FakeReplies {
    async fn reply(&self, reply: &OutboundReply) -> Result<(), DeliveryError> {
        self.calls.lock().unwrap().push(reply.clone());
        match self.failure.lock().unwrap().take() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

/// A LINE text message event
pub fn text_event(reply_token: &str, text: &str) -> Value {
    json!({
        "type": "message",
        "mode": "active",
        "timestamp": 1625665242211_i64,
        "source": {"type": "user", "userId": "U4af4980629"},
        "webhookEventId": "01FZ74A0TDDPYRVKNK77XKC3ZR",
        "deliveryContext": {"isRedelivery": false},
        "replyToken": reply_token,
        "message": {"type": "text", "id": "444573844083572737", "text": text}
    })
}

/// A webhook envelope carrying `events`, serialized as LINE would send it
pub fn webhook_json(events: &[Value]) -> String {
    json!({
        "destination": "Uxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
        "events": events
    })
    .to_string()
}
