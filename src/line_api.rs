//! LINE Messaging API client
//!
//! Sends a single text message through the reply API:
//! `POST /v2/bot/message/reply` authenticated with the channel access token.
//! Reply tokens are single use, so there is no retry.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::DeliveryError;
use crate::types::OutboundReply;

const REPLY_PATH: &str = "/v2/bot/message/reply";

/// Delivers a reply to the chat that triggered an event
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn reply(&self, reply: &OutboundReply) -> Result<(), DeliveryError>;
}

// =============================================================================
// LINE Messaging API Client
// =============================================================================

/// LINE Messaging API client
#[derive(Clone)]
pub struct LineMessagingClient {
    api_base: String,
    channel_access_token: String,
    http_client: Client,
}

impl LineMessagingClient {
    /// Create a new LINE Messaging API client
    pub fn new(
        api_base: impl Into<String>,
        channel_access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            channel_access_token: channel_access_token.into(),
            http_client: Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build LINE HTTP client")?,
        })
    }
}

#[async_trait]
impl ReplySender for LineMessagingClient {
    async fn reply(&self, reply: &OutboundReply) -> Result<(), DeliveryError> {
        let request = ReplyMessageRequest {
            reply_token: &reply.reply_token,
            messages: vec![TextMessage {
                message_type: "text",
                text: &reply.text,
            }],
        };

        debug!("Sending reply ({} chars)", reply.text.len());

        let response = self
            .http_client
            .post(format!("{}{}", self.api_base, REPLY_PATH))
            .bearer_auth(&self.channel_access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<LineErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            warn!("LINE reply error: {} - {}", status, message);
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        info!("Reply sent successfully");
        Ok(())
    }
}

// =============================================================================
// Reply API Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyMessageRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: &'a str,
}

/// Error body returned by the Messaging API
#[derive(Debug, Deserialize)]
struct LineErrorResponse {
    message: String,
}

// =============================================================================
// Tests
// =============================================================================
