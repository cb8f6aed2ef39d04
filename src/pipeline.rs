//! Webhook pipeline: verify → parse → prompt → complete → reply
//!
//! One pass per webhook delivery. Text messages get exactly one reply each;
//! every other event is ignored. A failed completion never fails the
//! delivery, it is replaced by [`FALLBACK_REPLY`]. A failed reply does.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::PipelineError;
use crate::gemini::CompletionClient;
use crate::line_api::ReplySender;
use crate::signature::SignatureVerifier;
use crate::types::{InboundEvent, OutboundReply, WebhookBody, WebhookEvent};

/// Persona and instruction text placed in front of every user message
pub const PERSONA_PREAMBLE: &str = "You are a helpful and friendly chatbot for the Ikatan Keluarga Mahasiswa FKUI (IKM FKUI). Your role is to provide information about services, activities, and resources available at IKM FKUI. Please answer the following question: ";

/// Sent instead of a completion when the backend fails
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble connecting to my brain right now. Please try again in a moment.";

/// Build the completion prompt for a user message
pub fn build_prompt(message_text: &str) -> String {
    format!("{}{}", PERSONA_PREAMBLE, message_text)
}

/// What happened while handling one delivery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Text events answered
    pub replied: usize,
    /// Of those, answered with the fallback text
    pub fallbacks: usize,
    /// Non-text events skipped
    pub ignored: usize,
}

/// Orchestrates signature check, completion and reply for webhook deliveries
pub struct WebhookPipeline {
    verifier: SignatureVerifier,
    completions: Arc<dyn CompletionClient>,
    replies: Arc<dyn ReplySender>,
}

impl WebhookPipeline {
    pub fn new(
        verifier: SignatureVerifier,
        completions: Arc<dyn CompletionClient>,
        replies: Arc<dyn ReplySender>,
    ) -> Self {
        Self {
            verifier,
            completions,
            replies,
        }
    }

    /// Handle one webhook delivery
    ///
    /// `body` must be the raw request body, byte for byte.
    pub async fn handle(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<PipelineReport, PipelineError> {
        self.verifier.verify(body, signature)?;

        let webhook: WebhookBody = serde_json::from_slice(body)?;
        debug!(
            "Webhook for {:?} with {} event(s)",
            webhook.destination,
            webhook.events.len()
        );

        let mut report = PipelineReport::default();
        for event in webhook.events {
            match event {
                WebhookEvent::TextMessage(event) => {
                    let used_fallback = self.answer(&event).await?;
                    report.replied += 1;
                    if used_fallback {
                        report.fallbacks += 1;
                    }
                }
                other => {
                    debug!("Ignoring {} event", other.kind());
                    report.ignored += 1;
                }
            }
        }

        Ok(report)
    }

    /// Answer one text message; returns whether the fallback was used
    async fn answer(&self, event: &InboundEvent) -> Result<bool, PipelineError> {
        info!(
            "Text message from {} (redelivery: {})",
            event.user_id.as_deref().unwrap_or("unknown"),
            event.is_redelivery
        );

        let prompt = build_prompt(&event.message_text);

        let (text, used_fallback) = match self.completions.complete(&prompt).await {
            Ok(text) => (text, false),
            Err(e) => {
                error!("Error generating response from Gemini: {}", e);
                (FALLBACK_REPLY.to_string(), true)
            }
        };

        let reply = OutboundReply::new(event, text);
        self.replies
            .reply(&reply)
            .await
            .inspect_err(|e| error!("Failed to send reply: {}", e))?;

        Ok(used_fallback)
    }
}

// =============================================================================
// Tests
// =============================================================================
