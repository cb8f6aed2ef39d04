//! LINE → Gemini Webhook Relay
//!
//! Receives LINE Messaging API webhooks, asks Gemini for an answer to each
//! text message and replies to the chat with the generated text.
//!
//! # Architecture
//!
//! ```text
//! LINE Platform ──POST /callback──▶ Relay (this) ──generateContent──▶ Gemini
//!       ▲                             │
//!       └────── reply API ◀───────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! export LINE_CHANNEL_ACCESS_TOKEN=your_access_token
//! export LINE_CHANNEL_SECRET=your_channel_secret
//! export GEMINI_API_KEY=your_api_key
//!
//! line-gemini-relay
//! ```

pub mod config;
pub mod error;
pub mod gemini;
pub mod line_api;
pub mod pipeline;
pub mod signature;
pub mod types;
pub mod webhook;

#[cfg(test)]
mod testing;

pub use config::RelayConfig;
pub use error::{CompletionError, DeliveryError, PipelineError, SignatureInvalid};
pub use gemini::{CompletionClient, GeminiClient};
pub use line_api::{LineMessagingClient, ReplySender};
pub use pipeline::{PipelineReport, WebhookPipeline};
pub use signature::SignatureVerifier;
pub use types::*;
