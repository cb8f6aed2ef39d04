//! LINE → Gemini Webhook Relay - Main Entry Point
//!
//! Loads configuration, builds the API clients once, and serves
//! `POST /callback` until Ctrl-C.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use line_gemini_relay::webhook::{self, WebhookState};
use line_gemini_relay::{
    GeminiClient, LineMessagingClient, RelayConfig, SignatureVerifier, WebhookPipeline,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,line_gemini_relay=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 LINE Gemini relay starting...");

    // Missing credentials are fatal here, never per request
    let config = RelayConfig::from_env()?;
    info!("📋 Configuration loaded: {:?}", config);

    let completions = GeminiClient::new(
        &config.gemini_api_base,
        &config.gemini_api_key,
        &config.gemini_model,
        config.completion_timeout(),
    )?;
    let replies = LineMessagingClient::new(
        &config.line_api_base,
        &config.line_channel_access_token,
        config.reply_timeout(),
    )?;
    let pipeline = WebhookPipeline::new(
        SignatureVerifier::new(&config.line_channel_secret),
        Arc::new(completions),
        Arc::new(replies),
    );

    let state = WebhookState {
        pipeline: Arc::new(pipeline),
        debug_mode: config.debug_mode,
    };

    let addr: SocketAddr = config.listen_addr.parse()?;
    let mut server = tokio::spawn(webhook::run_server(addr, state));
    info!(
        "🌐 Webhook server listening on {} (model: {})",
        addr, config.gemini_model
    );

    // Wait for shutdown signal, or for the server to stop on its own
    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("📢 Shutdown signal received"),
            Err(err) => tracing::error!("Unable to listen for shutdown signal: {}", err),
        },
        result = &mut server => {
            // Bind failures and the like end the process with an error
            result??;
        }
    }

    info!("🛑 Shutting down server...");
    server.abort();

    info!("✅ LINE Gemini relay stopped");
    Ok(())
}
