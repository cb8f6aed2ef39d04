//! LINE webhook HTTP handlers

use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::pipeline::WebhookPipeline;
use crate::signature::SIGNATURE_HEADER;

/// Webhook server state
#[derive(Clone)]
pub struct WebhookState {
    pub pipeline: Arc<WebhookPipeline>,
    /// Log raw request bodies
    pub debug_mode: bool,
}

/// Build the webhook router
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/callback", post(callback))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Run the webhook HTTP server
pub async fn run_server(addr: SocketAddr, state: WebhookState) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Middleware to log all incoming HTTP requests
async fn log_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("🌐 HTTP {} {}", method, path);

    let response = next.run(req).await;

    info!("📤 Response status: {}", response.status());

    response
}

/// Webhook delivery from LINE (POST /callback)
async fn callback(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, StatusCode> {
    let delivery_id = Uuid::new_v4();
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    info!(
        "📥 Webhook delivery {}: {} bytes, signature present: {}",
        delivery_id,
        body.len(),
        signature.is_some()
    );
    if state.debug_mode {
        debug!("Request body: {}", String::from_utf8_lossy(&body));
    }

    match state.pipeline.handle(&body, signature).await {
        Ok(report) => {
            info!(
                "Delivery {} done: {} replied ({} fallback), {} ignored",
                delivery_id, report.replied, report.fallbacks, report.ignored
            );
            Ok("OK")
        }
        Err(e @ PipelineError::Signature(_)) => {
            warn!(
                "Delivery {}: {}. Check the channel access token/channel secret.",
                delivery_id, e
            );
            Err(e.status_code())
        }
        Err(e) => {
            error!("Delivery {} failed: {}", delivery_id, e);
            Err(e.status_code())
        }
    }
}
