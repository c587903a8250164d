use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Json, Router,
        extract::{DefaultBodyLimit, State},
        http::StatusCode,
        response::IntoResponse,
        routing::{get, post},
    },
    tower_http::cors::{Any, CorsLayer},
    tracing::info,
};

use groupcast_channels::ChatSession;

use crate::{send, state::FacadeState};

/// Request body cap; bounds base64 media payloads.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Build the facade router (shared between production startup and tests).
pub fn build_facade_app(session: Arc<dyn ChatSession>) -> Router {
    let state = FacadeState { session };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/status", get(status_handler))
        .route("/send-message", post(send::send_message))
        .route("/send-media", post(send::send_media))
        .route("/send-media-multi", post(send::send_media_multi))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve the facade until the process exits.
pub async fn start_facade(bind: &str, port: u16, session: Arc<dyn ChatSession>) -> anyhow::Result<()> {
    let app = build_facade_app(session);

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(version = env!("CARGO_PKG_VERSION"), %addr, "facade listening");

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// `GET /status`: the only caller-visible readiness signal.
async fn status_handler(State(state): State<FacadeState>) -> impl IntoResponse {
    let health = state.session.probe().await;
    if health.connected {
        (StatusCode::OK, Json(serde_json::json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "initializing" })),
        )
    }
}
