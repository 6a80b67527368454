//! API routes

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Instrument;

use crate::core::{ChatRequest, ChatResponse, FAILURE_MESSAGE};
use crate::system::{self, SystemStatus};
use crate::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Always answers with `{"response": ...}`; failures use 502 and a generic text
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);

    async move {
        tracing::info!(user_message = %request.message, "Chat request");

        match state.chat_engine.chat(&request.message).await {
            Ok(reply) => (
                StatusCode::OK,
                Json(ChatResponse {
                    response: reply.into_text(),
                }),
            ),
            Err(e) => {
                tracing::error!(error = %e, "Chat request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ChatResponse {
                        response: FAILURE_MESSAGE.to_string(),
                    }),
                )
            }
        }
    }
    .instrument(span)
    .await
}

async fn system_status() -> Json<SystemStatus> {
    Json(system::snapshot().await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/system-status", get(system_status))
}

/// Full application with CORS and request tracing
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
