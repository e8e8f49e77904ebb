use crate::agent::ChatAgent;
use crate::models::api::{ ChatRequest, ChatResponse, ErrorBody, HealthBody };
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::State,
    response::IntoResponse,
    http::StatusCode,
};
use tower_http::cors::{ Any, CorsLayer };
use log::info;

#[derive(Clone)]
struct AppState {
    agent: Arc<ChatAgent>,
}

pub fn router(agent: Arc<ChatAgent>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(AppState { agent })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>
) -> impl IntoResponse {
    let message = req.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody { error: "message must not be empty".into() }),
        ).into_response();
    }

    info!("/chat request ({} chars)", message.chars().count());
    let response = state.agent.process_message(message).await;
    (StatusCode::OK, Json(ChatResponse { response })).into_response()
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthBody { status: "ok".into() })
}
