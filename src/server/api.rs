use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use log::{info, warn};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::agent::ChatAgent;
use crate::models::audio::TranscriptionResponse;
use crate::models::chat::{ChatRequest, FeedbackAck, LegacyChatForm, ResponseStatus};

#[derive(Clone)]
struct AppState {
    agent: Arc<ChatAgent>,
}

pub fn build_router(agent: Arc<ChatAgent>, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        .route("/chat", post(chat_handler))
        .route("/upload-audio", post(upload_audio_handler))
        .route("/audio", post(upload_audio_handler))
        .route("/feedback", post(feedback_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(AppState { agent })
}

/// Chat body in either of the accepted shapes: the JSON request, or the
/// legacy `message`/`language` form encoding. Both land in `ChatRequest`.
pub struct ChatInput(pub ChatRequest);

impl<S> FromRequest<S> for ChatInput
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(form) = Form::<LegacyChatForm>::from_request(req, state)
                .await
                .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.to_string()))?;
            Ok(ChatInput(form.into()))
        } else {
            let Json(request) = Json::<ChatRequest>::from_request(req, state)
                .await
                .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.to_string()))?;
            Ok(ChatInput(request))
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

async fn root_handler() -> impl IntoResponse {
    Json(json!({ "message": "Bienvenue sur l'API du chatbot d'actualités" }))
}

async fn chat_handler(State(state): State<AppState>, ChatInput(request): ChatInput) -> Response {
    if let Err(e) = request.validate() {
        warn!("Rejected chat request: {}", e);
        return error_response(StatusCode::BAD_REQUEST, &e.to_string());
    }

    let request_id = Uuid::new_v4();
    info!(
        "[{}] Chat query: '{}' (target language: {})",
        request_id, request.query, request.target_language
    );

    let response = state.agent.handle_chat(&request).await;
    info!(
        "[{}] Chat answered: status={}, sources={}, detected={}",
        request_id, response.status, response.source_count, response.detected_language
    );

    (StatusCode::OK, Json(response)).into_response()
}

/// Takes the first multipart field carrying a filename, whatever the clients
/// decided to call it.
async fn upload_audio_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return error_response(StatusCode::BAD_REQUEST, "no audio file in upload");
            }
            Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        };

        if field.file_name().is_none() {
            continue;
        }

        let wav = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        };

        info!("Audio upload received: {} bytes", wav.len());
        let (text, status) = state.agent.transcribe(&wav).await;
        return (StatusCode::OK, Json(TranscriptionResponse { text, status })).into_response();
    }
}

async fn feedback_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(feedback)) => {
            info!("Feedback received: {}", feedback);
            let ack = FeedbackAck {
                status: ResponseStatus::Success,
                message: state.agent.feedback_ack_message().to_string(),
            };
            (StatusCode::OK, Json(ack)).into_response()
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

fn error_response(code: StatusCode, message: &str) -> Response {
    (code, Json(json!({ "status": "error", "message": message }))).into_response()
}
