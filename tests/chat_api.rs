use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use newsdesk_agent::agent::ChatAgent;
use newsdesk_agent::audio::{TranscribeError, Transcriber};
use newsdesk_agent::config::prompts::Prompts;
use newsdesk_agent::llm::{CompletionClient, CompletionError};
use newsdesk_agent::models::chat::Article;
use newsdesk_agent::search::{SearchError, SearchQuery, SearchStore};
use newsdesk_agent::server::api::build_router;
use newsdesk_agent::translate::{TranslationClient, TranslationError};

struct StaticSearch(Vec<Article>);

#[async_trait]
impl SearchStore for StaticSearch {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<Article>, SearchError> {
        Ok(self.0.clone())
    }
}

struct FailingSearch;

#[async_trait]
impl SearchStore for FailingSearch {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<Article>, SearchError> {
        Err(SearchError::Backend {
            code: 503,
            message: "cluster down".to_string(),
        })
    }
}

struct StaticCompletion(&'static str);

#[async_trait]
impl CompletionClient for StaticCompletion {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
        Ok(self.0.to_string())
    }
}

struct UppercaseTranslation;

#[async_trait]
impl TranslationClient for UppercaseTranslation {
    async fn translate_chunk(
        &self,
        chunk: &str,
        _from: &str,
        _to: &str,
    ) -> Result<String, TranslationError> {
        Ok(chunk.to_uppercase())
    }
}

struct StaticTranscriber(&'static str);

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, _wav: &[u8]) -> Result<String, TranscribeError> {
        Ok(self.0.to_string())
    }
}

struct FailingTranscriber;

#[async_trait]
impl Transcriber for FailingTranscriber {
    async fn transcribe(&self, _wav: &[u8]) -> Result<String, TranscribeError> {
        Err(TranscribeError::Backend {
            code: 500,
            message: "model crashed".to_string(),
        })
    }
}

fn article(date: &str, title: &str) -> Article {
    Article {
        date: date.to_string(),
        title: title.to_string(),
        content: format!("Contenu de {}", title),
    }
}

fn router_with(
    search: Arc<dyn SearchStore>,
    transcriber: Arc<dyn Transcriber>,
) -> Router {
    let agent = ChatAgent::with_clients(
        search,
        Arc::new(StaticCompletion("Synthèse des articles.")),
        Arc::new(UppercaseTranslation),
        transcriber,
        Arc::new(Prompts::default()),
        "fr".to_string(),
    );
    build_router(Arc::new(agent), 1024 * 1024)
}

fn default_router() -> Router {
    router_with(
        Arc::new(StaticSearch(vec![
            article("2023-01-05", "Premier"),
            article("2023-02-10", "Second"),
        ])),
        Arc::new(StaticTranscriber("bonjour le monde")),
    )
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(uri: &str, disposition: &str, payload: &[u8]) -> Request<Body> {
    let boundary = "test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
    body.extend_from_slice(b"Content-Type: audio/wav\r\n\r\n");
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = default_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn root_returns_welcome_banner() {
    let response = default_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("chatbot"));
}

#[tokio::test]
async fn chat_answers_a_french_query() {
    let response = default_router()
        .oneshot(json_request(
            "/chat",
            json!({ "query": "Quelles sont les dernières nouvelles sur l'inflation au Maroc ?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["response"], "Synthèse des articles.");
    assert_eq!(body["status"], "success");
    assert_eq!(body["source_count"], 2);
    assert_eq!(body["detected_language"], "fr");
}

#[tokio::test]
async fn chat_accepts_the_legacy_form_encoding() {
    let response = default_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "message=Quelles+sont+les+derni%C3%A8res+nouvelles+%3F&language=fr",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["response"], "Synthèse des articles.");
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn chat_translates_when_the_target_differs() {
    let response = default_router()
        .oneshot(json_request(
            "/chat",
            json!({ "query": "actualités économiques", "target_language": "en" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["response"], "SYNTHÈSE DES ARTICLES.");
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn chat_rejects_a_blank_query() {
    let response = default_router()
        .oneshot(json_request("/chat", json!({ "query": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn chat_rejects_an_inverted_date_range() {
    let response = default_router()
        .oneshot(json_request(
            "/chat",
            json!({
                "query": "inflation",
                "start_date": "2023-12-31",
                "end_date": "2023-01-01"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["status"], "error");
}

#[tokio::test]
async fn chat_rejects_malformed_json() {
    let response = default_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_survives_a_search_backend_failure() {
    let router = router_with(
        Arc::new(FailingSearch),
        Arc::new(StaticTranscriber("bonjour")),
    );
    let response = router
        .oneshot(json_request("/chat", json!({ "query": "inflation" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["source_count"], 0);
    assert_eq!(body["response"], Prompts::default().no_results);
}

#[tokio::test]
async fn chat_returns_the_no_results_message_for_an_empty_archive() {
    let router = router_with(
        Arc::new(StaticSearch(Vec::new())),
        Arc::new(StaticTranscriber("bonjour")),
    );
    let response = router
        .oneshot(json_request(
            "/chat",
            json!({ "query": "sujet introuvable dans les archives" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["source_count"], 0);
    assert_eq!(body["response"], Prompts::default().no_results);
}

#[tokio::test]
async fn upload_audio_returns_the_transcript() {
    let response = default_router()
        .oneshot(multipart_request(
            "/upload-audio",
            "form-data; name=\"file\"; filename=\"voice.wav\"",
            b"fake wav bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["text"], "bonjour le monde");
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn audio_alias_behaves_like_upload_audio() {
    let response = default_router()
        .oneshot(multipart_request(
            "/audio",
            "form-data; name=\"audio\"; filename=\"voice.wav\"",
            b"fake wav bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["text"], "bonjour le monde");
}

#[tokio::test]
async fn upload_audio_maps_backend_failure_to_empty_text() {
    let router = router_with(
        Arc::new(StaticSearch(Vec::new())),
        Arc::new(FailingTranscriber),
    );
    let response = router
        .oneshot(multipart_request(
            "/upload-audio",
            "form-data; name=\"file\"; filename=\"voice.wav\"",
            b"fake wav bytes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["text"], "");
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn upload_audio_without_a_file_part_is_rejected() {
    let response = default_router()
        .oneshot(multipart_request(
            "/upload-audio",
            "form-data; name=\"note\"",
            b"just a text field",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["status"], "error");
}

#[tokio::test]
async fn feedback_acknowledges_any_json_payload() {
    let response = default_router()
        .oneshot(json_request(
            "/feedback",
            json!({ "rating": 5, "comment": "très utile" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Merci pour votre retour !");
}

#[tokio::test]
async fn feedback_rejects_invalid_json() {
    let response = default_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/feedback")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("rating=5"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
