use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};

use crate::audio::{HttpTranscriber, TranscribeError, Transcriber};
use crate::cli::Args;
use crate::config::prompts::{self, Prompts};
use crate::lang::detect_language;
use crate::llm::{CompletionClient, CompletionConfig, OpenAiClient};
use crate::models::chat::{Article, ChatRequest, ChatResponse, ResponseStatus};
use crate::search::{initialize_search_store, SearchQuery, SearchStore};
use crate::translate::{self, MyMemoryClient, TranslationClient};

/// Orchestrates one chat request end to end: search the archive, build the
/// prompt, ask the generation backend for a summary, translate when asked.
/// Every backend failure is absorbed into a fallback value here; the HTTP
/// layer never sees an error from this type.
pub struct ChatAgent {
    search_store: Arc<dyn SearchStore>,
    completion_client: Arc<dyn CompletionClient>,
    translation_client: Arc<dyn TranslationClient>,
    transcriber: Arc<dyn Transcriber>,
    prompts: Arc<Prompts>,
    default_language: String,
}

/// Formats the article block the summarization prompt embeds: one labelled
/// paragraph per article, in backend order.
pub fn assemble_context(header: &str, articles: &[Article]) -> String {
    let mut context = String::from(header);
    for article in articles {
        context.push_str(&format!("Date: {}\n", article.date));
        context.push_str(&format!("Titre: {}\n", article.title));
        context.push_str(&format!("Contenu: {}\n\n", article.content));
    }
    context
}

impl ChatAgent {
    fn initialize_completion_client(
        args: &Args,
    ) -> Result<Arc<dyn CompletionClient>, Box<dyn Error + Send + Sync>> {
        let config = CompletionConfig {
            api_key: args.llm_api_key.clone(),
            base_url: args.llm_base_url.clone(),
            model: args.llm_model.clone(),
            temperature: args.llm_temperature,
            timeout: Duration::from_secs(args.llm_timeout_secs),
        };
        let client = OpenAiClient::from_config(&config)?;
        info!(
            "Completion client configured: Model={}, Temperature={}, BaseURL={}",
            args.llm_model, args.llm_temperature, args.llm_base_url
        );
        Ok(Arc::new(client))
    }

    fn initialize_translation_client(
        args: &Args,
    ) -> Result<Arc<dyn TranslationClient>, Box<dyn Error + Send + Sync>> {
        let client = MyMemoryClient::new(
            &args.translate_base_url,
            Duration::from_secs(args.translate_timeout_secs),
        )?;
        info!(
            "Translation client configured: BaseURL={}",
            args.translate_base_url
        );
        Ok(Arc::new(client))
    }

    fn initialize_transcriber(
        args: &Args,
    ) -> Result<Arc<dyn Transcriber>, Box<dyn Error + Send + Sync>> {
        let client = HttpTranscriber::new(
            &args.speech_url,
            Duration::from_secs(args.speech_timeout_secs),
        )?;
        info!("Speech client configured: URL={}", args.speech_url);
        Ok(Arc::new(client))
    }

    fn initialize_prompts(args: &Args) -> Result<Arc<Prompts>, Box<dyn Error + Send + Sync>> {
        match &args.prompts_path {
            Some(path) => {
                let loaded = prompts::load_prompts(path)?;
                info!("Loaded prompt overrides from: {}", path);
                Ok(loaded)
            }
            None => Ok(Arc::new(Prompts::default())),
        }
    }

    pub fn new(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let search_store = initialize_search_store(args)?;
        let completion_client = Self::initialize_completion_client(args)?;
        let translation_client = Self::initialize_translation_client(args)?;
        let transcriber = Self::initialize_transcriber(args)?;
        let prompts = Self::initialize_prompts(args)?;

        Ok(Self {
            search_store,
            completion_client,
            translation_client,
            transcriber,
            prompts,
            default_language: args.default_language.clone(),
        })
    }

    /// Builds an agent from pre-constructed clients. Tests use this to put
    /// fakes behind the backend seams.
    pub fn with_clients(
        search_store: Arc<dyn SearchStore>,
        completion_client: Arc<dyn CompletionClient>,
        translation_client: Arc<dyn TranslationClient>,
        transcriber: Arc<dyn Transcriber>,
        prompts: Arc<Prompts>,
        default_language: String,
    ) -> Self {
        Self {
            search_store,
            completion_client,
            translation_client,
            transcriber,
            prompts,
            default_language,
        }
    }

    /// Runs the full pipeline for one validated chat request. The returned
    /// status degrades to `Error` as soon as any backend call failed, even
    /// though the response text stays usable.
    pub async fn handle_chat(&self, request: &ChatRequest) -> ChatResponse {
        let (articles, search_status) = self.search(request).await;
        let (response, generation_status) = self
            .generate_summary(&articles, &request.query, &request.target_language)
            .await;

        ChatResponse {
            response,
            status: search_status.and(generation_status),
            source_count: articles.len(),
            detected_language: detect_language(&request.query),
        }
    }

    async fn search(&self, request: &ChatRequest) -> (Vec<Article>, ResponseStatus) {
        let query = SearchQuery {
            text: request.query.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
        };
        match self.search_store.search(&query).await {
            Ok(articles) => {
                info!(
                    "Search returned {} articles for '{}'",
                    articles.len(),
                    request.query
                );
                (articles, ResponseStatus::Success)
            }
            Err(e) => {
                error!("Search failed, continuing with no articles: {}", e);
                (Vec::new(), ResponseStatus::Error)
            }
        }
    }

    /// Empty article list maps to the canned no-results message; a failed
    /// completion call maps to the canned error message. Both canned strings
    /// go through translation like a real summary would.
    pub async fn generate_summary(
        &self,
        articles: &[Article],
        query: &str,
        target_language: &str,
    ) -> (String, ResponseStatus) {
        if articles.is_empty() {
            return self.translate(&self.prompts.no_results, target_language).await;
        }

        let context = assemble_context(&self.prompts.context_header, articles);
        let user = self.prompts.user_message(&context, query);
        match self.completion_client.complete(&self.prompts.system, &user).await {
            Ok(summary) => self.translate(&summary, target_language).await,
            Err(e) => {
                error!("Summary generation failed: {}", e);
                let (message, _) = self
                    .translate(&self.prompts.generation_error, target_language)
                    .await;
                (message, ResponseStatus::Error)
            }
        }
    }

    /// Identity when the target equals the default language. A backend
    /// failure keeps the untranslated text and degrades the status.
    async fn translate(&self, text: &str, target_language: &str) -> (String, ResponseStatus) {
        if target_language == self.default_language {
            return (text.to_string(), ResponseStatus::Success);
        }

        match translate::translate_text(
            self.translation_client.as_ref(),
            text,
            &self.default_language,
            target_language,
        )
        .await
        {
            Ok(translated) => (translated, ResponseStatus::Success),
            Err(e) => {
                warn!(
                    "Translation to '{}' failed, keeping original text: {}",
                    target_language, e
                );
                (text.to_string(), ResponseStatus::Error)
            }
        }
    }

    /// Unusable audio or a speech backend failure maps to an empty
    /// transcript; the caller cannot crash on audio input.
    pub async fn transcribe(&self, wav: &[u8]) -> (String, ResponseStatus) {
        match self.transcriber.transcribe(wav).await {
            Ok(text) => (text, ResponseStatus::Success),
            Err(e @ TranscribeError::InvalidAudio(_)) => {
                warn!("Rejected audio upload: {}", e);
                (String::new(), ResponseStatus::Error)
            }
            Err(e) => {
                error!("Transcription failed: {}", e);
                (String::new(), ResponseStatus::Error)
            }
        }
    }

    pub fn feedback_ack_message(&self) -> &str {
        &self.prompts.feedback_ack
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }
}
