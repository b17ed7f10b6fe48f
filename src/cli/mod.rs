use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Search Backend Args ---
    /// Endpoint of the article search backend (e.g., https://search.example.com:9200)
    #[arg(long, env = "SEARCH_ENDPOINT")]
    pub search_endpoint: String,

    /// Username for search backend authentication
    #[arg(long, env = "SEARCH_USERNAME")]
    pub search_username: String,

    /// Password for search backend authentication
    #[arg(long, env = "SEARCH_PASSWORD")]
    pub search_password: String,

    /// Index holding the news articles
    #[arg(long, env = "SEARCH_INDEX")]
    pub search_index: String,

    /// Comma-separated document fields matched against the query text
    #[arg(long, env = "SEARCH_FIELDS", default_value = "title,content", value_delimiter = ',')]
    pub search_fields: Vec<String>,

    /// Maximum number of articles retrieved per query
    #[arg(long, env = "SEARCH_LIMIT", default_value = "50")]
    pub search_limit: usize,

    /// Request timeout in seconds for the search backend
    #[arg(long, env = "SEARCH_TIMEOUT_SECS", default_value = "30")]
    pub search_timeout_secs: u64,

    /// Accept self-signed TLS certificates from the search backend
    #[arg(long, env = "SEARCH_INSECURE", default_value = "false")]
    pub search_insecure: bool,

    // --- Generation LLM Args ---
    /// API Key for the generation backend
    #[arg(long, env = "LLM_API_KEY")]
    pub llm_api_key: String,

    /// Base URL for the generation backend API
    #[arg(long, env = "LLM_BASE_URL", default_value = "https://api.openai.com")]
    pub llm_base_url: String,

    /// Model name for summary generation (e.g., gpt-4, gpt-4o-mini)
    #[arg(long, env = "LLM_MODEL", default_value = "gpt-4")]
    pub llm_model: String,

    /// Sampling temperature for summary generation
    #[arg(long, env = "LLM_TEMPERATURE", default_value = "0.7")]
    pub llm_temperature: f32,

    /// Request timeout in seconds for the generation backend
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value = "60")]
    pub llm_timeout_secs: u64,

    // --- Translation Args ---
    /// Base URL for the translation backend API
    #[arg(
        long,
        env = "TRANSLATE_BASE_URL",
        default_value = "https://api.mymemory.translated.net"
    )]
    pub translate_base_url: String,

    /// Request timeout in seconds per translated chunk
    #[arg(long, env = "TRANSLATE_TIMEOUT_SECS", default_value = "15")]
    pub translate_timeout_secs: u64,

    /// Language summaries are generated in; targets equal to it skip translation
    #[arg(long, env = "DEFAULT_LANGUAGE", default_value = "fr")]
    pub default_language: String,

    // --- Speech Args ---
    /// URL of the speech-to-text transcription endpoint
    #[arg(long, env = "SPEECH_URL", default_value = "http://localhost:9000/transcribe")]
    pub speech_url: String,

    /// Request timeout in seconds for the transcription backend
    #[arg(long, env = "SPEECH_TIMEOUT_SECS", default_value = "60")]
    pub speech_timeout_secs: u64,

    // --- General App Args ---
    /// Host address and port for the server to listen on
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8000")]
    pub server_addr: String,

    /// Optional path to a JSON file overriding the built-in prompt texts
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    /// Maximum accepted size in bytes for audio uploads
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value = "10485760")]
    pub max_upload_bytes: usize,
}
