mod elastic;

pub use elastic::ElasticClient;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::info;
use thiserror::Error as ThisError;

use crate::cli::Args;
use crate::models::chat::Article;

#[derive(Debug, ThisError)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("search backend returned HTTP {code}: {message}")]
    Backend { code: u16, message: String },
    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub endpoint: String,
    pub index: String,
    pub username: String,
    pub password: String,
    pub fields: Vec<String>,
    pub limit: usize,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
}

/// Parameters of one archive lookup. Only supplied date bounds end up in the
/// search request.
#[derive(Clone, Debug, Default)]
pub struct SearchQuery {
    pub text: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Read-side handle to the news archive.
///
/// `ElasticClient` implements it for production; tests substitute fakes.
#[async_trait]
pub trait SearchStore: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Article>, SearchError>;
}

pub fn initialize_search_store(
    args: &Args,
) -> Result<Arc<dyn SearchStore>, Box<dyn Error + Send + Sync>> {
    let config = SearchConfig {
        endpoint: args.search_endpoint.clone(),
        index: args.search_index.clone(),
        username: args.search_username.clone(),
        password: args.search_password.clone(),
        fields: args.search_fields.clone(),
        limit: args.search_limit,
        timeout: Duration::from_secs(args.search_timeout_secs),
        accept_invalid_certs: args.search_insecure,
    };
    let client = ElasticClient::from_config(&config)?;
    info!(
        "Articles will be searched in index '{}' at {}",
        args.search_index, args.search_endpoint
    );
    Ok(Arc::new(client))
}
