use std::error::Error as StdError;

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::{SearchConfig, SearchError, SearchQuery, SearchStore};
use crate::models::chat::Article;

const MISSING_FIELD: &str = "N/A";

pub struct ElasticClient {
    http: HttpClient,
    username: String,
    password: String,
    search_url: String,
    fields: Vec<String>,
    limit: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_source", default)]
    source: Value,
}

impl ElasticClient {
    pub fn from_config(config: &SearchConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let parsed = Url::parse(&config.endpoint)
            .map_err(|e| format!("Invalid search endpoint '{}': {}", config.endpoint, e))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(
                format!("Search endpoint must be http(s), got '{}'", config.endpoint).into(),
            );
        }

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        let search_url = format!(
            "{}/{}/_search",
            config.endpoint.trim_end_matches('/'),
            config.index
        );

        Ok(Self {
            http,
            username: config.username.clone(),
            password: config.password.clone(),
            search_url,
            fields: config.fields.clone(),
            limit: config.limit,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(base_url: &str, index: &str) -> Self {
        use std::time::Duration;

        Self::from_config(&SearchConfig {
            endpoint: base_url.to_string(),
            index: index.to_string(),
            username: "elastic".to_string(),
            password: "test".to_string(),
            fields: vec!["title".to_string(), "content".to_string()],
            limit: 50,
            timeout: Duration::from_secs(5),
            accept_invalid_certs: false,
        })
        .expect("test client")
    }

    /// One bool query: a full-text clause over the configured fields, plus a
    /// date range clause when either bound is present. Ascending date sort,
    /// size capped at the configured limit.
    fn query_body(&self, query: &SearchQuery) -> Value {
        let mut must = vec![json!({
            "multi_match": { "query": query.text, "fields": self.fields }
        })];

        if query.start_date.is_some() || query.end_date.is_some() {
            let mut range = serde_json::Map::new();
            if let Some(start) = query.start_date {
                range.insert("gte".to_string(), json!(start.to_string()));
            }
            if let Some(end) = query.end_date {
                range.insert("lte".to_string(), json!(end.to_string()));
            }
            must.push(json!({ "range": { "date": Value::Object(range) } }));
        }

        json!({
            "query": { "bool": { "must": must } },
            "size": self.limit,
            "sort": [{ "date": { "order": "asc" } }]
        })
    }
}

fn field_or_default(source: &Value, key: &str) -> String {
    match source.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => MISSING_FIELD.to_string(),
        Some(other) => other.to_string(),
    }
}

fn article_from_source(source: &Value) -> Article {
    Article {
        date: field_or_default(source, "date"),
        title: field_or_default(source, "title"),
        content: field_or_default(source, "content"),
    }
}

#[async_trait]
impl SearchStore for ElasticClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Article>, SearchError> {
        let body = self.query_body(query);
        let response = self
            .http
            .post(&self.search_url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let snippet: String = text.chars().take(200).collect();
            return Err(SearchError::Backend {
                code: status.as_u16(),
                message: snippet,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&text)?;
        let articles: Vec<Article> = parsed
            .hits
            .hits
            .iter()
            .map(|hit| article_from_source(&hit.source))
            .collect();
        debug!("Search returned {} hits", articles.len());
        Ok(articles)
    }
}
