//! HTTP fetch port
//!
//! Walks a JSON API page by page:
//! - Sends the cursor as a query parameter or follows it as a URL
//! - Extracts records and the next cursor by dot path
//! - Throttles requests when a rate limit is configured
//!
//! It never retries on its own. Retrying is the orchestrator's and the
//! user's call.

use super::rate_limit::RateLimiter;
use super::FetchPort;
use crate::config::{CursorStyle, SourceConfig};
use crate::error::{Error, Result};
use crate::types::{Cursor, JsonRecord, Page};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Fetch port backed by an HTTP JSON API
pub struct HttpFetcher {
    client: Client,
    config: SourceConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpFetcher {
    /// Create a fetcher for a source definition
    pub fn new(config: SourceConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("paginator/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// The source definition
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// URL to request for `cursor`
    pub fn page_url(&self, cursor: Option<&Cursor>) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint())?;
        match (cursor, &self.config.cursor) {
            (None, _) => {}
            (Some(cursor), CursorStyle::QueryParam { param }) => {
                url.query_pairs_mut().append_pair(param, cursor.as_str());
            }
            (Some(cursor), CursorStyle::NextUrl) => {
                url = url.join(cursor.as_str())?;
            }
        }
        Ok(url)
    }

    /// Fetch and parse one page
    pub async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<Page<JsonRecord>> {
        let url = self.page_url(cursor)?;

        if let Some(ref limiter) = self.rate_limiter {
            if !limiter.try_acquire() {
                debug!("Rate limited, waiting before {}", url);
                limiter.wait().await;
            }
        }

        let mut req = self.client.get(url.clone());
        for (key, value) in &self.config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Request failed with {}: {}", status.as_u16(), url);
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body_text = response.text().await?;
        let body: Value = if body_text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body_text)?
        };

        let page = parse_page(&body, &self.config)?;
        debug!(
            "Fetched {} records from {} (next: {:?})",
            page.records.len(),
            url,
            page.next
        );
        Ok(page)
    }
}

#[async_trait]
impl FetchPort<JsonRecord> for HttpFetcher {
    async fn fetch(&self, cursor: Option<Cursor>) -> Result<Page<JsonRecord>> {
        self.fetch_page(cursor.as_ref()).await
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Turn a response body into a page
///
/// A null body or a missing records array is an error; individual elements
/// without a usable id are skipped.
pub fn parse_page(body: &Value, config: &SourceConfig) -> Result<Page<JsonRecord>> {
    if body.is_null() {
        return Err(Error::EmptyResponse);
    }

    let items = match extract_path(body, &config.records_path) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => {
            return Err(Error::extraction(&config.records_path, "records not found"));
        }
        Some(_) => {
            return Err(Error::extraction(&config.records_path, "not an array"));
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match JsonRecord::from_value(item.clone(), &config.id_field) {
            Some(record) => records.push(record),
            None => warn!(
                "Skipping record {index}: no usable '{}' field",
                config.id_field
            ),
        }
    }

    let next = match extract_path(body, &config.next_cursor_path) {
        Some(Value::String(s)) if !s.is_empty() => Some(Cursor::new(s.clone())),
        Some(Value::Number(n)) => Some(Cursor::new(n.to_string())),
        _ => None,
    };

    Ok(Page::new(records, next))
}

/// Follow a dot path (optional `$.` prefix) through nested objects
fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}
