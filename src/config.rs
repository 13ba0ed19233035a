//! Configuration types
//!
//! A source definition describes how to walk one remote JSON API: where the
//! records live in a response, where the next cursor lives, and how the
//! cursor is sent back. It is usually loaded from YAML.

use crate::error::{Error, Result, ResultExt};
use crate::fetch::RateLimiterConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default number of consecutive empty responses tolerated before giving up
pub const DEFAULT_RETRY_THRESHOLD: u32 = 3;

// ============================================================================
// Orchestrator Config
// ============================================================================

/// Tuning for the pagination state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Consecutive auto-chained fetches allowed for empty responses
    #[serde(default = "default_retry_threshold")]
    pub retry_threshold: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            retry_threshold: default_retry_threshold(),
        }
    }
}

impl OrchestratorConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the empty-response retry threshold
    #[must_use]
    pub fn with_retry_threshold(mut self, threshold: u32) -> Self {
        self.retry_threshold = threshold;
        self
    }
}

fn default_retry_threshold() -> u32 {
    DEFAULT_RETRY_THRESHOLD
}

// ============================================================================
// Source Config
// ============================================================================

/// How the next cursor is sent back to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CursorStyle {
    /// Cursor goes into a query parameter (e.g. `?cursor=abc`)
    QueryParam {
        /// Query parameter name
        #[serde(default = "default_cursor_param")]
        param: String,
    },
    /// Cursor is the full URL of the next page
    NextUrl,
}

impl Default for CursorStyle {
    fn default() -> Self {
        Self::QueryParam {
            param: default_cursor_param(),
        }
    }
}

fn default_cursor_param() -> String {
    "cursor".to_string()
}

/// Definition of a remote paginated JSON source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Display name
    #[serde(default = "default_name")]
    pub name: String,

    /// Base URL of the API
    pub base_url: String,

    /// Path of the listing endpoint
    #[serde(default)]
    pub path: String,

    /// How the cursor is sent
    #[serde(default)]
    pub cursor: CursorStyle,

    /// Dot path to the records array in a response
    #[serde(default = "default_records_path")]
    pub records_path: String,

    /// Dot path to the next cursor in a response
    #[serde(default = "default_next_cursor_path")]
    pub next_cursor_path: String,

    /// Field holding each record's identity
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Request throttling, none when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// State machine tuning
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

fn default_name() -> String {
    "source".to_string()
}

fn default_records_path() -> String {
    "data".to_string()
}

fn default_next_cursor_path() -> String {
    "next".to_string()
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl SourceConfig {
    /// Create a source with defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            base_url: base_url.into(),
            path: String::new(),
            cursor: CursorStyle::default(),
            records_path: default_records_path(),
            next_cursor_path: default_next_cursor_path(),
            id_field: default_id_field(),
            headers: HashMap::new(),
            timeout_seconds: default_timeout(),
            rate_limit: None,
            orchestrator: OrchestratorConfig::default(),
        }
    }

    /// Set the endpoint path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the cursor style
    #[must_use]
    pub fn with_cursor(mut self, cursor: CursorStyle) -> Self {
        self.cursor = cursor;
        self
    }

    /// Set where records and the next cursor live in a response
    #[must_use]
    pub fn with_paths(mut self, records_path: impl Into<String>, next_cursor_path: impl Into<String>) -> Self {
        self.records_path = records_path.into();
        self.next_cursor_path = next_cursor_path.into();
        self
    }

    /// Set the identity field
    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set request throttling
    #[must_use]
    pub fn with_rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Full URL of the first page
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }

    /// Check the definition for obvious mistakes
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        url::Url::parse(&self.endpoint())?;

        if self.records_path.is_empty() {
            return Err(Error::config("records_path cannot be empty"));
        }
        if self.next_cursor_path.is_empty() {
            return Err(Error::config("next_cursor_path cannot be empty"));
        }
        if self.id_field.is_empty() {
            return Err(Error::config("id_field cannot be empty"));
        }
        if let CursorStyle::QueryParam { param } = &self.cursor {
            if param.is_empty() {
                return Err(Error::config("cursor param cannot be empty"));
            }
        }
        Ok(())
    }
}

/// Load a source definition from a YAML file
pub fn load_source(path: impl AsRef<Path>) -> Result<SourceConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    load_source_from_str(&yaml)
}

/// Load a source definition from a YAML string
pub fn load_source_from_str(yaml: &str) -> Result<SourceConfig> {
    let config: SourceConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
