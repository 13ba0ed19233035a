//! Fetch port module
//!
//! The boundary between the orchestrator and whatever actually talks to the
//! remote source.
//!
//! # Overview
//!
//! - `FetchPort` - async trait the orchestrator drives
//! - `HttpFetcher` - cursor pagination over a JSON HTTP API
//! - `RateLimiter` - token bucket throttling for the HTTP fetcher

mod client;
mod rate_limit;

pub use client::{parse_page, HttpFetcher};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

use crate::error::Result;
use crate::types::{Cursor, Page, Record};
use async_trait::async_trait;

/// Source of pages
///
/// `fetch` resolves exactly once per call, with either a page or an error.
/// It may run on any task; the orchestrator serializes the outcome itself.
#[async_trait]
pub trait FetchPort<R: Record>: Send + Sync {
    /// Fetch the page at `cursor`, or the first page when `None`
    async fn fetch(&self, cursor: Option<Cursor>) -> Result<Page<R>>;
}
