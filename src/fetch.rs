//! Asset fetching: template images, element images and font files.
//!
//! Everything the engine pulls in goes through the [`Fetch`] trait so the
//! renderers never know whether bytes came from HTTP, disk, or memory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::error::MatchgenError;

/// Fetch raw bytes for a source reference.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, source: &str) -> Result<Vec<u8>, MatchgenError>;
}

fn is_http(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetches `http(s)://` URLs with reqwest and everything else from disk.
///
/// Both paths are bounded by the same timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &EngineConfig) -> Result<Self, MatchgenError> {
        let timeout = config.fetch_timeout();
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .build()
            .map_err(|e| MatchgenError::Config(format!("HTTP client error: {}", e)))?;
        Ok(Self { client, timeout })
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>, MatchgenError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MatchgenError::Fetch(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(MatchgenError::Fetch(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| MatchgenError::Fetch(format!("Failed to read {}: {}", url, e)))?;
        Ok(bytes.to_vec())
    }

    async fn fetch_file(&self, source: &str) -> Result<Vec<u8>, MatchgenError> {
        let path = Path::new(source.strip_prefix("file://").unwrap_or(source));
        match tokio::time::timeout(self.timeout, tokio::fs::read(path)).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => Err(MatchgenError::Fetch(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
            Err(_) => Err(MatchgenError::Fetch(format!(
                "Timed out reading {}",
                path.display()
            ))),
        }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, source: &str) -> Result<Vec<u8>, MatchgenError> {
        if is_http(source) {
            self.fetch_http(source).await
        } else {
            self.fetch_file(source).await
        }
    }
}

/// In-memory sources, for tests and for callers that already hold the bytes.
///
/// Records every request so callers can assert on what was fetched.
#[derive(Default)]
pub struct MemoryFetcher {
    assets: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(source, bytes);
        self
    }

    pub fn insert(&mut self, source: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(source.into(), bytes);
    }

    /// All sources requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Number of times `source` was requested.
    pub fn request_count(&self, source: &str) -> usize {
        self.requests().iter().filter(|s| *s == source).count()
    }
}

#[async_trait]
impl Fetch for MemoryFetcher {
    async fn fetch(&self, source: &str) -> Result<Vec<u8>, MatchgenError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(source.to_string());
        }
        self.assets
            .get(source)
            .cloned()
            .ok_or_else(|| MatchgenError::Fetch(format!("No asset for {}", source)))
    }
}
