//! Render context: shared resources available while painting elements.
//!
//! Renderers that need external resources (image sources, font faces) reach
//! them through the context, keeping callers unaware of where bytes come
//! from. One context is built per engine and shared by every composition.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::MatchgenError;
use crate::fetch::{Fetch, HttpFetcher};
use crate::font::{FontCache, FontResolver};

/// Shared resources for compositions.
#[derive(Clone)]
pub struct RenderContext {
    pub config: EngineConfig,
    /// Fetcher for templates and element images.
    pub fetcher: Arc<dyn Fetch>,
    /// Font resolution with its process-wide face cache.
    pub fonts: FontResolver,
}

impl RenderContext {
    /// Create a context from shared state.
    pub fn new(config: EngineConfig, fetcher: Arc<dyn Fetch>, cache: FontCache) -> Self {
        let fonts = FontResolver::new(&config, Arc::clone(&fetcher), cache);
        Self {
            config,
            fetcher,
            fonts,
        }
    }

    /// Create a context that fetches over HTTP and from the local
    /// filesystem, with an empty font cache.
    pub fn http(config: EngineConfig) -> Result<Self, MatchgenError> {
        config.validate()?;
        let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(&config)?);
        Ok(Self::new(config, fetcher, FontCache::new()))
    }
}
