//! # Font Resolution
//!
//! Turns a family name and size into a [`FontHandle`]. Resolution walks an
//! ordered candidate list and the first face that loads wins:
//!
//! 1. the remote font map (family → URL),
//! 2. local files: the configured font directory, then well-known system
//!    font paths,
//! 3. the built-in bitmap face, which cannot fail.
//!
//! Loaded faces are size-independent and cached by source in a
//! [`FontCache`] shared across compositions. Sources that failed to fetch
//! or parse are remembered too and not tried again for the life of the
//! cache.

mod builtin;
mod handle;

pub use builtin::BuiltinMetrics;
pub use handle::{FontHandle, FontSource};

use ab_glyph::FontArc;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::MatchgenError;
use crate::fetch::Fetch;
use crate::template::{FontStyle, FontWeight};

/// Process-wide cache of parsed font faces, keyed by source.
///
/// Entries are only ever added. Lookups take the read lock; a miss loads
/// the face outside any lock and then takes the write lock to insert.
#[derive(Clone, Default)]
pub struct FontCache {
    faces: Arc<RwLock<HashMap<String, FontArc>>>,
    failed: Arc<RwLock<HashSet<String>>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<FontArc> {
        self.faces.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: String, font: FontArc) {
        self.faces.write().await.entry(key).or_insert(font);
    }

    /// Whether `key` already failed to fetch or parse.
    pub async fn is_failed(&self, key: &str) -> bool {
        self.failed.read().await.contains(key)
    }

    pub async fn mark_failed(&self, key: String) {
        self.failed.write().await.insert(key);
    }

    /// Number of parsed faces held.
    pub async fn len(&self) -> usize {
        self.faces.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.faces.read().await.is_empty()
    }
}

/// Strip a file extension and normalize case: "Arial.ttf" → "arial".
pub fn normalize_family(family: &str) -> String {
    let trimmed = family.trim();
    let lower = trimmed.to_lowercase();
    let stem = [".ttf", ".otf"]
        .iter()
        .find_map(|ext| lower.strip_suffix(ext))
        .unwrap_or(&lower);
    stem.trim().to_string()
}

/// Display name without extension, case kept: "Arial.ttf" → "Arial".
fn family_stem(family: &str) -> &str {
    let trimmed = family.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.ends_with(".ttf") || lower.ends_with(".otf") {
        &trimmed[..trimmed.len() - 4]
    } else {
        trimmed
    }
}

/// Style suffix used in file names and remote map keys.
fn style_suffix(weight: FontWeight, style: FontStyle) -> Option<&'static str> {
    match (weight, style) {
        (FontWeight::Normal, FontStyle::Normal) => None,
        (FontWeight::Bold, FontStyle::Normal) => Some("Bold"),
        (FontWeight::Light, FontStyle::Normal) => Some("Light"),
        (FontWeight::Normal, FontStyle::Italic) => Some("Italic"),
        (FontWeight::Bold, FontStyle::Italic) => Some("BoldItalic"),
        (FontWeight::Light, FontStyle::Italic) => Some("LightItalic"),
    }
}

/// One place a face might come from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Candidate {
    Remote(String),
    Local(PathBuf),
}

impl Candidate {
    fn cache_key(&self) -> String {
        match self {
            Candidate::Remote(url) => url.clone(),
            Candidate::Local(path) => path.to_string_lossy().into_owned(),
        }
    }

    fn source(&self) -> FontSource {
        match self {
            Candidate::Remote(url) => FontSource::Remote(url.clone()),
            Candidate::Local(path) => FontSource::Local(path.clone()),
        }
    }
}

/// Resolves family names to font handles. Never fails.
#[derive(Clone)]
pub struct FontResolver {
    fetcher: Arc<dyn Fetch>,
    cache: FontCache,
    remote_fonts: BTreeMap<String, String>,
    font_dir: Option<PathBuf>,
    system_font_paths: Vec<PathBuf>,
}

impl FontResolver {
    pub fn new(config: &EngineConfig, fetcher: Arc<dyn Fetch>, cache: FontCache) -> Self {
        Self {
            fetcher,
            cache,
            remote_fonts: config.remote_fonts.clone(),
            font_dir: config.font_dir.clone(),
            system_font_paths: config.system_font_paths.clone(),
        }
    }

    pub fn cache(&self) -> &FontCache {
        &self.cache
    }

    /// Resolve a regular-weight face.
    pub async fn resolve(&self, family: &str, size: f32) -> FontHandle {
        self.resolve_styled(family, FontWeight::Normal, FontStyle::Normal, size)
            .await
    }

    /// Resolve a face, preferring style-specific candidates.
    pub async fn resolve_styled(
        &self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
        size: f32,
    ) -> FontHandle {
        for candidate in self.candidates(family, weight, style) {
            match self.load(&candidate).await {
                Ok(font) => {
                    debug!(family, source = %candidate.source(), "resolved font");
                    return FontHandle::outline(font, size, candidate.source());
                }
                Err(e) => {
                    debug!(family, source = %candidate.source(), error = %e, "font candidate failed");
                }
            }
        }

        debug!(family, "falling back to built-in font");
        FontHandle::builtin(size)
    }

    /// Ordered candidate list for a family, style-specific entries first.
    fn candidates(&self, family: &str, weight: FontWeight, style: FontStyle) -> Vec<Candidate> {
        let key = normalize_family(family);
        let stem = family_stem(family);
        let suffix = style_suffix(weight, style);
        let mut candidates = Vec::new();

        // 1. Remote map
        if let Some(suffix) = suffix
            && let Some(url) = self
                .remote_fonts
                .get(&format!("{}-{}", key, suffix.to_lowercase()))
        {
            candidates.push(Candidate::Remote(url.clone()));
        }
        if let Some(url) = self.remote_fonts.get(&key) {
            candidates.push(Candidate::Remote(url.clone()));
        }

        // 2. Local files
        if let Some(dir) = &self.font_dir
            && !stem.is_empty()
        {
            if let Some(suffix) = suffix {
                candidates.push(Candidate::Local(dir.join(format!("{}-{}.ttf", stem, suffix))));
            }
            candidates.push(Candidate::Local(dir.join(format!("{}.ttf", stem))));
        }
        candidates.extend(self.system_font_paths.iter().cloned().map(Candidate::Local));

        candidates.dedup();
        candidates
    }

    async fn load(&self, candidate: &Candidate) -> Result<FontArc, MatchgenError> {
        let key = candidate.cache_key();
        if let Some(font) = self.cache.get(&key).await {
            debug!(source = %key, "font cache hit");
            return Ok(font);
        }
        if self.cache.is_failed(&key).await {
            return Err(MatchgenError::Font(format!("{} failed earlier", key)));
        }

        let loaded = match self.fetcher.fetch(&key).await {
            Ok(bytes) => FontArc::try_from_vec(bytes)
                .map_err(|e| MatchgenError::Font(format!("Failed to parse {}: {}", key, e))),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(font) => {
                self.cache.insert(key, font.clone()).await;
                Ok(font)
            }
            Err(e) => {
                self.cache.mark_failed(key).await;
                Err(e)
            }
        }
    }
}
