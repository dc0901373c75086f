//! # Composition Engine
//!
//! Turns a template reference, an ordered element list and fixture data
//! into one encoded image:
//!
//! ```text
//! LoadTemplate → RenderElements → Serialize
//! ```
//!
//! Only a template that cannot be fetched or decoded aborts the run. Every
//! element that cannot be drawn is skipped with a [`SkipReason`] and the
//! composition carries on. Image sources are fetched concurrently before
//! painting; painting itself always follows element order, so later
//! elements draw over earlier ones.
//!
//! Dropping the future returned by [`CompositionEngine::compose`] cancels
//! the composition along with its partially painted canvas.

use futures::future::join_all;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::context::RenderContext;
use super::image as element_image;
use super::{ElementOutcome, ElementReport, SkipReason, position, text};
use crate::config::{EngineConfig, OutputFormat};
use crate::error::MatchgenError;
use crate::fetch::Fetch;
use crate::font::FontCache;
use crate::template::{Element, ElementKind, FixtureData, TemplateSpec};

/// Result of a successful composition.
#[derive(Debug, Clone)]
pub struct Composition {
    /// Encoded image in `format`.
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    /// One entry per element, in paint order.
    pub report: Vec<ElementReport>,
}

impl Composition {
    pub fn painted_count(&self) -> usize {
        self.report.iter().filter(|r| r.is_painted()).count()
    }

    pub fn skipped(&self) -> Vec<&ElementReport> {
        self.report.iter().filter(|r| !r.is_painted()).collect()
    }
}

/// Composites fixture data onto templates.
///
/// Cheap to clone; clones share the fetcher and font cache.
#[derive(Clone)]
pub struct CompositionEngine {
    ctx: RenderContext,
}

impl CompositionEngine {
    /// Engine fetching over HTTP and from the local filesystem.
    pub fn new(config: EngineConfig) -> Result<Self, MatchgenError> {
        Ok(Self {
            ctx: RenderContext::http(config)?,
        })
    }

    /// Engine with a custom fetcher and a fresh font cache.
    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn Fetch>) -> Self {
        Self::with_font_cache(config, fetcher, FontCache::new())
    }

    /// Engine sharing an existing font cache.
    pub fn with_font_cache(config: EngineConfig, fetcher: Arc<dyn Fetch>, cache: FontCache) -> Self {
        Self {
            ctx: RenderContext::new(config, fetcher, cache),
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Composite a [`TemplateSpec`], painting elements by `z_index`.
    pub async fn compose_spec(
        &self,
        spec: &TemplateSpec,
        fixture: &FixtureData,
    ) -> Result<Composition, MatchgenError> {
        self.compose(&spec.image, &spec.elements_in_paint_order(), fixture)
            .await
    }

    /// Composite `elements` onto the template at `template_ref`.
    ///
    /// An element with out-of-range values is skipped with
    /// [`SkipReason::Invalid`] like any other element that cannot be drawn.
    pub async fn compose(
        &self,
        template_ref: &str,
        elements: &[Element],
        fixture: &FixtureData,
    ) -> Result<Composition, MatchgenError> {
        let mut canvas = self.load_template(template_ref).await?;
        debug!(
            template = template_ref,
            width = canvas.width(),
            height = canvas.height(),
            elements = elements.len(),
            "template loaded"
        );

        let mut prefetched = self.prefetch_images(elements, fixture).await;

        let mut report = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let fetched = prefetched.get_mut(index).and_then(Option::take);
            let outcome = match self.paint(&mut canvas, element, fixture, fetched).await {
                Ok(()) => ElementOutcome::Painted,
                Err(reason) => {
                    if reason == SkipReason::Hidden {
                        debug!(element = element.label(), "element hidden");
                    } else {
                        warn!(element = element.label(), reason = %reason, "skipping element");
                    }
                    ElementOutcome::Skipped(reason)
                }
            };
            report.push(ElementReport {
                index,
                name: element.label().to_string(),
                outcome,
            });
        }

        let format = self.ctx.config.output;
        let (width, height) = canvas.dimensions();
        let bytes = encode(canvas, format)?;

        let font_faces = self.ctx.fonts.cache().len().await;
        let composition = Composition {
            bytes,
            width,
            height,
            format,
            report,
        };
        info!(
            template = template_ref,
            painted = composition.painted_count(),
            skipped = composition.skipped().len(),
            bytes = composition.bytes.len(),
            font_faces,
            "composition complete"
        );
        Ok(composition)
    }

    async fn load_template(&self, template_ref: &str) -> Result<RgbaImage, MatchgenError> {
        let bytes = self
            .ctx
            .fetcher
            .fetch(template_ref)
            .await
            .map_err(|e| MatchgenError::TemplateUnavailable(format!("{}: {}", template_ref, e)))?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| MatchgenError::TemplateUnavailable(format!("{}: {}", template_ref, e)))?;
        Ok(decoded.to_rgba8())
    }

    /// Fetch every drawable image element's source concurrently.
    ///
    /// Entries line up with `elements`; `None` means nothing to fetch.
    async fn prefetch_images(
        &self,
        elements: &[Element],
        fixture: &FixtureData,
    ) -> Vec<Option<Result<Vec<u8>, SkipReason>>> {
        let fetcher = self.ctx.fetcher.as_ref();
        join_all(elements.iter().map(|element| async move {
            if !element.visible || !element.is_image() || element.validate().is_err() {
                return None;
            }
            let source = value_for(element, fixture).ok()?;
            Some(element_image::fetch_source(fetcher, source).await)
        }))
        .await
    }

    async fn paint(
        &self,
        canvas: &mut RgbaImage,
        element: &Element,
        fixture: &FixtureData,
        fetched: Option<Result<Vec<u8>, SkipReason>>,
    ) -> Result<(), SkipReason> {
        if !element.visible {
            return Err(SkipReason::Hidden);
        }
        element
            .validate()
            .map_err(|e| SkipReason::Invalid(e.to_string()))?;
        let value = value_for(element, fixture)?;

        let (width, height) = canvas.dimensions();
        let anchor = position::to_pixels(
            position::resolve(element, fixture.home_away),
            element.relative,
            width,
            height,
        );

        match &element.kind {
            ElementKind::Text(style) => {
                let font = self
                    .ctx
                    .fonts
                    .resolve_styled(&style.font_family, style.font_weight, style.font_style, style.font_size)
                    .await;
                text::render(canvas, style, &font, value, anchor)
            }
            ElementKind::Image(style) => {
                let bytes = match fetched {
                    Some(result) => result?,
                    None => element_image::fetch_source(self.ctx.fetcher.as_ref(), value).await?,
                };
                let (w, h) = element_image::render(canvas, style, &bytes, anchor)?;
                debug!(element = element.label(), width = w, height = h, "image pasted");
                Ok(())
            }
        }
    }
}

/// Fixture value for an element's content key.
fn value_for<'a>(element: &Element, fixture: &'a FixtureData) -> Result<&'a str, SkipReason> {
    let value = fixture
        .get(&element.content_key)
        .ok_or_else(|| SkipReason::MissingValue(element.content_key.clone()))?;
    if value.trim().is_empty() {
        return Err(SkipReason::EmptyValue);
    }
    Ok(value)
}

/// Serialize the finished canvas.
fn encode(canvas: RgbaImage, format: OutputFormat) -> Result<Vec<u8>, MatchgenError> {
    let mut bytes = Vec::new();
    let result = match format {
        OutputFormat::Png => canvas.write_with_encoder(PngEncoder::new(&mut bytes)),
        OutputFormat::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))
        }
    };
    result.map_err(|e| MatchgenError::Encode(e.to_string()))?;
    Ok(bytes)
}
