//! # Rendering Module
//!
//! Everything that paints onto the template canvas.
//!
//! ## Modules
//!
//! - [`engine`]: the composition pipeline (load template, paint, serialize)
//! - [`text`]: word wrap, alignment, shadow and glyph drawing
//! - [`image`]: fetch, color-modify, resize and paste image elements
//! - [`color`]: hex color parsing, filters and tone adjustments
//! - [`position`]: home/away position selection and relative coordinates
//! - [`composite`]: source-over pixel blending
//!
//! ## Usage Example
//!
//! ```no_run
//! use matchgen::config::EngineConfig;
//! use matchgen::render::CompositionEngine;
//! use matchgen::template::{Element, FixtureData, HomeAway, TextStyle};
//!
//! # async fn run() -> Result<(), matchgen::MatchgenError> {
//! let engine = CompositionEngine::new(EngineConfig::default())?;
//! let elements = vec![Element::text("club_name", (400.0, 200.0), TextStyle::default())];
//! let fixture = FixtureData::new(HomeAway::Home).with("club_name", "Riverside FC");
//!
//! let composition = engine.compose("templates/fixture.png", &elements, &fixture).await?;
//! std::fs::write("fixture.png", &composition.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod composite;
pub mod context;
pub mod engine;
pub mod image;
pub mod position;
pub mod text;

pub use context::RenderContext;
pub use engine::{Composition, CompositionEngine};

use std::fmt;

/// Why an element was left off the canvas.
///
/// Skips are a normal outcome: the composition still succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The element is marked invisible.
    Hidden,
    /// The fixture has no value for this content key.
    MissingValue(String),
    /// The fixture value is empty or whitespace.
    EmptyValue,
    /// The image source could not be fetched.
    FetchFailed(String),
    /// The image bytes could not be decoded.
    DecodeFailed(String),
    /// The text color is not a hex color.
    InvalidColor(String),
    /// The element carries out-of-range values.
    Invalid(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Hidden => write!(f, "hidden"),
            SkipReason::MissingValue(key) => write!(f, "no value for '{}'", key),
            SkipReason::EmptyValue => write!(f, "empty value"),
            SkipReason::FetchFailed(e) => write!(f, "fetch failed: {}", e),
            SkipReason::DecodeFailed(e) => write!(f, "decode failed: {}", e),
            SkipReason::InvalidColor(c) => write!(f, "invalid color '{}'", c),
            SkipReason::Invalid(e) => write!(f, "{}", e),
        }
    }
}

/// What happened to one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementOutcome {
    Painted,
    Skipped(SkipReason),
}

/// Per-element entry in a composition report, in paint order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementReport {
    /// Position in the element list that was painted.
    pub index: usize,
    /// Element name, or its content key when unnamed.
    pub name: String,
    pub outcome: ElementOutcome,
}

impl ElementReport {
    pub fn is_painted(&self) -> bool {
        self.outcome == ElementOutcome::Painted
    }
}

impl fmt::Display for ElementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ElementOutcome::Painted => write!(f, "#{} {}: painted", self.index, self.name),
            ElementOutcome::Skipped(reason) => write!(f, "#{} {}: skipped ({})", self.index, self.name, reason),
        }
    }
}
