//! # Matchgen - Fixture Graphic Compositor
//!
//! Matchgen paints match-day data onto designer templates. A template is a
//! base image plus an ordered list of positioned elements; each element
//! names a key in the fixture data and says how to draw its value:
//!
//! - **Text elements**: font, size, color, alignment, wrapping and shadow
//! - **Image elements**: logos and badges, resized, color-filtered and
//!   pasted with transparency
//! - **Home/away placement**: image slots can move depending on whether
//!   the club plays at home or away
//!
//! ## Quick Start
//!
//! ```no_run
//! use matchgen::{
//!     CompositionEngine, EngineConfig,
//!     template::{Alignment, Element, FixtureData, HomeAway, TextStyle},
//! };
//!
//! # async fn run() -> Result<(), matchgen::MatchgenError> {
//! let engine = CompositionEngine::new(EngineConfig::default())?;
//!
//! let title = Element::text(
//!     "opponent",
//!     (400.0, 200.0),
//!     TextStyle {
//!         font_family: "Montserrat".to_string(),
//!         font_size: 48.0,
//!         alignment: Alignment::Center,
//!         ..Default::default()
//!     },
//! );
//! let fixture = FixtureData::new(HomeAway::Away).with("opponent", "Riverside FC");
//!
//! let composition = engine
//!     .compose("https://cdn.example.com/templates/matchday.png", &[title], &fixture)
//!     .await?;
//! for entry in &composition.report {
//!     println!("{}", entry);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Elements, styles, fixture data and template files |
//! | [`render`] | Composition engine, text and image renderers |
//! | [`font`] | Font resolution with remote, local and built-in fallbacks |
//! | [`fetch`] | Byte fetching over HTTP, from disk or from memory |
//! | [`config`] | Engine configuration |
//! | [`error`] | Error types |

pub mod config;
pub mod error;
pub mod fetch;
pub mod font;
pub mod render;
pub mod template;

// Re-exports for convenience
pub use config::{EngineConfig, OutputFormat};
pub use error::MatchgenError;
pub use render::{Composition, CompositionEngine, ElementOutcome, ElementReport, SkipReason};
