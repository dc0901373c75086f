//! # Template Model
//!
//! Declarative description of a graphic: a base template image plus an
//! ordered list of [`Element`]s, and the [`FixtureData`] that fills them.
//!
//! ## Example
//!
//! ```
//! use matchgen::template::TemplateSpec;
//!
//! let spec = TemplateSpec::from_json(r##"{
//!     "image": "https://cdn.example.com/templates/matchday.png",
//!     "elements": [
//!         {"type": "text", "content_key": "opponent", "position": {"x": 400, "y": 200},
//!          "font_family": "Montserrat", "font_size": 48, "color": "#FFFFFF", "alignment": "center"}
//!     ]
//! }"##).unwrap();
//! assert_eq!(spec.elements.len(), 1);
//! ```

mod fixture;
mod types;

pub use fixture::{FixtureData, HomeAway, MatchFixture};
pub use types::{
    Alignment, ColorFilter, Element, ElementKind, FontStyle, FontWeight, ImageStyle, Position,
    MAX_FONT_SIZE, MAX_TARGET_SIZE, TextShadow, TextStyle,
};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::MatchgenError;

/// A template image reference with its elements, as stored by the
/// template service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSpec {
    /// URL or path of the base template image.
    pub image: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl TemplateSpec {
    /// Parse and validate a template from JSON.
    pub fn from_json(json: &str) -> Result<Self, MatchgenError> {
        let spec: TemplateSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Read, parse and validate a template JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MatchgenError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), MatchgenError> {
        if self.image.trim().is_empty() {
            return Err(MatchgenError::InvalidElement(
                "template image reference is empty".to_string(),
            ));
        }
        self.elements.iter().try_for_each(Element::validate)
    }

    /// Elements sorted by `z_index`, ties kept in declaration order.
    pub fn elements_in_paint_order(&self) -> Vec<Element> {
        let mut elements = self.elements.clone();
        elements.sort_by_key(|e| e.z_index);
        elements
    }
}
