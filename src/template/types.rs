//! Element types for the template model.
//!
//! All types derive `Serialize + Deserialize` so the same types work for
//! both Rust API construction and JSON loading. An element is a tagged union:
//! the `type` tag selects `text` or `image`, and each variant carries only
//! the fields that apply to it. A record missing a field its kind requires
//! is rejected by serde when it is loaded.

use serde::{Deserialize, Serialize};

use crate::error::MatchgenError;

/// Largest text size an element may ask for, in pixels.
pub const MAX_FONT_SIZE: f32 = 1000.0;

/// Largest image target width or height, in pixels.
pub const MAX_TARGET_SIZE: u32 = 8192;

fn default_true() -> bool {
    true
}

fn default_multiplier() -> f32 {
    1.0
}

fn default_shadow_color() -> String {
    "#000000".to_string()
}

fn default_shadow_offset() -> i32 {
    2
}

/// A point on the template, in pixels or (for relative elements) in
/// fractions of the template size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Horizontal text alignment relative to the element position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Light,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Named color filter applied after the brightness/contrast/saturation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFilter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    /// Flat `tint_color` layer blended at 50% over the image.
    Custom,
}

/// Drop shadow drawn beneath text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShadow {
    #[serde(default = "default_shadow_color")]
    pub color: String,
    #[serde(default = "default_shadow_offset")]
    pub offset_x: i32,
    #[serde(default = "default_shadow_offset")]
    pub offset_y: i32,
}

impl Default for TextShadow {
    fn default() -> Self {
        Self {
            color: default_shadow_color(),
            offset_x: default_shadow_offset(),
            offset_y: default_shadow_offset(),
        }
    }
}

/// Text-only attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Family name, e.g. "Montserrat" or "Arial.ttf".
    pub font_family: String,
    /// Font size in pixels (em height).
    pub font_size: f32,
    /// Hex color, e.g. "#FFFFFF".
    pub color: String,
    #[serde(default)]
    pub alignment: Alignment,
    /// Wrap width in pixels. `None` draws a single line.
    #[serde(default)]
    pub max_width: Option<f32>,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub shadow: Option<TextShadow>,
    /// Multiplier applied to the font's own line height.
    #[serde(default = "default_multiplier")]
    pub line_height: f32,
    /// Extra pixels inserted between glyphs.
    #[serde(default)]
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 24.0,
            color: "#FFFFFF".to_string(),
            alignment: Alignment::Left,
            max_width: None,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            shadow: None,
            line_height: 1.0,
            letter_spacing: 0.0,
        }
    }
}

/// Image-only attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageStyle {
    pub target_width: u32,
    pub target_height: u32,
    #[serde(default = "default_true")]
    pub maintain_aspect_ratio: bool,
    #[serde(default)]
    pub color_filter: ColorFilter,
    /// Hex color used by [`ColorFilter::Custom`].
    #[serde(default)]
    pub tint_color: Option<String>,
    #[serde(default = "default_multiplier")]
    pub brightness: f32,
    #[serde(default = "default_multiplier")]
    pub contrast: f32,
    #[serde(default = "default_multiplier")]
    pub saturation: f32,
    /// Position used when the fixture is a home game.
    #[serde(default)]
    pub home_position: Option<Position>,
    /// Position used when the fixture is an away game.
    #[serde(default)]
    pub away_position: Option<Position>,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            target_width: 100,
            target_height: 100,
            maintain_aspect_ratio: true,
            color_filter: ColorFilter::None,
            tint_color: None,
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            home_position: None,
            away_position: None,
        }
    }
}

/// What an element draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Text(TextStyle),
    Image(ImageStyle),
}

/// One positioned placeholder on a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Display name used in logs and reports. Defaults to `content_key`.
    #[serde(default)]
    pub name: Option<String>,
    /// Key looked up in the fixture data.
    pub content_key: String,
    /// Default position, used when no home/away variant applies.
    pub position: Position,
    /// Coordinates are fractions of the template size instead of pixels.
    #[serde(default)]
    pub relative: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Layer order used by [`TemplateSpec`](super::TemplateSpec). The engine
    /// paints in the order it is given.
    #[serde(default)]
    pub z_index: i32,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create a text element at a pixel position.
    pub fn text(content_key: impl Into<String>, position: impl Into<Position>, style: TextStyle) -> Self {
        Self {
            name: None,
            content_key: content_key.into(),
            position: position.into(),
            relative: false,
            visible: true,
            z_index: 0,
            kind: ElementKind::Text(style),
        }
    }

    /// Create an image element at a pixel position.
    pub fn image(content_key: impl Into<String>, position: impl Into<Position>, style: ImageStyle) -> Self {
        Self {
            name: None,
            content_key: content_key.into(),
            position: position.into(),
            relative: false,
            visible: true,
            z_index: 0,
            kind: ElementKind::Image(style),
        }
    }

    /// Identity used in logs: the explicit name, else the content key.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.content_key)
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image(_))
    }

    /// Check the value ranges serde cannot express.
    pub fn validate(&self) -> Result<(), MatchgenError> {
        let invalid = |msg: &str| MatchgenError::InvalidElement(format!("{}: {}", self.label(), msg));

        if self.content_key.trim().is_empty() {
            return Err(invalid("content_key is empty"));
        }
        if !self.position.is_finite() {
            return Err(invalid("position is not finite"));
        }

        match &self.kind {
            ElementKind::Text(style) => {
                if style.font_family.trim().is_empty() {
                    return Err(invalid("font_family is empty"));
                }
                if !(style.font_size.is_finite() && style.font_size > 0.0) {
                    return Err(invalid("font_size must be positive"));
                }
                if style.font_size > MAX_FONT_SIZE {
                    return Err(invalid(&format!("font_size exceeds {}", MAX_FONT_SIZE)));
                }
                if let Some(max_width) = style.max_width
                    && !(max_width.is_finite() && max_width > 0.0)
                {
                    return Err(invalid("max_width must be positive"));
                }
                if !(style.line_height.is_finite() && style.line_height > 0.0) {
                    return Err(invalid("line_height must be positive"));
                }
                if !style.letter_spacing.is_finite() {
                    return Err(invalid("letter_spacing is not finite"));
                }
            }
            ElementKind::Image(style) => {
                if style.target_width == 0 || style.target_height == 0 {
                    return Err(invalid("target size must be non-zero"));
                }
                if style.target_width > MAX_TARGET_SIZE || style.target_height > MAX_TARGET_SIZE {
                    return Err(invalid(&format!("target size exceeds {}", MAX_TARGET_SIZE)));
                }
                for (label, value) in [
                    ("brightness", style.brightness),
                    ("contrast", style.contrast),
                    ("saturation", style.saturation),
                ] {
                    if !(value.is_finite() && value >= 0.0) {
                        return Err(invalid(&format!("{} must be a non-negative number", label)));
                    }
                }
                let variants = [style.home_position, style.away_position];
                if variants.iter().flatten().any(|p| !p.is_finite()) {
                    return Err(invalid("home/away position is not finite"));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_element_from_json() {
        let json = r##"{
            "type": "text",
            "content_key": "opponent",
            "position": {"x": 400, "y": 200},
            "font_family": "Arial.ttf",
            "font_size": 36,
            "color": "#FFFFFF",
            "alignment": "center"
        }"##;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.content_key, "opponent");
        assert_eq!(element.position, Position::new(400.0, 200.0));
        assert!(element.visible);
        let ElementKind::Text(style) = &element.kind else {
            panic!("expected text element");
        };
        assert_eq!(style.alignment, Alignment::Center);
        assert_eq!(style.max_width, None);
        assert_eq!(style.line_height, 1.0);
    }

    #[test]
    fn test_image_element_from_json() {
        let json = r##"{
            "type": "image",
            "content_key": "club_logo",
            "position": {"x": 400, "y": 200},
            "target_width": 150,
            "target_height": 150,
            "home_position": {"x": 200, "y": 200},
            "away_position": {"x": 600, "y": 200},
            "color_filter": "sepia"
        }"##;
        let element: Element = serde_json::from_str(json).unwrap();
        let ElementKind::Image(style) = &element.kind else {
            panic!("expected image element");
        };
        assert!(style.maintain_aspect_ratio);
        assert_eq!(style.color_filter, ColorFilter::Sepia);
        assert_eq!(style.away_position, Some(Position::new(600.0, 200.0)));
        assert_eq!(style.brightness, 1.0);
    }

    #[test]
    fn test_missing_kind_field_is_rejected() {
        // Text element without a font size
        let json = r##"{
            "type": "text",
            "content_key": "opponent",
            "position": {"x": 0, "y": 0},
            "font_family": "Arial",
            "color": "#FFFFFF"
        }"##;
        assert!(serde_json::from_str::<Element>(json).is_err());

        // Image element without a target size
        let json = r#"{
            "type": "image",
            "content_key": "club_logo",
            "position": {"x": 0, "y": 0}
        }"#;
        assert!(serde_json::from_str::<Element>(json).is_err());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{"type": "video", "content_key": "x", "position": {"x": 0, "y": 0}}"#;
        assert!(serde_json::from_str::<Element>(json).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let element = Element::text(
            "opponent",
            (10.0, 10.0),
            TextStyle {
                font_size: 0.0,
                ..Default::default()
            },
        );
        assert!(matches!(element.validate(), Err(MatchgenError::InvalidElement(_))));

        let element = Element::image(
            "club_logo",
            (10.0, 10.0),
            ImageStyle {
                target_width: 0,
                ..Default::default()
            },
        );
        assert!(element.validate().is_err());

        let element = Element::image(
            "club_logo",
            (10.0, 10.0),
            ImageStyle {
                contrast: -1.0,
                ..Default::default()
            },
        );
        assert!(element.validate().is_err());

        let element = Element::text("", (10.0, 10.0), TextStyle::default());
        assert!(element.validate().is_err());
    }

    #[test]
    fn test_validate_caps_sizes() {
        let text = |font_size: f32| {
            Element::text(
                "opponent",
                (10.0, 10.0),
                TextStyle {
                    font_size,
                    ..Default::default()
                },
            )
        };
        assert!(text(MAX_FONT_SIZE).validate().is_ok());
        assert!(text(1e6).validate().is_err());

        let image = |w: u32, h: u32| {
            Element::image(
                "club_logo",
                (10.0, 10.0),
                ImageStyle {
                    target_width: w,
                    target_height: h,
                    ..Default::default()
                },
            )
        };
        assert!(image(MAX_TARGET_SIZE, MAX_TARGET_SIZE).validate().is_ok());
        assert!(image(MAX_TARGET_SIZE + 1, 10).validate().is_err());
        assert!(image(10, 1_000_000).validate().is_err());
    }

    #[test]
    fn test_label_prefers_name() {
        let mut element = Element::text("opponent", (0.0, 0.0), TextStyle::default());
        assert_eq!(element.label(), "opponent");
        element.name = Some("Opponent name".to_string());
        assert_eq!(element.label(), "Opponent name");
        assert!(element.validate().is_ok());
    }
}
