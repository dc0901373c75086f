//! Effective element positions.
//!
//! Image elements may carry home/away variant positions, for slots whose
//! content swaps with the fixture (club badge vs. opponent badge). Text
//! elements always use their default position.

use crate::template::{Element, ElementKind, HomeAway, Position};

/// Pick the position to use for `element` in a fixture with `home_away`.
pub fn resolve(element: &Element, home_away: HomeAway) -> Position {
    let ElementKind::Image(style) = &element.kind else {
        return element.position;
    };

    let variant = match home_away {
        HomeAway::Home => style.home_position,
        HomeAway::Away => style.away_position,
        HomeAway::Unknown => None,
    };
    variant.unwrap_or(element.position)
}

/// Convert a resolved position to canvas pixels.
///
/// Relative positions are fractions of the canvas size.
pub fn to_pixels(position: Position, relative: bool, canvas_width: u32, canvas_height: u32) -> (f32, f32) {
    if relative {
        (
            position.x * canvas_width as f32,
            position.y * canvas_height as f32,
        )
    } else {
        (position.x, position.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ImageStyle, TextStyle};

    fn logo(home: Option<Position>, away: Option<Position>) -> Element {
        Element::image(
            "club_logo",
            (400.0, 200.0),
            ImageStyle {
                home_position: home,
                away_position: away,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_home_away_selection() {
        let element = logo(Some(Position::new(200.0, 200.0)), Some(Position::new(600.0, 200.0)));
        assert_eq!(resolve(&element, HomeAway::Home), Position::new(200.0, 200.0));
        assert_eq!(resolve(&element, HomeAway::Away), Position::new(600.0, 200.0));
        assert_eq!(resolve(&element, HomeAway::Unknown), Position::new(400.0, 200.0));
    }

    #[test]
    fn test_missing_variant_uses_default() {
        let element = logo(Some(Position::new(200.0, 200.0)), None);
        assert_eq!(resolve(&element, HomeAway::Away), Position::new(400.0, 200.0));
        let element = logo(None, None);
        assert_eq!(resolve(&element, HomeAway::Home), Position::new(400.0, 200.0));
    }

    #[test]
    fn test_text_ignores_home_away() {
        let element = Element::text("opponent", (123.0, 45.0), TextStyle::default());
        for flag in [HomeAway::Home, HomeAway::Away, HomeAway::Unknown] {
            assert_eq!(resolve(&element, flag), Position::new(123.0, 45.0));
        }
    }

    #[test]
    fn test_to_pixels() {
        assert_eq!(to_pixels(Position::new(10.0, 20.0), false, 800, 600), (10.0, 20.0));
        assert_eq!(to_pixels(Position::new(0.5, 0.25), true, 800, 600), (400.0, 150.0));
    }
}
