//! Text drawing for the Macroquad rendering backend.
//!
//! All uses of `macroquad::text` live here so label layout can be tested
//! without a rendering context.

use std::path::Path;

use glam::Vec2;
use macroquad::text::{self, Font, TextParams};
use mcbean_rendering::{FontRole, TextAnchor, TextLabel};

use crate::{manifest::FontSources, to_macroquad_color};

/// Loaded faces per font role. Roles without a face use the built-in font.
#[derive(Default)]
pub(crate) struct Fonts {
    title: Option<Font>,
    body: Option<Font>,
}

impl Fonts {
    /// Loads every configured face. Failures are logged and fall back to the built-in font.
    pub(crate) async fn load(sources: &FontSources) -> Self {
        Self {
            title: load_face(sources.title.as_deref()).await,
            body: load_face(sources.body.as_deref()).await,
        }
    }

    fn face(&self, role: FontRole) -> Option<Font> {
        match role {
            FontRole::Title => self.title,
            FontRole::Body => self.body,
        }
    }

    /// Draws `label` using the face and size of its role.
    pub(crate) fn draw(&self, label: &TextLabel) {
        let face = self.face(label.font);
        let font_size = label.font.pixel_size();
        let dimensions = text::measure_text(&label.text, face, font_size, 1.0);
        let baseline = baseline_origin(
            label.anchor,
            label.position,
            Vec2::new(dimensions.width, dimensions.height),
            dimensions.offset_y,
        );

        let mut params = TextParams {
            font_size,
            color: to_macroquad_color(label.color),
            ..TextParams::default()
        };
        if let Some(face) = face {
            params.font = face;
        }
        text::draw_text_ex(&label.text, baseline.x, baseline.y, params);
    }
}

async fn load_face(path: Option<&Path>) -> Option<Font> {
    let path = path?;
    match text::load_ttf_font(&path.to_string_lossy()).await {
        Ok(font) => {
            tracing::debug!(path = %path.display(), "loaded font");
            Some(font)
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), ?error, "using built-in font");
            None
        }
    }
}

/// Converts an anchored label position into the baseline origin macroquad draws from.
///
/// `ascent` is the distance from the top of the text box to the baseline.
pub(crate) fn baseline_origin(anchor: TextAnchor, position: Vec2, size: Vec2, ascent: f32) -> Vec2 {
    match anchor {
        TextAnchor::TopLeft => Vec2::new(position.x, position.y + ascent),
        TextAnchor::Center => Vec2::new(
            position.x - size.x / 2.0,
            position.y - size.y / 2.0 + ascent,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_left_labels_drop_to_the_baseline() {
        let origin = baseline_origin(
            TextAnchor::TopLeft,
            Vec2::new(20.0, 20.0),
            Vec2::new(100.0, 30.0),
            24.0,
        );
        assert_eq!(origin, Vec2::new(20.0, 44.0));
    }

    #[test]
    fn centered_labels_straddle_their_position() {
        let origin = baseline_origin(
            TextAnchor::Center,
            Vec2::new(400.0, 100.0),
            Vec2::new(200.0, 60.0),
            50.0,
        );
        assert_eq!(origin, Vec2::new(300.0, 120.0));
    }

    #[test]
    fn missing_fonts_use_the_built_in_face() {
        let fonts = Fonts::default();
        assert!(fonts.face(FontRole::Title).is_none());
        assert!(fonts.face(FontRole::Body).is_none());
    }
}
