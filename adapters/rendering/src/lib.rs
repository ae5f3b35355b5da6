#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for McBean adapters.

mod timing;
pub mod visuals;

use std::{collections::HashMap, time::Duration};

use anyhow::Result as AnyResult;
use glam::Vec2;
use mcbean_core::{Sprite, SpriteSize};
use thiserror::Error;

pub use timing::{FadeEnvelope, FixedTimestep};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Identifies a pre-rendered bitmap supplied with the presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Character standing still.
    PlayerIdle,
    /// Character while the shoot pose is active.
    PlayerShooting,
    /// Full-screen desert scenery.
    Backdrop,
}

impl SpriteKey {
    /// Every key in canonical load order.
    pub const ALL: [Self; 3] = [Self::PlayerIdle, Self::PlayerShooting, Self::Backdrop];
}

/// Bitmaps keyed by the role they play in the scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpriteSheet {
    sprites: HashMap<SpriteKey, Sprite>,
}

impl SpriteSheet {
    /// Creates an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `sprite` under `key`, returning the sprite it replaced.
    pub fn insert(&mut self, key: SpriteKey, sprite: Sprite) -> Option<Sprite> {
        self.sprites.insert(key, sprite)
    }

    /// Looks up the sprite stored under `key`.
    #[must_use]
    pub fn get(&self, key: SpriteKey) -> Option<&Sprite> {
        self.sprites.get(&key)
    }

    /// Returns whether the sheet holds a sprite for every key.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        SpriteKey::ALL.iter().all(|key| self.sprites.contains_key(key))
    }

    /// Iterates over stored sprites in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (SpriteKey, &Sprite)> {
        SpriteKey::ALL
            .into_iter()
            .filter_map(|key| self.sprites.get(&key).map(|sprite| (key, sprite)))
    }
}

/// Outline drawn around a filled shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Line thickness in pixels.
    pub thickness: f32,
    /// Line color.
    pub color: Color,
}

/// Filled primitive drawn in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned ellipse.
    Ellipse {
        /// Center point.
        center: Vec2,
        /// Horizontal and vertical radii.
        radii: Vec2,
        /// Interior color.
        fill: Color,
        /// Optional outline drawn on top of the fill.
        outline: Option<Stroke>,
    },
    /// Filled circle.
    Circle {
        /// Center point.
        center: Vec2,
        /// Radius in pixels.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Filled axis-aligned rectangle.
    Rect {
        /// Top-left corner.
        top_left: Vec2,
        /// Width and height.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
}

/// Sprite drawn centered on a screen position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteInstance {
    /// Which bitmap to draw.
    pub key: SpriteKey,
    /// Screen position of the bitmap center.
    pub center: Vec2,
}

impl SpriteInstance {
    /// Creates a new sprite instance.
    #[must_use]
    pub const fn new(key: SpriteKey, center: Vec2) -> Self {
        Self { key, center }
    }
}

/// Typeface slot used by a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Large headline text.
    Title,
    /// Regular HUD and menu text.
    Body,
}

impl FontRole {
    /// Pixel height the role is rendered at.
    #[must_use]
    pub const fn pixel_size(self) -> u16 {
        match self {
            Self::Title => 72,
            Self::Body => 36,
        }
    }
}

/// Point of a label's bounding box that `position` refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// `position` is the top-left corner of the text.
    TopLeft,
    /// `position` is the center of the text.
    Center,
}

/// Line of text drawn in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    /// Text content.
    pub text: String,
    /// Screen position interpreted through `anchor`.
    pub position: Vec2,
    /// Which point of the text box sits on `position`.
    pub anchor: TextAnchor,
    /// Typeface slot.
    pub font: FontRole,
    /// Text color.
    pub color: Color,
}

impl TextLabel {
    /// Creates a label whose top-left corner sits at `position`.
    #[must_use]
    pub fn top_left(text: impl Into<String>, position: Vec2, font: FontRole, color: Color) -> Self {
        Self {
            text: text.into(),
            position,
            anchor: TextAnchor::TopLeft,
            font,
            color,
        }
    }

    /// Creates a label centered on `position`.
    #[must_use]
    pub fn centered(text: impl Into<String>, position: Vec2, font: FontRole, color: Color) -> Self {
        Self {
            text: text.into(),
            position,
            anchor: TextAnchor::Center,
            font,
            color,
        }
    }
}

/// Scene description drawn back to front: clear, backdrop, shapes, sprites, labels.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Color used to clear the frame.
    pub clear_color: Color,
    /// Full-screen sprite drawn at the origin, if any.
    pub backdrop: Option<SpriteKey>,
    /// Primitives drawn over the backdrop.
    pub shapes: Vec<Shape>,
    /// Sprites drawn over the shapes.
    pub sprites: Vec<SpriteInstance>,
    /// Text drawn last.
    pub labels: Vec<TextLabel>,
}

impl Scene {
    /// Creates an empty scene cleared with `clear_color`.
    #[must_use]
    pub const fn new(clear_color: Color) -> Self {
        Self {
            clear_color,
            backdrop: None,
            shapes: Vec::new(),
            sprites: Vec::new(),
            labels: Vec::new(),
        }
    }
}

/// Discrete key actions recognised by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyInput {
    /// Move a menu selection up.
    Up,
    /// Move a menu selection down.
    Down,
    /// Confirm the current menu selection.
    Confirm,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Number of fixed simulation ticks due this frame.
    pub ticks: u32,
    /// Pointer presses in screen coordinates, oldest first.
    pub clicks: Vec<Vec2>,
    /// Key presses, oldest first.
    pub keys: Vec<KeyInput>,
    /// Whether the window or the player asked to close.
    pub quit_requested: bool,
}

/// Sound requests emitted by a frame update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Gunshot.
    Shot,
    /// Round transition jingle.
    RoundComplete,
    /// Fade the music out, then play it again from the start.
    FadeOutAndRestart,
    /// Fade the music out and leave it stopped.
    FadeOutAndStop,
}

/// Whether sound playback is available for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCapability {
    /// Sound calls are forwarded to the device.
    Enabled,
    /// Every sound call is a no-op.
    Disabled,
}

impl AudioCapability {
    /// Returns whether sound should be played.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Whether the render loop should keep going after a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FrameControl {
    /// Present the frame and continue.
    #[default]
    Continue,
    /// Present the frame and leave the loop.
    Exit,
}

/// Result of a frame update handed back to the backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    /// Sounds to trigger this frame, in order.
    pub cues: Vec<AudioCue>,
    /// Loop control decision.
    pub control: FrameControl,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Fixed window size in pixels.
    pub window_size: Vec2,
    /// Bitmaps referenced by the scene.
    pub sprites: SpriteSheet,
    /// Scene content that should be displayed first.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, window_size: Vec2, sprites: SpriteSheet, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_size,
            sprites,
            scene,
        }
    }
}

/// Rendering backend capable of presenting McBean scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// the per-frame input captured by the adapter, rewrites the scene, and
    /// returns the sounds to play plus whether to keep running.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutput + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// The simulation rate must be positive.
    #[error("ticks_per_second must be positive (received {ticks_per_second})")]
    InvalidTickRate {
        /// Provided rate that failed validation.
        ticks_per_second: u32,
    },
    /// The sprite does not fit in a GPU texture.
    #[error("sprite {key:?} is too large for a texture ({}x{})", .size.width, .size.height)]
    SpriteTooLarge {
        /// Sprite that failed validation.
        key: SpriteKey,
        /// Offending dimensions.
        size: SpriteSize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_colors_are_normalised() {
        let color = Color::from_rgb_u8(255, 0, 51);
        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn sprite_sheet_iterates_in_canonical_order() {
        let mut sheet = SpriteSheet::new();
        let size = SpriteSize::new(1, 1);
        assert!(sheet
            .insert(SpriteKey::Backdrop, Sprite::filled(size, [0; 4]))
            .is_none());
        assert!(sheet
            .insert(SpriteKey::PlayerIdle, Sprite::filled(size, [1; 4]))
            .is_none());
        assert!(!sheet.is_complete());

        let keys: Vec<_> = sheet.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![SpriteKey::PlayerIdle, SpriteKey::Backdrop]);

        assert!(sheet
            .insert(SpriteKey::PlayerShooting, Sprite::filled(size, [2; 4]))
            .is_none());
        assert!(sheet.is_complete());
    }

    #[test]
    fn replacing_a_sprite_returns_the_previous_one() {
        let mut sheet = SpriteSheet::new();
        let size = SpriteSize::new(1, 1);
        let first = Sprite::filled(size, [9; 4]);
        assert!(sheet.insert(SpriteKey::Backdrop, first.clone()).is_none());
        assert_eq!(
            sheet.insert(SpriteKey::Backdrop, Sprite::filled(size, [0; 4])),
            Some(first)
        );
    }

    #[test]
    fn font_roles_have_fixed_sizes() {
        assert_eq!(FontRole::Title.pixel_size(), 72);
        assert_eq!(FontRole::Body.pixel_size(), 36);
    }

    #[test]
    fn frame_output_defaults_to_continue_without_cues() {
        let output = FrameOutput::default();
        assert!(output.cues.is_empty());
        assert_eq!(output.control, FrameControl::Continue);
    }

    #[test]
    fn rendering_errors_describe_the_problem() {
        let error = RenderingError::SpriteTooLarge {
            key: SpriteKey::Backdrop,
            size: SpriteSize::new(70_000, 10),
        };
        assert_eq!(
            error.to_string(),
            "sprite Backdrop is too large for a texture (70000x10)"
        );
    }
}
