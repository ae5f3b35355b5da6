//! Decorative tumbleweed rolling through the walk cutscene.

use glam::Vec2;
use mcbean_core::SCREEN_HEIGHT;

const SPEED: f32 = 3.0;
const SPIN_DEGREES: f32 = 5.0;
const RADIUS: f32 = 40.0;

/// Rolling prop; rotation accumulates without wrapping.
#[derive(Clone, Debug, PartialEq)]
pub struct Tumbleweed {
    position: Vec2,
    rotation_degrees: f32,
}

impl Tumbleweed {
    pub(crate) fn new() -> Self {
        Self {
            position: Vec2::new(-50.0, SCREEN_HEIGHT - 100.0),
            rotation_degrees: 0.0,
        }
    }

    /// Center of the prop.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Accumulated rotation in degrees.
    #[must_use]
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    /// Outer radius of the prop.
    #[must_use]
    pub fn radius(&self) -> f32 {
        RADIUS
    }

    pub(crate) fn advance(&mut self) {
        self.position.x += SPEED;
        self.rotation_degrees += SPIN_DEGREES;
    }
}
